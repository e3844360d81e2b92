pub mod bundler_kind;
pub mod output_format;
pub mod package_type;
