mod bundler_options;
mod types;

pub use bundler_options::{
  DtsOptions, bundler_kind::DtsBundlerKind, dts_extension::DtsExtension, input_item::InputItem,
  normalized_bundler_options::NormalizedDtsOptions, output_format::OutputFormat,
  package_type::PackageType,
};

pub use crate::types::{
  declaration_map::DeclarationMap,
  export_record::{ExportRecord, ModuleExport, NamedExport},
  output_asset::OutputAsset,
};
