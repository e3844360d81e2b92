pub mod alias_allocator;
pub mod clean_output;
pub mod declaration_loader;
pub mod entry_names;
pub mod normalize_options;
pub mod renamer;
