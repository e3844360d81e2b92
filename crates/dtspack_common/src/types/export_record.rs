use std::path::{Path, PathBuf};

/// One exported symbol of an entry point, as seen by the aggregation and distribution files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportRecord {
  Named(NamedExport),
  /// `export * from '<module_name>'` of a module outside the program.
  Module(ModuleExport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedExport {
  /// Absolute path of the entry source file.
  pub source_file: PathBuf,
  /// Absolute path of the declaration emitted for `source_file`.
  pub dest_file: PathBuf,
  pub name: String,
  /// Unique across every named export of a build.
  pub alias: String,
  pub is_type_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleExport {
  pub source_file: PathBuf,
  pub dest_file: PathBuf,
  pub module_name: String,
  pub is_type_only: bool,
}

impl ExportRecord {
  pub fn source_file(&self) -> &Path {
    match self {
      Self::Named(record) => &record.source_file,
      Self::Module(record) => &record.source_file,
    }
  }

  pub fn dest_file(&self) -> &Path {
    match self {
      Self::Named(record) => &record.dest_file,
      Self::Module(record) => &record.dest_file,
    }
  }

  pub fn as_named(&self) -> Option<&NamedExport> {
    match self {
      Self::Named(record) => Some(record),
      Self::Module(_) => None,
    }
  }
}
