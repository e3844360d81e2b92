use std::path::PathBuf;

use crate::{DtsBundlerKind, DtsExtension, InputItem, OutputFormat, PackageType};

#[derive(Debug)]
pub struct NormalizedDtsOptions {
  // --- Input
  pub input: Vec<InputItem>,
  pub cwd: PathBuf,
  pub tsconfig: Option<PathBuf>,
  pub root_dir: Option<PathBuf>,
  pub strip_internal: bool,

  // --- Output
  pub dir: PathBuf,
  pub format: Vec<OutputFormat>,
  pub package_type: PackageType,
  pub clean: bool,

  // --- Rollup
  pub bundler: DtsBundlerKind,
  pub cache_dir: PathBuf,
  pub declaration_dir: PathBuf,
}

impl NormalizedDtsOptions {
  pub fn dts_extension(&self, format: OutputFormat) -> DtsExtension {
    DtsExtension::for_format(format, self.package_type)
  }
}
