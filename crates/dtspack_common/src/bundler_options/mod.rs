pub mod bundler_kind;
pub mod dts_extension;
pub mod input_item;
pub mod normalized_bundler_options;
pub mod output_format;
pub mod package_type;

use std::path::PathBuf;

use crate::{DtsBundlerKind, InputItem, OutputFormat, PackageType};

#[derive(Default, Debug, Clone)]
pub struct DtsOptions {
  // --- Input
  pub input: Option<Vec<InputItem>>,
  pub cwd: Option<PathBuf>,
  pub tsconfig: Option<PathBuf>,
  pub root_dir: Option<PathBuf>,
  pub strip_internal: Option<bool>,

  // --- Output
  pub dir: Option<String>,
  pub format: Option<Vec<OutputFormat>>,
  pub package_type: Option<PackageType>,
  pub clean: Option<bool>,

  // --- Rollup
  pub bundler: Option<DtsBundlerKind>,
  pub cache_dir: Option<PathBuf>,
  pub declaration_dir: Option<PathBuf>,
}
