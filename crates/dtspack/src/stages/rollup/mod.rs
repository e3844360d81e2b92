mod api_extractor;
mod native;

use std::path::Path;

use dtspack_common::{DtsBundlerKind, DtsExtension};
use dtspack_error::BuildResult;
use dtspack_fs::FileSystem;

use crate::{types::SharedOptions, utils::declaration_loader::DeclarationLoader};

pub use self::{api_extractor::ApiExtractorBundler, native::NativeDtsBundler};

/// Everything a back end needs to roll up one output format.
pub struct RollupContext<'a, 'l> {
  pub options: &'a SharedOptions,
  pub fs: &'a dyn FileSystem,
  pub loader: &'l DeclarationLoader<'a>,
  pub aggregation_path: &'a Path,
  pub aggregation_source: &'a str,
  /// Where the rolled-up declaration file must be written.
  pub output_path: &'a Path,
}

/// Flattens the aggregation file and every declaration it reaches into one file.
pub trait DeclarationBundler {
  fn name(&self) -> &'static str;

  /// Whether the back end accepts an entry file with this extension. Entries it refuses are
  /// written as `.dmts.d.ts`/`.dcts.d.ts` instead.
  fn accepts_entry_extension(&self, extension: DtsExtension) -> bool;

  fn bundle(&self, ctx: &RollupContext) -> BuildResult<()>;
}

pub fn create_declaration_bundler(kind: DtsBundlerKind) -> Box<dyn DeclarationBundler> {
  match kind {
    DtsBundlerKind::Native => Box::new(NativeDtsBundler),
    DtsBundlerKind::ApiExtractor => Box::new(ApiExtractorBundler),
  }
}

/// Aggregation file extension for `extension`, honouring what `bundler` accepts.
pub fn aggregation_extension(bundler: &dyn DeclarationBundler, extension: DtsExtension) -> &'static str {
  if bundler.accepts_entry_extension(extension) {
    extension.as_str()
  } else {
    extension.plain_entry_extension()
  }
}

#[test]
fn test_aggregation_extension() {
  assert_eq!(aggregation_extension(&NativeDtsBundler, DtsExtension::Dcts), ".d.cts");
  assert_eq!(aggregation_extension(&ApiExtractorBundler, DtsExtension::Dcts), ".dcts.d.ts");
  assert_eq!(aggregation_extension(&ApiExtractorBundler, DtsExtension::Dmts), ".dmts.d.ts");
  assert_eq!(aggregation_extension(&ApiExtractorBundler, DtsExtension::Dts), ".d.ts");
}
