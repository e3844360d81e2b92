mod bundler;
mod stages;
mod types;
mod utils;

pub use crate::{
  bundler::DtsBundler,
  types::bundle_output::BundleOutput,
  utils::alias_allocator::AliasAllocator,
};
pub use dtspack_common::*;
pub use dtspack_error::{BuildError, BuildResult, Diagnostic, DtsError, Severity};

/// Base name of the rolled-up declaration file in the output directory.
pub const ROLLUP_FILE_NAME: &str = "_dtspack-rollup";

/// Base name of the aggregation file in the cache directory.
pub const AGGREGATION_FILE_NAME: &str = "_dtspack-aggregation";
