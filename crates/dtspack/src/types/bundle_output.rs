use dtspack_common::OutputAsset;

#[derive(Debug, Default)]
pub struct BundleOutput {
  /// Rolled-up and distribution files, in the order they were written.
  pub assets: Vec<OutputAsset>,
  pub warnings: Vec<anyhow::Error>,
}
