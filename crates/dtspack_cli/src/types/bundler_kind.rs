use clap::ValueEnum;

#[derive(PartialEq, Eq, Clone, ValueEnum)]
pub enum BundlerKind {
  Native,
  ApiExtractor,
}

impl From<BundlerKind> for dtspack::DtsBundlerKind {
  fn from(value: BundlerKind) -> Self {
    match value {
      BundlerKind::Native => dtspack::DtsBundlerKind::Native,
      BundlerKind::ApiExtractor => dtspack::DtsBundlerKind::ApiExtractor,
    }
  }
}
