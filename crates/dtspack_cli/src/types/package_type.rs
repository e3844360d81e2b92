use clap::ValueEnum;

#[derive(PartialEq, Eq, Clone, ValueEnum)]
#[clap(rename_all = "lower")]
pub enum PackageType {
  Module,
  CommonJs,
}

impl From<PackageType> for dtspack::PackageType {
  fn from(value: PackageType) -> Self {
    match value {
      PackageType::Module => dtspack::PackageType::Module,
      PackageType::CommonJs => dtspack::PackageType::CommonJs,
    }
  }
}
