use clap::ValueEnum;

#[derive(PartialEq, Eq, Clone, ValueEnum)]
#[clap(rename_all = "lower")]
pub enum OutputFormat {
  Esm,
  Cjs,
  Iife,
}

impl From<OutputFormat> for dtspack::OutputFormat {
  fn from(value: OutputFormat) -> Self {
    match value {
      OutputFormat::Esm => dtspack::OutputFormat::Esm,
      OutputFormat::Cjs => dtspack::OutputFormat::Cjs,
      OutputFormat::Iife => dtspack::OutputFormat::Iife,
    }
  }
}
