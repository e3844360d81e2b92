use std::{fmt::Display, str::FromStr};

/// Which engine flattens the aggregation file into the rolled-up declaration file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DtsBundlerKind {
  /// In-process oxc based linker.
  #[default]
  Native,
  /// `@microsoft/api-extractor`, invoked from the project's `node_modules`.
  ApiExtractor,
}

impl FromStr for DtsBundlerKind {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "native" => Ok(Self::Native),
      "api-extractor" => Ok(Self::ApiExtractor),
      _ => Err(format!("Invalid declaration bundler \"{s}\".")),
    }
  }
}

impl Display for DtsBundlerKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Native => write!(f, "native"),
      Self::ApiExtractor => write!(f, "api-extractor"),
    }
  }
}
