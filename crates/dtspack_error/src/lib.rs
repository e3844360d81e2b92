mod dts_error;

use std::ops::{Deref, DerefMut};

pub use crate::dts_error::{Diagnostic, DtsError, Severity};

#[derive(Debug)]
pub struct BuildError(pub Vec<anyhow::Error>);

impl BuildError {
  /// Iterates over the typed pipeline errors, skipping plain IO or resolution failures.
  pub fn dts_errors(&self) -> impl Iterator<Item = &DtsError> {
    self.0.iter().filter_map(|error| error.downcast_ref::<DtsError>())
  }
}

impl Deref for BuildError {
  type Target = Vec<anyhow::Error>;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl DerefMut for BuildError {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.0
  }
}

impl From<anyhow::Error> for BuildError {
  fn from(error: anyhow::Error) -> Self {
    Self(vec![error])
  }
}

impl From<Vec<anyhow::Error>> for BuildError {
  fn from(errors: Vec<anyhow::Error>) -> Self {
    Self(errors)
  }
}

impl From<DtsError> for BuildError {
  fn from(error: DtsError) -> Self {
    Self(vec![error.into()])
  }
}

impl std::fmt::Display for BuildError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for (index, error) in self.0.iter().enumerate() {
      if index > 0 {
        writeln!(f)?;
      }
      write!(f, "{error}")?;
    }
    Ok(())
  }
}

pub type BuildResult<T> = anyhow::Result<T, BuildError>;
