use std::fmt::Display;

/// A single compiler diagnostic, positioned with 1-based line and column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
  pub file: String,
  pub line: usize,
  pub column: usize,
  pub message: String,
}

impl Display for Diagnostic {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}:{}:{} - {}", self.file, self.line, self.column, self.message)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
  /// Caused by the user's input, fixable by changing the project.
  Error,
  /// An internal invariant was broken; this is a bug in dtspack itself.
  Bug,
}

#[derive(Debug, thiserror::Error)]
pub enum DtsError {
  #[error("Failed to compile declarations:\n{}", render_diagnostics(.0))]
  Compilation(Vec<Diagnostic>),

  #[error("{package} is required for {purpose}, install it with `npm install -D {package}`")]
  MissingTool { package: &'static str, purpose: &'static str },

  #[error(
    "Failed to roll up declarations from {entry}: {errors} error(s) and {warnings} warning(s){}",
    .reason.as_deref().map(|reason| format!("\n{reason}")).unwrap_or_default()
  )]
  BundlerFailure { entry: String, errors: usize, warnings: usize, reason: Option<String> },

  #[error("Unable to find an unused alias for `{name}` after {attempts} attempts")]
  AliasExhausted { name: String, attempts: u32 },
}

impl DtsError {
  pub fn severity(&self) -> Severity {
    match self {
      Self::AliasExhausted { .. } => Severity::Bug,
      Self::Compilation(_) | Self::MissingTool { .. } | Self::BundlerFailure { .. } => {
        Severity::Error
      }
    }
  }

  pub fn unsupported(entry: impl Into<String>, reason: impl Into<String>) -> Self {
    Self::BundlerFailure { entry: entry.into(), errors: 1, warnings: 0, reason: Some(reason.into()) }
  }
}

fn render_diagnostics(diagnostics: &[Diagnostic]) -> String {
  diagnostics.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
}
