use std::path::PathBuf;

use clap::Args;

use crate::types::{
  bundler_kind::BundlerKind, output_format::OutputFormat, package_type::PackageType,
};

#[derive(Args)]
pub struct InputArgs {
  /// Entry points, e.g. `src/index.ts`.
  #[clap(required = true)]
  pub input: Vec<PathBuf>,

  #[clap(long)]
  pub cwd: Option<PathBuf>,

  #[clap(long)]
  pub tsconfig: Option<PathBuf>,

  #[clap(long)]
  pub strip_internal: bool,
}

#[derive(Args)]
pub struct OutputArgs {
  #[clap(long, short = 'd')]
  pub dir: Option<String>,

  #[clap(long, action = clap::ArgAction::Append)]
  pub format: Option<Vec<OutputFormat>>,

  #[clap(long)]
  pub package_type: Option<PackageType>,

  /// Delete previously generated declaration files from the output directory first.
  #[clap(long)]
  pub clean: bool,
}

#[derive(Args)]
pub struct RollupArgs {
  #[clap(long)]
  pub bundler: Option<BundlerKind>,

  #[clap(long, short = 's')]
  pub silent: bool,

  #[clap(long, short = 'v')]
  pub verbose: bool,
}
