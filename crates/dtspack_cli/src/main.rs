mod args;
mod types;

use std::time::Instant;

use ansi_term::Colour;
use args::{InputArgs, OutputArgs, RollupArgs};
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

use dtspack::{DtsBundler, DtsOptions, OutputAsset};

/// Rolls the declarations of a TypeScript package up into one file per output format.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Commands {
  #[clap(flatten)]
  input: InputArgs,

  #[clap(flatten)]
  output: OutputArgs,

  #[clap(flatten)]
  rollup: RollupArgs,
}

fn print_output_assets(outputs: Vec<OutputAsset>) {
  let mut left = 0;
  let mut right = 0;

  let mut assets = Vec::with_capacity(outputs.len());

  for output in outputs {
    #[allow(clippy::cast_precision_loss)]
    let size = format!("{:.2}", output.content.len() as f64 / 1024.0);

    if size.len() > right {
      right = size.len();
    }

    if output.filename.len() > left {
      left = output.filename.len();
    }

    let is_rollup = output.filename.starts_with(dtspack::ROLLUP_FILE_NAME);
    assets.push((output.filename, size, is_rollup));
  }

  let dim = Colour::White.dimmed();
  let color = Colour::Cyan;

  for (filename, size, is_rollup) in assets {
    let asset_type = if is_rollup { "rollup" } else { "entry " };
    let filename_len = filename.len();

    println!(
      "{}{}{:left$} {}{}{:right$}{} kB",
      dim.paint("<DIR>/"),
      color.paint(filename),
      "",
      dim.paint(asset_type),
      dim.paint(" │ size: "),
      "",
      size,
      left = left - filename_len,
      right = right - size.len()
    );
  }
}

#[tokio::main]
async fn main() {
  let args = Commands::parse();

  let level = if args.rollup.verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
  tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();

  let InputArgs { input, cwd, tsconfig, strip_internal } = args.input;
  let input = input.iter().map(|path| path.to_string_lossy().into()).collect();

  let mut bundler = DtsBundler::new(DtsOptions {
    input: Some(input),
    cwd,
    tsconfig,
    strip_internal: Some(strip_internal),
    dir: args.output.dir,
    format: args.output.format.map(|formats| formats.into_iter().map(Into::into).collect()),
    package_type: args.output.package_type.map(Into::into),
    clean: Some(args.output.clean),
    bundler: args.rollup.bundler.map(Into::into),
    ..Default::default()
  });

  let start = Instant::now();
  match bundler.build().await {
    Ok(output) => {
      if !args.rollup.silent {
        // Print warnings
        for warning in output.warnings {
          println!("{} {}", Colour::Yellow.paint("Warning:"), warning);
        }

        // Print output assets
        if !output.assets.is_empty() {
          print_output_assets(output.assets);
        }
      }

      let elapsed = format!("{:.2} ms", start.elapsed().as_secs_f64() * 1000.0);
      println!("\n{} Finished in {}", Colour::Green.paint("✔"), Colour::White.bold().paint(elapsed));
    }
    Err(errors) => {
      for error in &*errors {
        println!("{} {}", Colour::Red.paint("Error:"), error);
      }
      std::process::exit(1);
    }
  }
}
