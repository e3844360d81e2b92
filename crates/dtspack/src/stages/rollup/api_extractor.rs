use std::{path::Path, process::Command, sync::LazyLock};

use anyhow::Context;
use dtspack_common::DtsExtension;
use dtspack_error::{BuildResult, DtsError};
use regex::Regex;
use serde_json::{Value, json};
use sugar_path::SugarPath;

use super::{DeclarationBundler, RollupContext};

const PACKAGE_NAME: &str = "@microsoft/api-extractor";

static MESSAGE_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?m)^\s*(Error|Warning):").expect("Invalid message regex"));

/// Rolls up declarations by running `api-extractor` from the project's `node_modules`.
pub struct ApiExtractorBundler;

impl DeclarationBundler for ApiExtractorBundler {
  fn name(&self) -> &'static str {
    "api-extractor"
  }

  fn accepts_entry_extension(&self, extension: DtsExtension) -> bool {
    matches!(extension, DtsExtension::Dts)
  }

  fn bundle(&self, ctx: &RollupContext) -> BuildResult<()> {
    let cwd = &ctx.options.cwd;
    let package_json = cwd.join("node_modules").join(PACKAGE_NAME).join("package.json");
    if !ctx.fs.exists(&package_json) {
      Err(DtsError::MissingTool { package: PACKAGE_NAME, purpose: "rolling up declarations" })?;
    }

    let config_path = ctx.options.cache_dir.join("api-extractor.json");
    let config = create_config(cwd, ctx.options.tsconfig.as_deref(), ctx.aggregation_path, ctx.output_path);
    let config_text = serde_json::to_string_pretty(&config).context("Failed to serialize api-extractor config")?;
    ctx
      .fs
      .write(&config_path, config_text.as_bytes())
      .with_context(|| format!("Failed to write {}", config_path.display()))?;

    let bin = cwd.join("node_modules").join(".bin").join(if cfg!(windows) {
      "api-extractor.cmd"
    } else {
      "api-extractor"
    });
    tracing::debug!("Running {} run --local --config {}", bin.display(), config_path.display());
    let output = Command::new(&bin)
      .args(["run", "--local", "--config"])
      .arg(&config_path)
      .current_dir(cwd)
      .output()
      .with_context(|| format!("Failed to run {}", bin.display()))?;

    let log = [output.stdout.as_slice(), output.stderr.as_slice()]
      .iter()
      .map(|bytes| String::from_utf8_lossy(bytes))
      .collect::<Vec<_>>()
      .join("\n");
    let (errors, warnings) = count_messages(&log);

    if !output.status.success() || errors > 0 || warnings > 0 {
      let entry = ctx.aggregation_path.relative(cwd).to_slash_lossy().into_owned();
      Err(DtsError::BundlerFailure {
        entry,
        errors: errors.max(usize::from(!output.status.success())),
        warnings,
        reason: Some(log.trim().to_string()).filter(|log| !log.is_empty()),
      })?;
    }
    Ok(())
  }
}

fn create_config(
  cwd: &Path,
  tsconfig: Option<&Path>,
  aggregation_path: &Path,
  output_path: &Path,
) -> Value {
  let compiler = match tsconfig {
    Some(tsconfig) => json!({ "tsconfigFilePath": tsconfig.to_slash_lossy() }),
    None => json!({
      "overrideTsconfig": {
        "compilerOptions": { "declaration": true, "skipLibCheck": true, "moduleResolution": "bundler" }
      }
    }),
  };

  json!({
    "$schema": "https://developer.microsoft.com/json-schemas/api-extractor/v7/api-extractor.schema.json",
    "projectFolder": cwd.to_slash_lossy(),
    "mainEntryPointFilePath": aggregation_path.to_slash_lossy(),
    "bundledPackages": [],
    "compiler": compiler,
    "apiReport": { "enabled": false },
    "docModel": { "enabled": false },
    "tsdocMetadata": { "enabled": false },
    "dtsRollup": { "enabled": true, "untrimmedFilePath": output_path.to_slash_lossy() },
    "messages": {
      "compilerMessageReporting": { "default": { "logLevel": "warning" } },
      "extractorMessageReporting": {
        "default": { "logLevel": "warning" },
        "ae-missing-release-tag": { "logLevel": "none" }
      },
      "tsdocMessageReporting": { "default": { "logLevel": "none" } }
    }
  })
}

/// Number of `Error:` and `Warning:` lines in the tool's output.
fn count_messages(log: &str) -> (usize, usize) {
  MESSAGE_REGEX.captures_iter(log).fold((0, 0), |(errors, warnings), captures| {
    if &captures[1] == "Error" { (errors + 1, warnings) } else { (errors, warnings + 1) }
  })
}

#[test]
fn test_count_messages() {
  let log = "api-extractor 7.47.0\nWarning: src/index.ts:3:1 - (ae-forgotten-export) Foo\n\
             Error: src/index.ts:9:1 - (TS2304) Cannot find name 'Bar'\n  Warning: another\n\
             Analysis will use the bundled TypeScript version\n";
  assert_eq!(count_messages(log), (1, 2));
  assert_eq!(count_messages("API Extractor completed successfully\n"), (0, 0));
}

#[test]
fn test_create_config() {
  let config = create_config(
    Path::new("/p"),
    Some(Path::new("/p/tsconfig.json")),
    Path::new("/p/.dtspack/_dtspack-aggregation.dcts.d.ts"),
    Path::new("/p/dist/_dtspack-rollup.d.cts"),
  );
  assert_eq!(config["mainEntryPointFilePath"], "/p/.dtspack/_dtspack-aggregation.dcts.d.ts");
  assert_eq!(config["compiler"]["tsconfigFilePath"], "/p/tsconfig.json");
  assert_eq!(config["apiReport"]["enabled"], false);
  assert_eq!(config["docModel"]["enabled"], false);
  assert_eq!(config["tsdocMetadata"]["enabled"], false);
  assert_eq!(config["dtsRollup"]["enabled"], true);
  assert_eq!(config["dtsRollup"]["untrimmedFilePath"], "/p/dist/_dtspack-rollup.d.cts");

  let without_tsconfig = create_config(Path::new("/p"), None, Path::new("/a.d.ts"), Path::new("/b.d.ts"));
  assert_eq!(without_tsconfig["compiler"]["overrideTsconfig"]["compilerOptions"]["declaration"], true);
}
