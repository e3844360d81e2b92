use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context;
use dtspack_common::{DtsOptions, ExportRecord, OutputAsset, OutputFormat};
use dtspack_error::BuildResult;
use dtspack_fs::{FileSystem, OsFileSystem};
use dtspack_resolver::Resolver;
use dtspack_utils::{concat_string, indexmap::FxIndexMap};
use sugar_path::SugarPath;

use crate::{
  stages::{
    aggregate::render_aggregation,
    distribute::render_distribution,
    emit::EmitStage,
    extract::ExtractStage,
    rollup::{DeclarationBundler, RollupContext, aggregation_extension, create_declaration_bundler},
  },
  types::{SharedOptions, SharedResolver, bundle_output::BundleOutput},
  utils::{
    alias_allocator::AliasAllocator,
    clean_output::{clean_declarations, prepare_cache_dir},
    declaration_loader::DeclarationLoader,
    entry_names::entry_names,
    normalize_options::normalize_options,
  },
  AGGREGATION_FILE_NAME, ROLLUP_FILE_NAME,
};

pub struct DtsBundler {
  pub(crate) fs: OsFileSystem,
  pub(crate) options: SharedOptions,
  pub(crate) resolver: SharedResolver,
}

impl DtsBundler {
  pub fn new(options: DtsOptions) -> Self {
    let options = normalize_options(&OsFileSystem, options);
    let resolver: SharedResolver = Resolver::new(options.cwd.clone(), options.tsconfig.clone()).into();
    Self { fs: OsFileSystem, options: Arc::new(options), resolver }
  }

  pub fn options(&self) -> &SharedOptions {
    &self.options
  }

  /// Runs the whole pipeline on a blocking worker and writes every output file.
  pub async fn build(&mut self) -> BuildResult<BundleOutput> {
    let fs = self.fs;
    let options = Arc::clone(&self.options);
    let resolver = Arc::clone(&self.resolver);
    tokio::task::spawn_blocking(move || Pipeline { fs: &fs, options: &options, resolver: &resolver }.run())
      .await
      .context("The declaration pipeline stopped unexpectedly")?
  }
}

struct Pipeline<'a> {
  fs: &'a dyn FileSystem,
  options: &'a SharedOptions,
  resolver: &'a Resolver,
}

struct FormatContext<'a, 'l> {
  loader: &'l DeclarationLoader<'a>,
  bundler: &'l dyn DeclarationBundler,
  records: &'l [ExportRecord],
  entries: &'l [(PathBuf, String)],
}

impl Pipeline<'_> {
  fn run(&self) -> BuildResult<BundleOutput> {
    if self.options.input.is_empty() {
      Err(anyhow::anyhow!("You must supply options.input to dtspack"))?;
    }
    if self.options.clean {
      clean_declarations(self.fs, &self.options.dir)?;
    }
    prepare_cache_dir(self.fs, &self.options.cache_dir)?;

    let emitted = EmitStage::new(self.fs, self.options, self.resolver).emit()?;
    let loader = DeclarationLoader::new(self.fs, self.resolver, &emitted.declaration_map);

    let mut allocator = AliasAllocator::new();
    let records = ExtractStage::new(&loader).extract(&emitted.entries, &mut allocator)?;

    let mut output = BundleOutput::default();
    let entries = emitted
      .entries
      .iter()
      .cloned()
      .zip(entry_names(&self.options.input, &emitted.entries))
      .collect::<Vec<_>>();
    for (entry, name) in &entries {
      if !records.iter().any(|record| record.source_file() == entry) {
        output.warnings.push(anyhow::anyhow!("Entry {name} does not export anything"));
      }
    }

    let bundler = create_declaration_bundler(self.options.bundler);
    let ctx =
      FormatContext { loader: &loader, bundler: bundler.as_ref(), records: &records, entries: &entries };

    let mut assets = FxIndexMap::default();
    let mut errors = vec![];
    for &format in &self.options.format {
      let span = tracing::info_span!("dts_format", %format);
      let _guard = span.enter();
      match self.generate_format(&ctx, format) {
        Ok(format_assets) => {
          for asset in format_assets {
            assets.insert(asset.filename.clone(), asset);
          }
        }
        Err(err) => errors.extend(err.0),
      }
    }

    if !errors.is_empty() {
      Err(errors)?;
    }
    output.assets = assets.into_values().collect();
    Ok(output)
  }

  /// Aggregate, bundle and distribute for one output format.
  fn generate_format(&self, ctx: &FormatContext, format: OutputFormat) -> BuildResult<Vec<OutputAsset>> {
    let extension = self.options.dts_extension(format);
    let mut assets = vec![];

    let aggregation_path = self.options.cache_dir.join(concat_string!(
      AGGREGATION_FILE_NAME,
      aggregation_extension(ctx.bundler, extension)
    ));
    let aggregation_source = render_aggregation(ctx.records, &self.options.cache_dir);
    self
      .fs
      .write(&aggregation_path, aggregation_source.as_bytes())
      .with_context(|| format!("Failed to write {}", aggregation_path.display()))?;

    let rollup_path = self.options.dir.join(concat_string!(ROLLUP_FILE_NAME, extension.as_str()));
    tracing::debug!("Rolling up {} with the {} bundler", aggregation_path.display(), ctx.bundler.name());
    ctx.bundler.bundle(&RollupContext {
      options: self.options,
      fs: self.fs,
      loader: ctx.loader,
      aggregation_path: &aggregation_path,
      aggregation_source: &aggregation_source,
      output_path: &rollup_path,
    })?;
    let rollup_content = self
      .fs
      .read_to_string(&rollup_path)
      .with_context(|| format!("Failed to read {}", rollup_path.display()))?;
    assets.push(self.output_asset(&rollup_path, rollup_content));

    for (entry, name) in ctx.entries {
      let distribution_path = self.options.dir.join(concat_string!(name, extension.as_str()));
      let content =
        render_distribution(ctx.records, entry, &distribution_path, &rollup_path, extension);
      self
        .fs
        .write(&distribution_path, content.as_bytes())
        .with_context(|| format!("Failed to write {}", distribution_path.display()))?;
      tracing::debug!("Wrote {}", distribution_path.display());
      assets.push(self.output_asset(&distribution_path, content));
    }

    Ok(assets)
  }

  fn output_asset(&self, path: &Path, content: String) -> OutputAsset {
    OutputAsset { filename: path.relative(&self.options.dir).to_slash_lossy().into_owned(), content }
  }
}
