use std::path::{Path, PathBuf};

use dtspack_common::{DtsOptions, NormalizedDtsOptions, OutputFormat, PackageType};
use dtspack_fs::FileSystem;
use sugar_path::SugarPath;

pub fn normalize_options(fs: &dyn FileSystem, raw_options: DtsOptions) -> NormalizedDtsOptions {
  let cwd = raw_options
    .cwd
    .map(|cwd| cwd.absolutize())
    .unwrap_or_else(|| std::env::current_dir().expect("Failed to get current dir"));
  let cwd = dunce::canonicalize(&cwd).unwrap_or(cwd);

  let package_type =
    raw_options.package_type.unwrap_or_else(|| read_package_type(fs, &cwd).unwrap_or_default());

  let tsconfig = raw_options
    .tsconfig
    .map(|tsconfig| tsconfig.absolutize_with(cwd.as_path()))
    .or_else(|| Some(cwd.join("tsconfig.json")).filter(|default| fs.exists(default)));

  let cache_dir = raw_options
    .cache_dir
    .map_or_else(|| cwd.join(".dtspack"), |cache_dir| cache_dir.absolutize_with(cwd.as_path()));

  let declaration_dir = raw_options.declaration_dir.map_or_else(
    || cache_dir.join("declaration"),
    |declaration_dir| declaration_dir.absolutize_with(cwd.as_path()),
  );

  let mut format = raw_options.format.unwrap_or_default();
  if format.is_empty() {
    format.push(OutputFormat::Esm);
  }
  let mut seen = vec![];
  format.retain(|item| {
    let first = !seen.contains(item);
    seen.push(*item);
    first
  });

  NormalizedDtsOptions {
    input: raw_options.input.unwrap_or_default(),
    dir: Path::new(raw_options.dir.as_deref().unwrap_or("dist")).absolutize_with(cwd.as_path()),
    tsconfig,
    root_dir: raw_options.root_dir.map(|root_dir| root_dir.absolutize_with(cwd.as_path())),
    strip_internal: raw_options.strip_internal.unwrap_or(false),
    format,
    package_type,
    clean: raw_options.clean.unwrap_or(false),
    bundler: raw_options.bundler.unwrap_or_default(),
    cache_dir,
    declaration_dir,
    cwd,
  }
}

/// The `type` field of `<cwd>/package.json`, if the file exists and is readable.
fn read_package_type(fs: &dyn FileSystem, cwd: &Path) -> Option<PackageType> {
  let content = fs.read_to_string(&cwd.join("package.json")).ok()?;
  let package_json = serde_json::from_str::<serde_json::Value>(&content).ok()?;
  Some(PackageType::from_package_json_type(package_json.get("type").and_then(|value| value.as_str())))
}

/// Absolute entry paths, in input order.
pub fn entry_paths(options: &NormalizedDtsOptions) -> Vec<PathBuf> {
  options.input.iter().map(|item| Path::new(&item.import).absolutize_with(options.cwd.as_path())).collect()
}
