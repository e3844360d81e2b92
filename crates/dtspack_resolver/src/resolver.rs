use std::path::{Component, Path, PathBuf};

use oxc_resolver::{
  ResolveError, ResolveOptions as OxcResolverOptions, Resolver as OxcResolver, TsconfigOptions,
  TsconfigReferences,
};
use sugar_path::SugarPath;

/// Source and declaration extensions, in the order the TypeScript compiler probes them.
const TS_EXTENSIONS: [&str; 11] =
  [".ts", ".tsx", ".d.ts", ".mts", ".d.mts", ".cts", ".d.cts", ".js", ".mjs", ".cjs", ".json"];

#[derive(Debug)]
pub struct Resolver {
  cwd: PathBuf,
  inner: OxcResolver,
}

impl Resolver {
  /// `tsconfig` supplies `baseUrl` and `paths`; it is honoured for every request.
  pub fn new(cwd: PathBuf, tsconfig: Option<PathBuf>) -> Self {
    let condition_names =
      ["types", "import", "require", "node", "default"].into_iter().map(String::from).collect();

    let main_fields = ["types", "typings", "module", "main"].into_iter().map(String::from).collect();

    // `import './a.js'` inside TypeScript refers to `./a.ts` (or its declaration).
    let extension_alias = vec![
      (".js".to_string(), vec![".ts".into(), ".tsx".into(), ".d.ts".into(), ".js".into()]),
      (".jsx".to_string(), vec![".tsx".into(), ".d.ts".into(), ".jsx".into()]),
      (".mjs".to_string(), vec![".mts".into(), ".d.mts".into(), ".mjs".into()]),
      (".cjs".to_string(), vec![".cts".into(), ".d.cts".into(), ".cjs".into()]),
    ];

    let options = OxcResolverOptions {
      tsconfig: tsconfig.map(|config_file| TsconfigOptions {
        config_file,
        references: TsconfigReferences::Auto,
      }),
      condition_names,
      main_fields,
      extension_alias,
      extensions: TS_EXTENSIONS.iter().map(ToString::to_string).collect(),
      builtin_modules: true,
      ..OxcResolverOptions::default()
    };

    Self { cwd, inner: OxcResolver::new(options) }
  }

  pub fn cwd(&self) -> &PathBuf {
    &self.cwd
  }

  /// Resolves `specifier` as written in the file `importer`.
  pub fn resolve(&self, importer: &Path, specifier: &str) -> Result<ResolveReturn, ResolveError> {
    let dir = importer
      .parent()
      .filter(|inner| inner.components().next().is_some())
      .unwrap_or(self.cwd.as_path());

    self.inner.resolve(dir, specifier).map(|info| {
      let path = info.path().normalize();
      let is_in_node_modules =
        path.components().any(|c| matches!(c, Component::Normal(name) if name == "node_modules"));
      ResolveReturn { path, is_in_node_modules }
    })
  }
}

#[derive(Debug)]
pub struct ResolveReturn {
  pub path: PathBuf,
  pub is_in_node_modules: bool,
}

impl Resolver {
  /// Whether `specifier` names a file rather than a package.
  pub fn is_path_like(specifier: &str) -> bool {
    specifier.starts_with("./")
      || specifier.starts_with("../")
      || specifier == "."
      || specifier == ".."
      || specifier.starts_with('/')
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use super::*;

  #[test]
  fn resolves_js_extension_to_typescript_source() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/a.ts"), "export const a: number = 1;").unwrap();
    fs::write(root.join("src/index.ts"), "export * from './a.js';").unwrap();

    let resolver = Resolver::new(root.clone(), None);
    let ret = resolver.resolve(&root.join("src/index.ts"), "./a.js").unwrap();
    assert_eq!(ret.path, root.join("src/a.ts"));
    assert!(!ret.is_in_node_modules);
  }

  #[test]
  fn resolves_extensionless_declaration() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    fs::create_dir_all(root.join("declaration")).unwrap();
    fs::write(root.join("declaration/index.d.ts"), "export {};").unwrap();

    let resolver = Resolver::new(root.clone(), None);
    let ret = resolver.resolve(&root.join("agg.d.ts"), "./declaration/index").unwrap();
    assert_eq!(ret.path, root.join("declaration/index.d.ts"));
  }

  #[test]
  fn honours_tsconfig_paths() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    fs::create_dir_all(root.join("src/utils")).unwrap();
    fs::write(root.join("src/utils/index.ts"), "export const u: number = 1;").unwrap();
    fs::write(
      root.join("tsconfig.json"),
      r#"{ "compilerOptions": { "baseUrl": ".", "paths": { "@/*": ["src/*"] } } }"#,
    )
    .unwrap();

    let resolver = Resolver::new(root.clone(), Some(root.join("tsconfig.json")));
    let ret = resolver.resolve(&root.join("src/index.ts"), "@/utils").unwrap();
    assert_eq!(ret.path, root.join("src/utils/index.ts"));
  }

  #[test]
  fn classifies_specifiers() {
    assert!(Resolver::is_path_like("./a"));
    assert!(Resolver::is_path_like("../a"));
    assert!(!Resolver::is_path_like("external-package"));
    assert!(!Resolver::is_path_like("@scope/pkg"));
  }
}
