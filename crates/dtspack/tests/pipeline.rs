use std::path::PathBuf;

use dtspack::{
  BuildError, BundleOutput, DtsBundler, DtsBundlerKind, DtsError, DtsOptions, InputItem,
  OutputFormat,
};

struct Project {
  _dir: tempfile::TempDir,
  root: PathBuf,
}

impl Project {
  fn new(files: &[(&str, &str)]) -> Self {
    let dir = tempfile::tempdir().unwrap();
    let root = dunce::canonicalize(dir.path()).unwrap();
    for (file, content) in files {
      let path = root.join(file);
      std::fs::create_dir_all(path.parent().unwrap()).unwrap();
      std::fs::write(path, content).unwrap();
    }
    Self { _dir: dir, root }
  }

  fn options(&self, input: &[&str]) -> DtsOptions {
    DtsOptions {
      input: Some(input.iter().map(|item| InputItem::from(*item)).collect()),
      cwd: Some(self.root.clone()),
      ..Default::default()
    }
  }

  fn read(&self, file: &str) -> String {
    std::fs::read_to_string(self.root.join(file)).unwrap()
  }

  fn exists(&self, file: &str) -> bool {
    self.root.join(file).exists()
  }
}

async fn build(options: DtsOptions) -> Result<BundleOutput, BuildError> {
  DtsBundler::new(options).build().await
}

fn filenames(output: &BundleOutput) -> Vec<&str> {
  output.assets.iter().map(|asset| asset.filename()).collect()
}

const MODULE_PACKAGE: (&str, &str) = ("package.json", r#"{ "name": "demo", "type": "module" }"#);

#[tokio::test]
async fn colliding_exports_get_aliases() {
  let project = Project::new(&[
    MODULE_PACKAGE,
    ("src/x.ts", "export function foo(): void {}\n"),
    ("src/y.ts", "export function foo(a: number): void {}\n"),
  ]);

  let output = build(project.options(&["src/x.ts", "src/y.ts"])).await.unwrap();

  assert_eq!(filenames(&output), vec!["_dtspack-rollup.d.ts", "x.d.ts", "y.d.ts"]);
  assert_eq!(project.read("dist/x.d.ts"), "export { foo } from './_dtspack-rollup';\n");
  assert_eq!(
    project.read("dist/y.d.ts"),
    "export { foo_alias_1 as foo } from './_dtspack-rollup';\n"
  );
  let rollup = project.read("dist/_dtspack-rollup.d.ts");
  assert!(rollup.contains("declare function foo(): void;"), "{rollup}");
  assert!(rollup.contains("declare function foo$1(a: number): void;"), "{rollup}");
  assert!(rollup.ends_with("export { foo, foo$1 as foo_alias_1 };\n"), "{rollup}");
}

#[tokio::test]
async fn disjoint_exports_keep_their_names() {
  let project = Project::new(&[
    MODULE_PACKAGE,
    ("src/index.ts", "export { area } from './shapes';\nexport type { Circle } from './shapes';\n"),
    (
      "src/shapes.ts",
      "export interface Circle {\n  radius: number;\n}\nexport function area(circle: Circle): number {\n  return circle.radius;\n}\n",
    ),
  ]);

  build(project.options(&["src/index.ts"])).await.unwrap();

  let aggregation = project.read(".dtspack/_dtspack-aggregation.d.ts");
  assert!(aggregation.contains("export { area } from './declaration/index';"), "{aggregation}");
  assert!(!aggregation.contains("_alias_"), "{aggregation}");
  let distribution = project.read("dist/index.d.ts");
  assert!(distribution.contains("export { area } from './_dtspack-rollup';"), "{distribution}");
  assert!(
    distribution.contains("export type { Circle } from './_dtspack-rollup';"),
    "{distribution}"
  );
}

#[tokio::test]
async fn entry_without_exports_is_an_empty_module() {
  let project = Project::new(&[
    MODULE_PACKAGE,
    ("src/index.ts", "export const version: string = '1.0.0';\n"),
    ("src/side.ts", "const hidden: number = 1;\nconsole.log(hidden);\n"),
  ]);

  let output = build(project.options(&["src/index.ts", "src/side.ts"])).await.unwrap();

  assert_eq!(project.read("dist/side.d.ts"), "export {};\n");
  assert_eq!(output.warnings.len(), 1);
  assert!(output.warnings[0].to_string().contains("side"));
}

#[tokio::test]
async fn each_format_gets_its_own_rollup() {
  let project = Project::new(&[MODULE_PACKAGE, ("src/index.ts", "export function foo(): void {}\n")]);

  let output = build(DtsOptions {
    format: Some(vec![OutputFormat::Esm, OutputFormat::Cjs]),
    ..project.options(&["src/index.ts"])
  })
  .await
  .unwrap();

  assert_eq!(
    filenames(&output),
    vec!["_dtspack-rollup.d.ts", "index.d.ts", "_dtspack-rollup.d.cts", "index.d.cts"]
  );
  assert_eq!(project.read("dist/index.d.ts"), "export { foo } from './_dtspack-rollup';\n");
  assert_eq!(project.read("dist/index.d.cts"), "export { foo } from './_dtspack-rollup.cjs';\n");
  assert_eq!(project.read("dist/_dtspack-rollup.d.ts"), project.read("dist/_dtspack-rollup.d.cts"));
}

#[tokio::test]
async fn commonjs_packages_emit_mts_for_esm() {
  let project = Project::new(&[("src/index.ts", "export function foo(): void {}\n")]);

  build(project.options(&["src/index.ts"])).await.unwrap();

  assert_eq!(project.read("dist/index.d.mts"), "export { foo } from './_dtspack-rollup.mjs';\n");
  assert!(project.exists("dist/_dtspack-rollup.d.mts"));
}

#[tokio::test]
async fn external_star_exports_pass_through() {
  let project = Project::new(&[
    MODULE_PACKAGE,
    ("src/index.ts", "export * from 'external-package';\nexport const a: number = 1;\n"),
  ]);

  build(project.options(&["src/index.ts"])).await.unwrap();

  let aggregation = project.read(".dtspack/_dtspack-aggregation.d.ts");
  assert!(aggregation.contains("export * from 'external-package';"), "{aggregation}");
  let rollup = project.read("dist/_dtspack-rollup.d.ts");
  assert!(rollup.contains("export * from 'external-package';"), "{rollup}");
  let distribution = project.read("dist/index.d.ts");
  assert!(distribution.contains("export * from 'external-package';"), "{distribution}");
  assert!(distribution.contains("export { a } from './_dtspack-rollup';"), "{distribution}");
}

#[tokio::test]
async fn default_exports_are_aliased() {
  let project = Project::new(&[
    MODULE_PACKAGE,
    ("src/x.ts", "export default function render(): void {}\n"),
    ("src/y.ts", "export default function mount(): void {}\n"),
  ]);

  build(project.options(&["src/x.ts", "src/y.ts"])).await.unwrap();

  assert_eq!(
    project.read("dist/x.d.ts"),
    "export { default_alias as default } from './_dtspack-rollup';\n"
  );
  assert_eq!(
    project.read("dist/y.d.ts"),
    "export { default_alias_alias_1 as default } from './_dtspack-rollup';\n"
  );
  let rollup = project.read("dist/_dtspack-rollup.d.ts");
  assert!(
    rollup.ends_with("export { render as default_alias, mount as default_alias_alias_1 };\n"),
    "{rollup}"
  );
}

#[tokio::test]
async fn rebuilding_with_clean_is_idempotent() {
  let project = Project::new(&[
    MODULE_PACKAGE,
    ("src/x.ts", "import { Base } from './base';\nexport class Widget extends Base {}\n"),
    ("src/y.ts", "export { Base as Widget } from './base';\n"),
    ("src/base.ts", "export class Base {\n  id: number = 0;\n}\n"),
  ]);
  let options = DtsOptions { clean: Some(true), ..project.options(&["src/x.ts", "src/y.ts"]) };

  std::fs::create_dir_all(project.root.join("dist")).unwrap();
  std::fs::write(project.root.join("dist/stale.d.ts"), "export {};\n").unwrap();
  let first = build(options.clone()).await.unwrap();
  assert!(!project.exists("dist/stale.d.ts"));
  let second = build(options).await.unwrap();

  assert_eq!(filenames(&first), filenames(&second));
  for (a, b) in first.assets.iter().zip(&second.assets) {
    assert_eq!(a.content, b.content, "{} differs between runs", a.filename);
  }
  assert_eq!(project.read(".dtspack/.gitignore"), "*\n");
}

#[tokio::test]
async fn type_errors_abort_the_build() {
  let project = Project::new(&[("src/index.ts", "export const seed = Math.random();\n")]);

  let error = build(project.options(&["src/index.ts"])).await.unwrap_err();

  let Some(DtsError::Compilation(diagnostics)) = error.dts_errors().next() else {
    panic!("expected a compilation error, got {error}");
  };
  assert_eq!(diagnostics[0].file, "src/index.ts");
  assert_eq!(diagnostics[0].line, 1);
  assert!(!project.exists("dist"));
}

#[tokio::test]
async fn api_extractor_must_be_installed() {
  let project = Project::new(&[("src/index.ts", "export function foo(): void {}\n")]);

  let error = build(DtsOptions {
    bundler: Some(DtsBundlerKind::ApiExtractor),
    ..project.options(&["src/index.ts"])
  })
  .await
  .unwrap_err();

  let Some(DtsError::MissingTool { package, .. }) = error.dts_errors().next() else {
    panic!("expected a missing tool error, got {error}");
  };
  assert_eq!(*package, "@microsoft/api-extractor");
  assert!(error.to_string().contains("npm install"), "{error}");
}

#[tokio::test]
async fn missing_input_is_rejected() {
  let project = Project::new(&[]);

  let error = build(project.options(&[])).await.unwrap_err();

  assert!(error.to_string().contains("You must supply options.input"), "{error}");
  assert!(!project.exists(".dtspack"));
}
