use std::path::Path;

use super::*;

fn scan(source: &str) -> DeclarationModule {
  DeclarationModule::scan(Path::new("/decl/index.d.ts"), source).unwrap()
}

#[test]
fn collects_imports_exports_and_locals() {
  let module = scan(
    "import { B as Local } from './b';\n\
     import * as ns from 'pkg';\n\
     export interface Foo { b: Local; }\n\
     export declare const bar: number;\n\
     export { x as y } from './x';\n\
     export * from './star';\n\
     export * as nsx from './nsx';\n",
  );

  assert_eq!(
    module.requests.iter().map(|r| r.specifier.as_str()).collect::<Vec<_>>(),
    vec!["./b", "pkg", "./x", "./star", "./nsx"]
  );
  assert!(matches!(
    module.imports.get("Local"),
    Some(ImportBinding::Named { request: 0, imported, is_type_only: false }) if imported == "B"
  ));
  assert!(matches!(module.imports.get("ns"), Some(ImportBinding::Namespace { request: 1, .. })));

  let exported = module.exports.keys().map(String::as_str).collect::<Vec<_>>();
  assert_eq!(exported, vec!["Foo", "bar", "y", "nsx"]);
  assert!(matches!(
    &module.exports["y"].target,
    ExportTarget::ReExport { request: 2, imported } if imported == "x"
  ));
  assert!(matches!(module.exports["nsx"].target, ExportTarget::ReExportNamespace { request: 4 }));
  assert_eq!(module.star_exports.len(), 1);
  assert_eq!(module.star_exports[0].request, 3);

  assert!(module.locals["Foo"].is_type_only);
  assert!(!module.locals["bar"].is_type_only);
}

#[test]
fn records_references_per_statement() {
  let module = scan(
    "import { Dep } from './dep';\n\
     interface Hidden { value: Dep; }\n\
     export interface Foo extends Hidden { self: Foo; }\n",
  );
  let hidden = &module.stmts[1];
  assert_eq!(hidden.declared, vec!["Hidden".to_string()]);
  assert!(hidden.referenced.contains("Dep"));
  let foo = &module.stmts[2];
  assert!(foo.referenced.contains("Hidden"));
  assert!(foo.referenced.contains("Foo"));
  assert_eq!(module.references["Dep"].len(), 1);
  assert_eq!(module.text(module.references["Dep"][0]), "Dep");
}

#[test]
fn merged_declarations_are_values_when_any_part_is() {
  let module = scan(
    "export declare function f(): void;\n\
     export declare function f(a: string): void;\n\
     export interface M {}\n\
     export declare namespace M { const x: number; }\n",
  );
  assert_eq!(module.locals["f"].spans.len(), 2);
  assert!(!module.locals["M"].is_type_only);
}

#[test]
fn export_prefix_is_replaced_with_declare_when_needed() {
  let module = scan("export declare const a: number;\nexport interface I {}\n");
  let DeclarationStmtKind::Declaration { export_prefix: Some((span, replacement)), .. } =
    &module.stmts[0].kind
  else {
    panic!("expected a declaration");
  };
  let rendered =
    format!("{replacement}{}", &module.source[span.end as usize..module.stmts[0].span.end as usize]);
  assert_eq!(rendered, "declare const a: number;");

  let DeclarationStmtKind::Declaration { export_prefix: Some((_, replacement)), .. } =
    &module.stmts[1].kind
  else {
    panic!("expected a declaration");
  };
  assert_eq!(*replacement, "");
}

#[test]
fn default_exports() {
  let module = scan("declare const _default: number;\nexport default _default;\n");
  assert!(matches!(&module.exports["default"].target, ExportTarget::Local(name) if name == "_default"));
  assert!(matches!(module.stmts[1].kind, DeclarationStmtKind::ModuleSyntax));

  let module = scan("export default function (): void;\n");
  let ExportTarget::Local(local) = &module.exports["default"].target else {
    panic!("expected a local default export");
  };
  assert_eq!(local, "_default");
  let DeclarationStmtKind::Declaration { anonymous_default: Some(anonymous), .. } =
    &module.stmts[0].kind
  else {
    panic!("expected an anonymous default");
  };
  assert_eq!(anonymous.local, "_default");
  assert_eq!(&module.source[..anonymous.insert_at as usize], "export default function");
}

#[test]
fn leading_comments_travel_with_statements() {
  let module = scan("/// <reference types=\"node\" />\n/** Docs. */\nexport declare const a: number;\n");
  assert_eq!(module.reference_directives, vec!["/// <reference types=\"node\" />".to_string()]);
  let stmt = &module.stmts[0];
  assert!(module.source[stmt.leading_start as usize..].starts_with("/** Docs. */"));
}

#[test]
fn unresolved_globals_are_reported() {
  let module = scan("export declare function f(): Promise<Map<string, number>>;\n");
  assert!(module.unresolved_references.contains(&"Promise".to_string()));
  assert!(module.unresolved_references.contains(&"Map".to_string()));
}

#[test]
fn export_assignment_is_unsupported() {
  let module = scan("declare const a: number;\nexport = a;\n");
  assert!(matches!(module.stmts[1].kind, DeclarationStmtKind::Unsupported("export =")));
}

#[test]
fn nested_names_exclude_top_level_bindings() {
  let module = scan(
    "export declare function pick<T, K extends keyof T>(value: T, key: K): T[K];\nexport type Box<V> = { value: V };\n",
  );
  for name in ["T", "K", "value", "key", "V"] {
    assert!(module.nested_names.contains(name), "{name} should be nested");
  }
  assert!(!module.nested_names.contains("pick"));
  assert!(!module.nested_names.contains("Box"));
}

#[test]
fn declared_exports_are_not_type_only() {
  let module = scan(
    "export declare function run(): void;\nexport declare class Runner {}\nexport type Mode = 'a';\n",
  );
  assert!(!module.exports["run"].is_type_only);
  assert!(!module.exports["Runner"].is_type_only);
  assert!(!module.locals["run"].is_type_only);
  assert!(module.locals["Mode"].is_type_only);
}

#[test]
fn global_augmentations_are_ambient() {
  let module = scan("declare global {\n  interface Window { app: App; }\n}\nexport interface App {}\n");
  assert!(matches!(module.stmts[0].kind, DeclarationStmtKind::Ambient));
  assert!(module.stmts[0].declared.is_empty());
  assert!(!module.locals.contains_key("global"));
  assert!(module.stmts[0].referenced.contains("App"));
}
