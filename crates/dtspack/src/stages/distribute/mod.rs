use std::path::Path;

use dtspack_common::{DtsExtension, ExportRecord};
use dtspack_utils::{
  concat_string, dts_path::strip_declaration_extension,
  ecmascript::to_module_import_export_name, path_ext::PathExt,
};
use rustc_hash::FxHashSet;

/// Renders the distribution file of `entry`: its own exports, re-exported from the rolled-up
/// file under their original names.
pub fn render_distribution(
  records: &[ExportRecord],
  entry: &Path,
  distribution_path: &Path,
  rollup_path: &Path,
  extension: DtsExtension,
) -> String {
  let distribution_dir = distribution_path.parent().unwrap_or(Path::new(""));
  let rollup_specifier = rollup_path.relative_specifier(distribution_dir);
  let rollup_specifier =
    concat_string!(strip_declaration_extension(&rollup_specifier), extension.import_suffix());

  let mut seen_names = FxHashSet::default();
  let mut seen_modules = FxHashSet::default();
  let mut lines = vec![];
  for record in records.iter().filter(|record| record.source_file() == entry) {
    match record {
      ExportRecord::Named(named) => {
        if !seen_names.insert(named.name.as_str()) {
          continue;
        }
        let alias = to_module_import_export_name(&named.alias);
        let binding = if named.alias == named.name {
          alias
        } else {
          concat_string!(alias, " as ", to_module_import_export_name(&named.name))
        };
        let type_keyword = if named.is_type_only { "type " } else { "" };
        lines.push(concat_string!(
          "export ",
          type_keyword,
          "{ ",
          binding,
          " } from '",
          rollup_specifier,
          "';"
        ));
      }
      ExportRecord::Module(module) => {
        if seen_modules.insert(module.module_name.as_str()) {
          lines.push(concat_string!("export * from '", module.module_name, "';"));
        }
      }
    }
  }

  if lines.is_empty() {
    return "export {};\n".to_string();
  }
  let mut source = lines.join("\n");
  source.push('\n');
  source
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use dtspack_common::{ModuleExport, NamedExport};

  use super::*;

  fn named(entry: &str, name: &str, alias: &str) -> ExportRecord {
    ExportRecord::Named(NamedExport {
      source_file: PathBuf::from(entry),
      dest_file: PathBuf::from("/p/.dtspack/declaration/index.d.ts"),
      name: name.to_string(),
      alias: alias.to_string(),
      is_type_only: false,
    })
  }

  fn module(entry: &str, module_name: &str) -> ExportRecord {
    ExportRecord::Module(ModuleExport {
      source_file: PathBuf::from(entry),
      dest_file: PathBuf::from("/p/.dtspack/declaration/index.d.ts"),
      module_name: module_name.to_string(),
      is_type_only: false,
    })
  }

  #[test]
  fn restores_original_names() {
    let records = [named("/p/src/x.ts", "foo", "foo"), named("/p/src/y.ts", "foo", "foo_alias_1")];
    let rollup = Path::new("/p/dist/_dtspack-rollup.d.ts");

    let x = render_distribution(
      &records,
      Path::new("/p/src/x.ts"),
      Path::new("/p/dist/x.d.ts"),
      rollup,
      DtsExtension::Dts,
    );
    let y = render_distribution(
      &records,
      Path::new("/p/src/y.ts"),
      Path::new("/p/dist/y.d.ts"),
      rollup,
      DtsExtension::Dts,
    );

    assert_eq!(x, "export { foo } from './_dtspack-rollup';\n");
    assert_eq!(y, "export { foo_alias_1 as foo } from './_dtspack-rollup';\n");
  }

  #[test]
  fn maps_module_extensions_to_javascript_ones() {
    let records = [named("/p/src/index.ts", "default", "default_alias")];
    let cjs = render_distribution(
      &records,
      Path::new("/p/src/index.ts"),
      Path::new("/p/dist/cli/index.d.cts"),
      Path::new("/p/dist/_dtspack-rollup.d.cts"),
      DtsExtension::Dcts,
    );
    assert_eq!(cjs, "export { default_alias as default } from '../_dtspack-rollup.cjs';\n");

    let esm = render_distribution(
      &records,
      Path::new("/p/src/index.ts"),
      Path::new("/p/dist/index.d.mts"),
      Path::new("/p/dist/_dtspack-rollup.d.mts"),
      DtsExtension::Dmts,
    );
    assert_eq!(esm, "export { default_alias as default } from './_dtspack-rollup.mjs';\n");
  }

  #[test]
  fn deduplicates_names_and_modules() {
    let records = [
      named("/p/src/index.ts", "foo", "foo"),
      module("/p/src/index.ts", "external-package"),
      named("/p/src/index.ts", "foo", "foo_alias_1"),
      module("/p/src/index.ts", "external-package"),
      module("/p/src/other.ts", "other-package"),
    ];
    let output = render_distribution(
      &records,
      Path::new("/p/src/index.ts"),
      Path::new("/p/dist/index.d.ts"),
      Path::new("/p/dist/_dtspack-rollup.d.ts"),
      DtsExtension::Dts,
    );
    assert_eq!(
      output,
      "export { foo } from './_dtspack-rollup';\nexport * from 'external-package';\n"
    );
  }

  #[test]
  fn entry_without_exports() {
    let records = [named("/p/src/other.ts", "foo", "foo")];
    let output = render_distribution(
      &records,
      Path::new("/p/src/index.ts"),
      Path::new("/p/dist/index.d.ts"),
      Path::new("/p/dist/_dtspack-rollup.d.ts"),
      DtsExtension::Dts,
    );
    assert_eq!(output, "export {};\n");
  }
}
