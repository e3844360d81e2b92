use std::path::Path;

use dtspack_common::ExportRecord;
use dtspack_utils::{
  concat_string, dts_path::strip_declaration_extension,
  ecmascript::to_module_import_export_name, path_ext::PathExt,
};

/// Renders the aggregation file: a single module re-exporting every record under its alias,
/// used as the only entry of the declaration bundler.
pub fn render_aggregation(records: &[ExportRecord], aggregation_dir: &Path) -> String {
  let mut lines = Vec::with_capacity(records.len());
  for record in records {
    match record {
      ExportRecord::Named(named) => {
        let specifier = named.dest_file.relative_specifier(aggregation_dir);
        let specifier = strip_declaration_extension(&specifier);
        let name = to_module_import_export_name(&named.name);
        let binding = if named.alias == named.name {
          name
        } else {
          concat_string!(name, " as ", to_module_import_export_name(&named.alias))
        };
        let type_keyword = if named.is_type_only { "type " } else { "" };
        lines.push(concat_string!("export ", type_keyword, "{ ", binding, " } from '", specifier, "';"));
      }
      ExportRecord::Module(module) => {
        lines.push(concat_string!("export * from '", module.module_name, "';"));
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

  fn named(dest: &str, name: &str, alias: &str, is_type_only: bool) -> ExportRecord {
    ExportRecord::Named(NamedExport {
      source_file: PathBuf::from("/p/src/index.ts"),
      dest_file: PathBuf::from(dest),
      name: name.to_string(),
      alias: alias.to_string(),
      is_type_only,
    })
  }

  #[test]
  fn renders_one_line_per_record() {
    let records = [
      named("/p/.dtspack/declaration/x.d.ts", "foo", "foo", false),
      named("/p/.dtspack/declaration/y.d.mts", "foo", "foo_alias_1", false),
      named("/p/.dtspack/declaration/cli/main.d.ts", "Options", "Options", true),
      ExportRecord::Module(ModuleExport {
        source_file: PathBuf::from("/p/src/index.ts"),
        dest_file: PathBuf::from("/p/.dtspack/declaration/x.d.ts"),
        module_name: "external-package".to_string(),
        is_type_only: false,
      }),
    ];

    assert_eq!(
      render_aggregation(&records, Path::new("/p/.dtspack")),
      "export { foo } from './declaration/x';\n\
       export { foo as foo_alias_1 } from './declaration/y';\n\
       export type { Options } from './declaration/cli/main';\n\
       export * from 'external-package';\n"
    );
  }

  #[test]
  fn default_exports_are_aliased() {
    let records = [named("/p/.dtspack/declaration/x.d.ts", "default", "default_alias", false)];
    assert_eq!(
      render_aggregation(&records, Path::new("/p/.dtspack")),
      "export { default as default_alias } from './declaration/x';\n"
    );
  }

  #[test]
  fn declarations_outside_the_cache_dir() {
    let records = [named("/p/types/globals.d.ts", "Env", "Env", true)];
    assert_eq!(
      render_aggregation(&records, Path::new("/p/.dtspack")),
      "export type { Env } from '../types/globals';\n"
    );
  }

  #[test]
  fn empty_aggregation() {
    assert_eq!(render_aggregation(&[], Path::new("/p/.dtspack")), "export {};\n");
  }
}
