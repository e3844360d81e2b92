use std::path::{Path, PathBuf};

use dtspack_common::{ExportRecord, ModuleExport, NamedExport};
use dtspack_ecmascript::{DeclarationModule, ExportTarget, ImportBinding};
use dtspack_error::BuildResult;
use dtspack_utils::indexmap::FxIndexMap;
use rustc_hash::FxHashSet;

use crate::utils::{
  alias_allocator::AliasAllocator,
  declaration_loader::{DeclarationLoader, DeclarationRequest},
};

/// An export found while walking an entry, before it gets its alias.
struct FoundExport {
  /// Position of the exporting statement in the entry, followed by the positions inside the
  /// modules reached through `export *`.
  sort_key: Vec<u32>,
  kind: FoundExportKind,
  is_type_only: bool,
}

enum FoundExportKind {
  Named(String),
  Module(String),
}

/// Turns the export table of every entry declaration into export records.
pub struct ExtractStage<'a, 'l> {
  loader: &'l DeclarationLoader<'a>,
}

impl<'a, 'l> ExtractStage<'a, 'l> {
  pub fn new(loader: &'l DeclarationLoader<'a>) -> Self {
    Self { loader }
  }

  pub fn extract(
    &self,
    entries: &[PathBuf],
    allocator: &mut AliasAllocator,
  ) -> BuildResult<Vec<ExportRecord>> {
    let mut records = vec![];
    for entry in entries {
      let Some(dest_file) = self.loader.declaration_map().declaration_of(entry) else {
        tracing::warn!("No declaration was emitted for entry {}", entry.display());
        continue;
      };

      let module = self.loader.load(dest_file)?;
      let mut named = FxIndexMap::default();
      let mut module_exports = vec![];
      let mut visited = FxHashSet::default();
      self.collect_exports(
        dest_file,
        &module,
        &[],
        false,
        &mut named,
        &mut module_exports,
        &mut visited,
      )?;

      let mut found = named.into_values().chain(module_exports).collect::<Vec<_>>();
      found.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));

      for export in found {
        let record = match export.kind {
          FoundExportKind::Named(name) => ExportRecord::Named(NamedExport {
            source_file: entry.clone(),
            dest_file: dest_file.to_path_buf(),
            alias: allocator.assign(&name)?,
            name,
            is_type_only: export.is_type_only,
          }),
          FoundExportKind::Module(module_name) => ExportRecord::Module(ModuleExport {
            source_file: entry.clone(),
            dest_file: dest_file.to_path_buf(),
            module_name,
            is_type_only: export.is_type_only,
          }),
        };
        records.push(record);
      }
    }

    tracing::debug!("Extracted {} export record(s) from {} entries", records.len(), entries.len());
    Ok(records)
  }

  /// Explicit exports of `module` first, then names reached through its `export *`
  /// statements, never overriding a name found earlier.
  #[allow(clippy::too_many_arguments)]
  fn collect_exports(
    &self,
    path: &Path,
    module: &DeclarationModule,
    sort_prefix: &[u32],
    through_star: bool,
    named: &mut FxIndexMap<String, FoundExport>,
    module_exports: &mut Vec<FoundExport>,
    visited: &mut FxHashSet<PathBuf>,
  ) -> BuildResult<()> {
    if !visited.insert(path.to_path_buf()) {
      return Ok(());
    }

    for (name, binding) in &module.exports {
      if (through_star && name == "default") || named.contains_key(name) {
        continue;
      }
      let is_type_only = binding.is_type_only
        || self.is_type_only_target(path, module, &binding.target, &mut FxHashSet::default())?;
      named.insert(
        name.clone(),
        FoundExport {
          sort_key: [sort_prefix, &[binding.position]].concat(),
          kind: FoundExportKind::Named(name.clone()),
          is_type_only,
        },
      );
    }

    for star in &module.star_exports {
      let specifier = &module.requests[star.request].specifier;
      let sort_key = [sort_prefix, &[star.position]].concat();
      match self.loader.resolve(path, specifier)? {
        DeclarationRequest::Internal(target) => {
          let target_module = self.loader.load(&target)?;
          let mut star_named = FxIndexMap::default();
          self.collect_exports(
            &target,
            &target_module,
            &sort_key,
            true,
            &mut star_named,
            module_exports,
            visited,
          )?;
          for (name, mut export) in star_named {
            export.is_type_only |= star.is_type_only;
            named.entry(name).or_insert(export);
          }
        }
        DeclarationRequest::External => {
          if !module_exports.iter().any(
            |export| matches!(&export.kind, FoundExportKind::Module(name) if name == specifier),
          ) {
            module_exports.push(FoundExport {
              sort_key,
              kind: FoundExportKind::Module(specifier.clone()),
              is_type_only: star.is_type_only,
            });
          }
        }
      }
    }

    Ok(())
  }

  /// Whether only types stand behind `target`, following imports and re-exports into other
  /// program modules. Anything from outside the program counts as a value.
  fn is_type_only_target(
    &self,
    path: &Path,
    module: &DeclarationModule,
    target: &ExportTarget,
    seen: &mut FxHashSet<(PathBuf, String)>,
  ) -> BuildResult<bool> {
    match target {
      ExportTarget::Local(local) => {
        if let Some(declaration) = module.locals.get(local) {
          return Ok(declaration.is_type_only);
        }
        match module.imports.get(local) {
          Some(ImportBinding::Named { request, imported, is_type_only }) => Ok(*is_type_only
            || self.is_type_only_export(path, &module.requests[*request].specifier, imported, seen)?),
          Some(ImportBinding::Namespace { is_type_only, .. }) => Ok(*is_type_only),
          None => Ok(false),
        }
      }
      ExportTarget::ReExport { request, imported } => {
        self.is_type_only_export(path, &module.requests[*request].specifier, imported, seen)
      }
      ExportTarget::ReExportNamespace { .. } => Ok(false),
    }
  }

  fn is_type_only_export(
    &self,
    importer: &Path,
    specifier: &str,
    name: &str,
    seen: &mut FxHashSet<(PathBuf, String)>,
  ) -> BuildResult<bool> {
    let DeclarationRequest::Internal(path) = self.loader.resolve(importer, specifier)? else {
      return Ok(false);
    };
    if !seen.insert((path.clone(), name.to_string())) {
      return Ok(false);
    }
    let module = self.loader.load(&path)?;
    if let Some(binding) = module.exports.get(name) {
      return Ok(
        binding.is_type_only || self.is_type_only_target(&path, &module, &binding.target, seen)?,
      );
    }
    if name != "default" {
      for star in &module.star_exports {
        let specifier = &module.requests[star.request].specifier;
        if self.exports_name(&path, specifier, name)? {
          return Ok(star.is_type_only || self.is_type_only_export(&path, specifier, name, seen)?);
        }
      }
    }
    Ok(false)
  }

  /// Whether the program module behind `specifier` exports `name`, directly or through stars.
  fn exports_name(&self, importer: &Path, specifier: &str, name: &str) -> BuildResult<bool> {
    let mut pending = vec![(importer.to_path_buf(), specifier.to_string())];
    let mut visited = FxHashSet::default();
    while let Some((importer, specifier)) = pending.pop() {
      let DeclarationRequest::Internal(path) = self.loader.resolve(&importer, &specifier)? else {
        continue;
      };
      if !visited.insert(path.clone()) {
        continue;
      }
      let module = self.loader.load(&path)?;
      if module.exports.contains_key(name) {
        return Ok(true);
      }
      for star in module.star_exports.iter().rev() {
        pending.push((path.clone(), module.requests[star.request].specifier.clone()));
      }
    }
    Ok(false)
  }
}

#[cfg(test)]
mod tests {
  use std::path::Path;

  use dtspack_common::DeclarationMap;
  use dtspack_fs::{FileSystem, OsFileSystem};
  use dtspack_resolver::Resolver;

  use super::*;

  /// Writes declaration-only programs, mapping every file to itself.
  fn extract(root: &Path, files: &[(&str, &str)], entries: &[&str]) -> Vec<ExportRecord> {
    let mut declaration_map = DeclarationMap::default();
    for (file, content) in files {
      let path = root.join(file);
      OsFileSystem.write(&path, content.as_bytes()).unwrap();
      declaration_map.insert(path.clone(), path);
    }
    let resolver = Resolver::new(root.to_path_buf(), None);
    let loader = DeclarationLoader::new(&OsFileSystem, &resolver, &declaration_map);
    let entries = entries.iter().map(|entry| root.join(entry)).collect::<Vec<_>>();
    ExtractStage::new(&loader).extract(&entries, &mut AliasAllocator::new()).unwrap()
  }

  fn summary(records: &[ExportRecord]) -> Vec<String> {
    records
      .iter()
      .map(|record| match record {
        ExportRecord::Named(named) => {
          format!("{} as {}{}", named.name, named.alias, if named.is_type_only { " (type)" } else { "" })
        }
        ExportRecord::Module(module) => format!("* from {}", module.module_name),
      })
      .collect()
  }

  #[test]
  fn orders_exports_by_position_and_follows_stars() {
    let dir = tempfile::tempdir().unwrap();
    let root = dunce::canonicalize(dir.path()).unwrap();
    let records = extract(
      &root,
      &[
        (
          "index.d.ts",
          "export * from './shapes';\nexport declare const version: string;\nexport * from 'external-package';\nexport { Circle as Round } from './shapes';\n",
        ),
        (
          "shapes.d.ts",
          "export interface Circle { r: number }\nexport declare function area(c: Circle): number;\nexport declare const version: number;\ndeclare const _default: 1;\nexport default _default;\n",
        ),
      ],
      &["index.d.ts"],
    );

    assert_eq!(
      summary(&records),
      vec![
        "Circle as Circle (type)",
        "area as area",
        "version as version",
        "* from external-package",
        "Round as Round (type)",
      ]
    );
  }

  #[test]
  fn aliases_are_unique_across_entries() {
    let dir = tempfile::tempdir().unwrap();
    let root = dunce::canonicalize(dir.path()).unwrap();
    let records = extract(
      &root,
      &[
        ("x.d.ts", "export declare function foo(): void;\n"),
        ("y.d.ts", "export declare function foo(): void;\nexport default foo;\n"),
        ("z.d.ts", "declare const z: 1;\nexport default z;\n"),
      ],
      &["x.d.ts", "y.d.ts", "z.d.ts"],
    );

    assert_eq!(
      summary(&records),
      vec!["foo as foo", "foo as foo_alias_1", "default as default_alias", "default as default_alias_alias_1"]
    );
    assert_eq!(records[1].source_file(), root.join("y.d.ts"));
  }

  #[test]
  fn type_only_follows_import_chains() {
    let dir = tempfile::tempdir().unwrap();
    let root = dunce::canonicalize(dir.path()).unwrap();
    let records = extract(
      &root,
      &[
        (
          "index.d.ts",
          "import { Options, run } from './impl';\nimport type { Value } from './impl';\nexport { Options, run, Value };\n",
        ),
        (
          "impl.d.ts",
          "export * from './types';\nexport declare function run(): void;\nexport declare class Value {}\n",
        ),
        ("types.d.ts", "export type Options = { a: number };\n"),
      ],
      &["index.d.ts"],
    );

    assert_eq!(
      summary(&records),
      vec!["Options as Options (type)", "run as run", "Value as Value (type)"]
    );
  }

  #[test]
  fn entry_without_declaration_yields_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let root = dunce::canonicalize(dir.path()).unwrap();
    let records = extract(&root, &[("a.d.ts", "export {};\n")], &["missing.ts", "a.d.ts"]);
    assert!(records.is_empty());
  }
}
