use std::{
  collections::VecDeque,
  path::{Path, PathBuf},
};

use anyhow::Context;
use dtspack_common::DeclarationMap;
use dtspack_ecmascript::{EcmaCompiler, line_column};
use dtspack_error::{BuildResult, Diagnostic, DtsError};
use dtspack_fs::FileSystem;
use dtspack_resolver::Resolver;
use dtspack_utils::{
  dts_path::{declaration_file_name, is_declaration_file},
  indexmap::FxIndexSet,
};
use sugar_path::SugarPath;

use crate::{
  types::SharedOptions,
  utils::{clean_output::clean_declarations, entry_names::common_dir, normalize_options::entry_paths},
};

#[derive(Debug)]
pub struct EmitStageOutput {
  /// Absolute entry paths, in input order.
  pub entries: Vec<PathBuf>,
  pub declaration_map: DeclarationMap,
}

struct ProgramFile {
  path: PathBuf,
  declaration: String,
}

/// Checks the whole program reachable from the entries and writes one declaration file per
/// program file into the declaration directory.
pub struct EmitStage<'a> {
  fs: &'a dyn FileSystem,
  options: &'a SharedOptions,
  resolver: &'a Resolver,
}

impl<'a> EmitStage<'a> {
  pub fn new(fs: &'a dyn FileSystem, options: &'a SharedOptions, resolver: &'a Resolver) -> Self {
    Self { fs, options, resolver }
  }

  pub fn emit(&self) -> BuildResult<EmitStageOutput> {
    let entries = self.resolve_entries()?;
    let files = self.compile_program(&entries)?;

    let root_dir = self.options.root_dir.clone().unwrap_or_else(|| {
      let sources = files.iter().filter(|file| !is_declaration_file(&file.path));
      let root_dir = common_dir(sources.filter_map(|file| file.path.parent()));
      if root_dir.as_os_str().is_empty() { self.options.cwd.clone() } else { root_dir }
    });

    let declaration_dir = &self.options.declaration_dir;
    clean_declarations(self.fs, declaration_dir)?;

    let mut declaration_map = DeclarationMap::default();
    for file in files {
      let relative = file.path.relative(&root_dir);
      let output = if relative.starts_with("..") {
        // A declaration file outside the root directory is used where it is.
        file.path.clone()
      } else {
        declaration_dir.join(declaration_file_name(&relative))
      };
      if output != file.path {
        self
          .fs
          .write(&output, file.declaration.as_bytes())
          .with_context(|| format!("Failed to write declaration {}", output.display()))?;
      }
      declaration_map.insert(file.path, output);
    }

    tracing::debug!(
      "Emitted {} declaration file(s) into {}",
      declaration_map.len(),
      declaration_dir.display()
    );

    Ok(EmitStageOutput { entries, declaration_map })
  }

  fn resolve_entries(&self) -> BuildResult<Vec<PathBuf>> {
    if self.options.input.is_empty() {
      Err(anyhow::anyhow!("You must supply options.input to dtspack"))?;
    }

    let mut entries = Vec::with_capacity(self.options.input.len());
    let mut errors = vec![];
    for path in entry_paths(self.options) {
      if EcmaCompiler::source_type_of(&path).is_none() {
        errors.push(anyhow::anyhow!(
          "Entry {:?} is not a TypeScript file",
          path.relative(&self.options.cwd).to_slash_lossy()
        ));
        continue;
      }
      match dunce::canonicalize(&path) {
        Ok(path) => entries.push(path),
        Err(err) => errors.push(anyhow::anyhow!("Failed to resolve entry {}: {err}", path.display())),
      }
    }

    if !errors.is_empty() {
      Err(errors)?;
    }
    Ok(entries)
  }

  /// Walks the module requests of every program file breadth-first. Files inside
  /// `node_modules` and unresolvable packages stay outside the program.
  fn compile_program(&self, entries: &[PathBuf]) -> BuildResult<Vec<ProgramFile>> {
    let mut visited = entries.iter().cloned().collect::<FxIndexSet<_>>();
    let mut queue = visited.iter().cloned().collect::<VecDeque<_>>();
    let mut files = vec![];
    let mut diagnostics = vec![];

    while let Some(path) = queue.pop_front() {
      let source = self
        .fs
        .read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
      let display_name = self.display_name(&path);
      let compiled = EcmaCompiler::compile_source(
        &path,
        &display_name,
        &source,
        self.options.strip_internal,
      );
      diagnostics.extend(compiled.diagnostics);

      for request in &compiled.requests {
        match self.resolver.resolve(&path, &request.specifier) {
          Ok(resolved) => {
            if !resolved.is_in_node_modules
              && EcmaCompiler::source_type_of(&resolved.path).is_some()
              && visited.insert(resolved.path.clone())
            {
              tracing::debug!("Discovered {} from {display_name}", self.display_name(&resolved.path));
              queue.push_back(resolved.path);
            }
          }
          Err(_) if Resolver::is_path_like(&request.specifier) => {
            let (line, column) = line_column(&source, request.span.start as usize);
            diagnostics.push(Diagnostic {
              file: display_name.clone(),
              line,
              column,
              message: format!("Cannot find module '{}'", request.specifier),
            });
          }
          Err(_) => {}
        }
      }

      if let Some(declaration) = compiled.declaration {
        files.push(ProgramFile { path, declaration });
      }
    }

    if !diagnostics.is_empty() {
      diagnostics.sort_by(|a, b| (&a.file, a.line, a.column).cmp(&(&b.file, b.line, b.column)));
      Err(DtsError::Compilation(diagnostics))?;
    }

    Ok(files)
  }

  fn display_name(&self, path: &Path) -> String {
    path.relative(&self.options.cwd).to_slash_lossy().into_owned()
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use dtspack_common::{DtsOptions, InputItem};
  use dtspack_fs::OsFileSystem;

  use super::*;
  use crate::utils::normalize_options::normalize_options;

  fn emit(root: &Path, input: &[&str]) -> BuildResult<EmitStageOutput> {
    let options: SharedOptions = Arc::new(normalize_options(&OsFileSystem, DtsOptions {
      input: Some(input.iter().map(|item| InputItem::from(*item)).collect()),
      cwd: Some(root.to_path_buf()),
      ..Default::default()
    }));
    let resolver = Resolver::new(options.cwd.clone(), options.tsconfig.clone());
    EmitStage::new(&OsFileSystem, &options, &resolver).emit()
  }

  fn write(root: &Path, file: &str, content: &str) {
    OsFileSystem.write(&root.join(file), content.as_bytes()).unwrap();
  }

  #[test]
  fn emits_every_reachable_file() {
    let dir = tempfile::tempdir().unwrap();
    let root = dunce::canonicalize(dir.path()).unwrap();
    write(&root, "src/index.ts", "export { helper } from './lib/helper.js';\nexport const a: number = 1;\n");
    write(&root, "src/lib/helper.ts", "import type { Opts } from '../types';\nexport function helper(o: Opts): void {}\n");
    write(&root, "src/types.d.ts", "export interface Opts { x: number }\n");
    write(&root, "src/unused.ts", "export const unused = 1;\n");

    let output = emit(&root, &["src/index.ts"]).unwrap();

    let declaration_dir = root.join(".dtspack/declaration");
    assert_eq!(output.entries, vec![root.join("src/index.ts")]);
    assert_eq!(output.declaration_map.len(), 3);
    assert_eq!(
      output.declaration_map.declaration_of(&root.join("src/lib/helper.ts")),
      Some(declaration_dir.join("lib/helper.d.ts").as_path())
    );
    assert_eq!(
      output.declaration_map.declaration_of(&root.join("src/types.d.ts")),
      Some(declaration_dir.join("types.d.ts").as_path())
    );
    assert!(output.declaration_map.declaration_of(&root.join("src/unused.ts")).is_none());
    let index = std::fs::read_to_string(declaration_dir.join("index.d.ts")).unwrap();
    assert!(index.contains("export declare const a: number;"), "{index}");
  }

  #[test]
  fn reports_every_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let root = dunce::canonicalize(dir.path()).unwrap();
    write(&root, "src/index.ts", "export * from './missing';\nexport const seed = Math.random();\n");

    let error = emit(&root, &["src/index.ts"]).unwrap_err();

    let Some(DtsError::Compilation(diagnostics)) = error.dts_errors().next() else {
      panic!("expected a compilation error, got {error}");
    };
    assert_eq!(diagnostics.len(), 2, "{diagnostics:?}");
    assert_eq!(diagnostics[0].message, "Cannot find module './missing'");
    assert_eq!((diagnostics[0].line, diagnostics[0].column), (1, 15));
    assert_eq!(diagnostics[1].file, "src/index.ts");
    assert_eq!(diagnostics[1].line, 2);
    assert!(!root.join(".dtspack/declaration/index.d.ts").exists());
  }

  #[test]
  fn bare_specifiers_stay_external() {
    let dir = tempfile::tempdir().unwrap();
    let root = dunce::canonicalize(dir.path()).unwrap();
    write(&root, "index.ts", "export type { Foo } from 'not-installed';\n");

    let output = emit(&root, &["index.ts"]).unwrap();
    assert_eq!(output.declaration_map.len(), 1);
  }

  #[test]
  fn rejects_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let error = emit(dir.path(), &[]).unwrap_err();
    assert!(error.to_string().contains("You must supply options.input"));
  }
}
