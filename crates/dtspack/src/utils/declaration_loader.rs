use std::{
  cell::RefCell,
  path::{Path, PathBuf},
  rc::Rc,
};

use anyhow::Context;
use dtspack_common::DeclarationMap;
use dtspack_ecmascript::DeclarationModule;
use dtspack_fs::FileSystem;
use dtspack_resolver::Resolver;
use rustc_hash::FxHashMap;

/// Where a module request written in an emitted declaration file points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationRequest {
  /// The declaration emitted for a program file.
  Internal(PathBuf),
  /// Anything outside the program; kept as an import of the original specifier.
  External,
}

/// Reads and scans emitted declaration files at most once per build.
pub struct DeclarationLoader<'a> {
  fs: &'a dyn FileSystem,
  resolver: &'a Resolver,
  declaration_map: &'a DeclarationMap,
  cache: RefCell<FxHashMap<PathBuf, Rc<DeclarationModule>>>,
}

impl<'a> DeclarationLoader<'a> {
  pub fn new(
    fs: &'a dyn FileSystem,
    resolver: &'a Resolver,
    declaration_map: &'a DeclarationMap,
  ) -> Self {
    Self { fs, resolver, declaration_map, cache: RefCell::default() }
  }

  pub fn declaration_map(&self) -> &DeclarationMap {
    self.declaration_map
  }

  pub fn load(&self, path: &Path) -> anyhow::Result<Rc<DeclarationModule>> {
    if let Some(module) = self.cache.borrow().get(path) {
      return Ok(Rc::clone(module));
    }
    let source = self
      .fs
      .read_to_string(path)
      .with_context(|| format!("Failed to read declaration file {}", path.display()))?;
    let module = Rc::new(DeclarationModule::scan(path, source)?);
    self.cache.borrow_mut().insert(path.to_path_buf(), Rc::clone(&module));
    Ok(module)
  }

  /// Resolves `specifier` as written in the declaration file `importer`. Requests are resolved
  /// from the source file the declaration was emitted for, so `paths` and `baseUrl` mappings
  /// of the tsconfig apply unchanged.
  pub fn resolve(&self, importer: &Path, specifier: &str) -> anyhow::Result<DeclarationRequest> {
    let from = self.declaration_map.source_of(importer).unwrap_or(importer);
    match self.resolver.resolve(from, specifier) {
      Ok(resolved) => {
        if let Some(declaration) = self.declaration_map.declaration_of(&resolved.path) {
          Ok(DeclarationRequest::Internal(declaration.to_path_buf()))
        } else if self.declaration_map.source_of(&resolved.path).is_some() {
          // Requests of a file living in the declaration directory itself.
          Ok(DeclarationRequest::Internal(resolved.path))
        } else {
          Ok(DeclarationRequest::External)
        }
      }
      Err(err) if Resolver::is_path_like(specifier) => Err(anyhow::anyhow!(
        "Could not resolve '{specifier}' from {}: {err}",
        from.display()
      )),
      Err(_) => Ok(DeclarationRequest::External),
    }
  }
}
