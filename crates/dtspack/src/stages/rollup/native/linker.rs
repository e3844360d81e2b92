use std::{mem, path::Path};

use anyhow::anyhow;
use dtspack_ecmascript::{DeclarationStmtKind, ExportTarget, ImportBinding};
use dtspack_utils::{
  dts_path::strip_declaration_extension,
  ecmascript::legitimize_identifier_name,
  indexmap::{FxIndexMap, FxIndexSet},
};
use oxc_index::IndexVec;
use rustc_hash::{FxHashMap, FxHashSet};

use super::module_graph::{ModuleGraph, ModuleIdx, RequestTarget};
use crate::utils::renamer::Renamer;

/// What a top-level name of some module ultimately refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SymbolRef {
  /// A declaration in the module.
  Local(ModuleIdx, String),
  /// A named or default import of a package outside the program.
  External { specifier: String, imported: String },
  ExternalNamespace(String),
  /// The namespace object of a module inside the program.
  Namespace(ModuleIdx),
}

#[derive(Debug)]
pub struct LinkOutput {
  pub included_stmts: IndexVec<ModuleIdx, Vec<bool>>,
  pub canonical_names: FxHashMap<SymbolRef, String>,
  /// What each top-level name referenced from an included statement resolves to.
  pub resolved_bindings: FxHashMap<(ModuleIdx, String), SymbolRef>,
  /// Included external symbols, in the order they were named.
  pub externals: Vec<SymbolRef>,
  /// Namespace objects to synthesize, with their members.
  pub namespaces: FxIndexMap<ModuleIdx, Vec<(String, SymbolRef)>>,
  /// Exports of the entry module.
  pub exports: Vec<(String, SymbolRef)>,
  /// `export * from '<package>'` of the entry module.
  pub external_star_exports: Vec<String>,
}

impl LinkOutput {
  pub fn canonical_name(&self, symbol: &SymbolRef) -> &str {
    self.canonical_names.get(symbol).map_or("", String::as_str)
  }
}

/// Binds imports to declarations, drops declarations the entry cannot reach and gives every
/// remaining top-level symbol a unique name.
pub struct Linker<'g> {
  graph: &'g ModuleGraph,
  included_stmts: IndexVec<ModuleIdx, Vec<bool>>,
  included_symbols: FxIndexSet<SymbolRef>,
  pending: Vec<SymbolRef>,
  resolved_bindings: FxHashMap<(ModuleIdx, String), SymbolRef>,
  /// Modules whose code mentions a symbol; its name must not be shadowed in any of them.
  referencing_modules: FxHashMap<SymbolRef, FxIndexSet<ModuleIdx>>,
  /// Local import names, used as the preferred name of imported symbols.
  name_hints: FxHashMap<SymbolRef, String>,
  namespaces: FxIndexMap<ModuleIdx, Vec<(String, SymbolRef)>>,
}

impl<'g> Linker<'g> {
  pub fn new(graph: &'g ModuleGraph) -> Self {
    let included_stmts =
      graph.modules.iter().map(|module| vec![false; module.ast.stmts.len()]).collect();
    Self {
      graph,
      included_stmts,
      included_symbols: FxIndexSet::default(),
      pending: vec![],
      resolved_bindings: FxHashMap::default(),
      referencing_modules: FxHashMap::default(),
      name_hints: FxHashMap::default(),
      namespaces: FxIndexMap::default(),
    }
  }

  pub fn link(mut self) -> anyhow::Result<LinkOutput> {
    self.check_unsupported_statements()?;

    let graph = self.graph;
    let (exports, external_star_exports) = self.module_exports(graph.entry)?;
    for (_, symbol) in &exports {
      self.include_symbol(symbol.clone());
    }

    for &idx in &graph.sorted_modules {
      for (stmt_idx, stmt) in graph.modules[idx].ast.stmts.iter().enumerate() {
        if matches!(stmt.kind, DeclarationStmtKind::Ambient) {
          self.include_stmt(idx, stmt_idx)?;
        }
      }
    }
    self.include_pending()?;

    let (canonical_names, externals) = self.deconflict();

    Ok(LinkOutput {
      included_stmts: self.included_stmts,
      canonical_names,
      resolved_bindings: self.resolved_bindings,
      externals,
      namespaces: self.namespaces,
      exports,
      external_star_exports,
    })
  }

  fn check_unsupported_statements(&self) -> anyhow::Result<()> {
    for module in &self.graph.modules {
      for stmt in &module.ast.stmts {
        if let DeclarationStmtKind::Unsupported(construct) = stmt.kind {
          return Err(anyhow!(
            "`{construct}` in {} is not supported by the native declaration bundler",
            module.path.display()
          ));
        }
      }
    }
    Ok(())
  }

  fn include_symbol(&mut self, symbol: SymbolRef) {
    if self.included_symbols.insert(symbol.clone()) {
      self.pending.push(symbol);
    }
  }

  fn include_stmt(&mut self, idx: ModuleIdx, stmt_idx: usize) -> anyhow::Result<()> {
    if mem::replace(&mut self.included_stmts[idx][stmt_idx], true) {
      return Ok(());
    }
    let graph = self.graph;
    let stmt = &graph.modules[idx].ast.stmts[stmt_idx];
    // Every name a rendered statement declares needs a canonical name.
    for name in &stmt.declared {
      self.include_symbol(SymbolRef::Local(idx, name.clone()));
    }
    for name in &stmt.referenced {
      let symbol = self.resolve_binding(idx, name)?;
      self.referencing_modules.entry(symbol.clone()).or_default().insert(idx);
      self.include_symbol(symbol);
    }
    Ok(())
  }

  fn include_pending(&mut self) -> anyhow::Result<()> {
    let graph = self.graph;
    while let Some(symbol) = self.pending.pop() {
      match &symbol {
        SymbolRef::Local(idx, name) => {
          let module = &graph.modules[*idx];
          if !module.ast.locals.contains_key(name) {
            return Err(anyhow!("`{name}` is exported by {} but never declared", module.path.display()));
          }
          self.referencing_modules.entry(symbol.clone()).or_default().insert(*idx);
          for (stmt_idx, stmt) in module.ast.stmts.iter().enumerate() {
            if stmt.declared.contains(name) {
              self.include_stmt(*idx, stmt_idx)?;
            }
          }
        }
        SymbolRef::Namespace(idx) => {
          let (members, external_stars) = self.module_exports(*idx)?;
          if !external_stars.is_empty() {
            tracing::debug!(
              "Namespace of {} leaves out the exports of {}",
              graph.modules[*idx].path.display(),
              external_stars.join(", ")
            );
          }
          for (_, member) in &members {
            self.include_symbol(member.clone());
          }
          self.namespaces.insert(*idx, members);
        }
        SymbolRef::External { .. } | SymbolRef::ExternalNamespace(_) => {}
      }
    }
    Ok(())
  }

  /// Every export of a module with the symbol behind it, and the packages its `export *`
  /// statements reach outside the program.
  fn module_exports(
    &mut self,
    idx: ModuleIdx,
  ) -> anyhow::Result<(Vec<(String, SymbolRef)>, Vec<String>)> {
    let mut names = FxIndexSet::default();
    let mut external_stars = FxIndexSet::default();
    self.collect_export_names(idx, false, &mut names, &mut external_stars, &mut FxHashSet::default());

    let exports = names
      .into_iter()
      .map(|name| {
        let symbol = self.resolve_export(idx, &name)?;
        Ok((name, symbol))
      })
      .collect::<anyhow::Result<Vec<_>>>()?;
    Ok((exports, external_stars.into_iter().collect()))
  }

  fn collect_export_names(
    &self,
    idx: ModuleIdx,
    through_star: bool,
    names: &mut FxIndexSet<String>,
    external_stars: &mut FxIndexSet<String>,
    visited: &mut FxHashSet<ModuleIdx>,
  ) {
    if !visited.insert(idx) {
      return;
    }
    let module = &self.graph.modules[idx];
    for name in module.ast.exports.keys() {
      if !(through_star && name == "default") {
        names.insert(name.clone());
      }
    }
    for star in &module.ast.star_exports {
      match module.request_target(star.request) {
        RequestTarget::Internal(target) => {
          self.collect_export_names(*target, true, names, external_stars, visited);
        }
        RequestTarget::External(specifier) => {
          external_stars.insert(specifier.clone());
        }
      }
    }
  }

  fn resolve_binding(&mut self, idx: ModuleIdx, local: &str) -> anyhow::Result<SymbolRef> {
    self.resolve_binding_in(idx, local, &mut FxHashSet::default())
  }

  fn resolve_binding_in(
    &mut self,
    idx: ModuleIdx,
    local: &str,
    visited: &mut FxHashSet<(ModuleIdx, String)>,
  ) -> anyhow::Result<SymbolRef> {
    if let Some(symbol) = self.resolved_bindings.get(&(idx, local.to_string())) {
      return Ok(symbol.clone());
    }

    let graph = self.graph;
    let module = &graph.modules[idx];
    let symbol = match module.ast.imports.get(local) {
      Some(ImportBinding::Named { request, imported, .. }) => {
        match module.request_target(*request) {
          RequestTarget::Internal(target) => {
            self.find_export(*target, imported, visited)?.ok_or_else(|| self.missing_export(*target, imported))?
          }
          RequestTarget::External(specifier) => {
            SymbolRef::External { specifier: specifier.clone(), imported: imported.clone() }
          }
        }
      }
      Some(ImportBinding::Namespace { request, .. }) => match module.request_target(*request) {
        RequestTarget::Internal(target) => SymbolRef::Namespace(*target),
        RequestTarget::External(specifier) => SymbolRef::ExternalNamespace(specifier.clone()),
      },
      None => SymbolRef::Local(idx, local.to_string()),
    };

    if module.ast.imports.contains_key(local) {
      self.name_hints.entry(symbol.clone()).or_insert_with(|| local.to_string());
    }
    self.resolved_bindings.insert((idx, local.to_string()), symbol.clone());
    Ok(symbol)
  }

  fn resolve_export(&mut self, idx: ModuleIdx, name: &str) -> anyhow::Result<SymbolRef> {
    self.find_export(idx, name, &mut FxHashSet::default())?.ok_or_else(|| self.missing_export(idx, name))
  }

  /// Follows explicit exports first and then `export *` statements in order. A name that can
  /// only come from a star export of a package is assumed to be exported by that package.
  fn find_export(
    &mut self,
    idx: ModuleIdx,
    name: &str,
    visited: &mut FxHashSet<(ModuleIdx, String)>,
  ) -> anyhow::Result<Option<SymbolRef>> {
    if !visited.insert((idx, name.to_string())) {
      return Ok(None);
    }

    let graph = self.graph;
    let module = &graph.modules[idx];
    if let Some(binding) = module.ast.exports.get(name) {
      let symbol = match &binding.target {
        ExportTarget::Local(local) => self.resolve_binding_in(idx, local, visited)?,
        ExportTarget::ReExport { request, imported } => match module.request_target(*request) {
          RequestTarget::Internal(target) => {
            self.find_export(*target, imported, visited)?.ok_or_else(|| self.missing_export(*target, imported))?
          }
          RequestTarget::External(specifier) => {
            SymbolRef::External { specifier: specifier.clone(), imported: imported.clone() }
          }
        },
        ExportTarget::ReExportNamespace { request } => match module.request_target(*request) {
          RequestTarget::Internal(target) => SymbolRef::Namespace(*target),
          RequestTarget::External(specifier) => SymbolRef::ExternalNamespace(specifier.clone()),
        },
      };
      if !matches!(symbol, SymbolRef::Local(..)) {
        self.name_hints.entry(symbol.clone()).or_insert_with(|| name.to_string());
      }
      return Ok(Some(symbol));
    }

    if name == "default" {
      return Ok(None);
    }
    let mut external = None;
    for star in &module.ast.star_exports {
      match module.request_target(star.request) {
        RequestTarget::Internal(target) => {
          if let Some(symbol) = self.find_export(*target, name, visited)? {
            return Ok(Some(symbol));
          }
        }
        RequestTarget::External(specifier) => {
          external.get_or_insert_with(|| specifier.clone());
        }
      }
    }
    Ok(external.map(|specifier| SymbolRef::External { specifier, imported: name.to_string() }))
  }

  fn missing_export(&self, idx: ModuleIdx, name: &str) -> anyhow::Error {
    anyhow!("\"{name}\" is not exported by {}", self.graph.modules[idx].path.display())
  }

  /// Names every included symbol. Declarations keep their own name where possible, imports of
  /// packages prefer the name they were imported under.
  fn deconflict(&self) -> (FxHashMap<SymbolRef, String>, Vec<SymbolRef>) {
    let graph = self.graph;
    let reserved = graph
      .modules
      .iter()
      .flat_map(|module| module.ast.unresolved_references.iter().map(String::as_str))
      .collect::<FxHashSet<_>>();
    let mut renamer = Renamer::new(reserved);
    let mut canonical_names = FxHashMap::default();
    let mut externals = vec![];

    let mut ordered = vec![];
    for &idx in &graph.sorted_modules {
      let module = &graph.modules[idx];
      for local in module.ast.imports.keys() {
        if let Some(symbol) = self.resolved_bindings.get(&(idx, local.clone())) {
          if matches!(symbol, SymbolRef::External { .. } | SymbolRef::ExternalNamespace(_)) {
            ordered.push(symbol.clone());
          }
        }
      }
      for local in module.ast.locals.keys() {
        ordered.push(SymbolRef::Local(idx, local.clone()));
      }
    }
    ordered.extend(self.included_symbols.iter().cloned());

    for symbol in ordered {
      if !self.included_symbols.contains(&symbol) || canonical_names.contains_key(&symbol) {
        continue;
      }
      let hint = self.name_hint(&symbol);
      let referencing = self.referencing_modules.get(&symbol);
      let name = renamer.create_conflictless_name(&hint, |candidate| {
        referencing.is_some_and(|modules| {
          modules.iter().any(|idx| graph.modules[*idx].ast.nested_names.contains(candidate))
        })
      });
      if matches!(symbol, SymbolRef::External { .. } | SymbolRef::ExternalNamespace(_)) {
        externals.push(symbol.clone());
      }
      canonical_names.insert(symbol, name);
    }

    (canonical_names, externals)
  }

  fn name_hint(&self, symbol: &SymbolRef) -> String {
    if let SymbolRef::Local(_, name) = symbol {
      return name.clone();
    }
    if let Some(hint) = self.name_hints.get(symbol).filter(|hint| hint.as_str() != "default") {
      return hint.clone();
    }
    match symbol {
      SymbolRef::Local(_, name) => name.clone(),
      SymbolRef::External { imported, .. } if imported != "default" => imported.clone(),
      SymbolRef::External { specifier, .. } | SymbolRef::ExternalNamespace(specifier) => {
        legitimize_identifier_name(specifier).into_owned()
      }
      SymbolRef::Namespace(idx) => {
        let path = &self.graph.modules[*idx].path;
        let file_name = path.file_name().and_then(|name| name.to_str()).unwrap_or("ns");
        let stem = strip_declaration_extension(file_name);
        let stem = Path::new(stem).file_stem().and_then(|stem| stem.to_str()).unwrap_or(stem);
        legitimize_identifier_name(stem).into_owned()
      }
    }
  }
}
