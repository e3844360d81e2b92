use std::{
  path::{Path, PathBuf},
  rc::Rc,
};

use dtspack_ecmascript::DeclarationModule;
use dtspack_error::BuildResult;
use oxc_index::IndexVec;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::utils::declaration_loader::{DeclarationLoader, DeclarationRequest};

oxc_index::define_index_type! {
  pub struct ModuleIdx = u32;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestTarget {
  Internal(ModuleIdx),
  External(String),
}

#[derive(Debug)]
pub struct GraphModule {
  pub path: PathBuf,
  pub ast: Rc<DeclarationModule>,
  /// Target of each entry of `ast.requests`.
  pub requests: Vec<RequestTarget>,
}

impl GraphModule {
  pub fn request_target(&self, request: usize) -> &RequestTarget {
    &self.requests[request]
  }
}

/// Every declaration reachable from the aggregation file.
#[derive(Debug)]
pub struct ModuleGraph {
  pub modules: IndexVec<ModuleIdx, GraphModule>,
  pub entry: ModuleIdx,
  /// Dependencies before their importers; the entry comes last.
  pub sorted_modules: Vec<ModuleIdx>,
}

#[derive(PartialEq, Eq, Debug)]
enum Status {
  ToBeExecuted(ModuleIdx),
  WaitForExit(ModuleIdx),
}

impl ModuleGraph {
  pub fn build(
    loader: &DeclarationLoader,
    aggregation_path: &Path,
    aggregation_source: &str,
  ) -> BuildResult<Self> {
    let entry_ast = Rc::new(DeclarationModule::scan(aggregation_path, aggregation_source)?);

    let mut modules = IndexVec::<ModuleIdx, GraphModule>::new();
    let mut path_to_idx = FxHashMap::default();
    let entry = modules.push(GraphModule {
      path: aggregation_path.to_path_buf(),
      ast: entry_ast,
      requests: vec![],
    });
    path_to_idx.insert(aggregation_path.to_path_buf(), entry);

    let mut pending = vec![entry];
    while let Some(idx) = pending.pop() {
      let importer = modules[idx].path.clone();
      let ast = Rc::clone(&modules[idx].ast);
      let mut requests = Vec::with_capacity(ast.requests.len());
      for request in &ast.requests {
        let target = match loader.resolve(&importer, &request.specifier)? {
          DeclarationRequest::Internal(path) => {
            let target_idx = match path_to_idx.get(&path) {
              Some(target_idx) => *target_idx,
              None => {
                let target_idx = modules.push(GraphModule {
                  ast: loader.load(&path)?,
                  path: path.clone(),
                  requests: vec![],
                });
                path_to_idx.insert(path, target_idx);
                pending.push(target_idx);
                target_idx
              }
            };
            RequestTarget::Internal(target_idx)
          }
          DeclarationRequest::External => RequestTarget::External(request.specifier.clone()),
        };
        requests.push(target);
      }
      modules[idx].requests = requests;
    }

    let sorted_modules = Self::sort_modules(&modules, entry);
    tracing::debug!("Linking {} declaration module(s)", modules.len());
    Ok(Self { modules, entry, sorted_modules })
  }

  /// Post-order walk over internal requests, so a module comes after everything it imports
  /// unless they form a cycle.
  fn sort_modules(modules: &IndexVec<ModuleIdx, GraphModule>, entry: ModuleIdx) -> Vec<ModuleIdx> {
    let mut execution_stack = vec![Status::ToBeExecuted(entry)];
    let mut executed_ids = FxHashSet::default();
    let mut sorted_modules = Vec::with_capacity(modules.len());

    while let Some(status) = execution_stack.pop() {
      match status {
        Status::ToBeExecuted(id) => {
          if executed_ids.insert(id) {
            execution_stack.push(Status::WaitForExit(id));
            execution_stack.extend(
              modules[id]
                .requests
                .iter()
                .filter_map(|target| match target {
                  RequestTarget::Internal(idx) => Some(*idx),
                  RequestTarget::External(_) => None,
                })
                .rev()
                .map(Status::ToBeExecuted),
            );
          }
        }
        Status::WaitForExit(id) => sorted_modules.push(id),
      }
    }

    sorted_modules
  }
}
