//! Reads an emitted declaration file into plain data: the bindings it imports, the names it
//! exports, its top-level declarations and where each binding is referenced. Nothing outside
//! this module touches the oxc AST of a declaration file.

mod scan_stmt;
mod trivia;

use std::path::Path;

use arcstr::ArcStr;
use dtspack_error::DtsError;
use dtspack_utils::indexmap::{FxIndexMap, FxIndexSet};
use oxc::{
  allocator::Allocator,
  parser::Parser,
  semantic::SemanticBuilder,
  span::{GetSpan, SourceType, Span},
};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{diagnostic::to_diagnostic, module_request::ModuleRequest};

use self::scan_stmt::StmtScanner;

#[derive(Debug)]
pub struct DeclarationModule {
  pub source: ArcStr,
  pub requests: Vec<ModuleRequest>,
  pub stmts: Vec<DeclarationStmt>,
  /// Local name to the binding it imports.
  pub imports: FxIndexMap<String, ImportBinding>,
  /// Exported name to what it exports, in source order.
  pub exports: FxIndexMap<String, ExportBinding>,
  pub star_exports: Vec<StarExport>,
  /// Top-level declared names, merged across redeclarations.
  pub locals: FxIndexMap<String, LocalDeclaration>,
  /// Spans of every reference to a top-level binding, keyed by the binding's name.
  pub references: FxHashMap<String, Vec<Span>>,
  /// Names referenced without any declaration in this file, e.g. `Promise`.
  pub unresolved_references: Vec<String>,
  /// Names bound in any non-root scope: type parameters, parameters, namespace members.
  pub nested_names: FxHashSet<String>,
  /// `/// <reference types=".." />` and `/// <reference lib=".." />` lines.
  pub reference_directives: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum ImportBinding {
  /// `import { imported as local }`, `import local from` (imported is `default`).
  Named { request: usize, imported: String, is_type_only: bool },
  /// `import * as local from`, `import local = require(..)`.
  Namespace { request: usize, is_type_only: bool },
}

impl ImportBinding {
  pub fn request(&self) -> usize {
    match self {
      Self::Named { request, .. } | Self::Namespace { request, .. } => *request,
    }
  }

  pub fn is_type_only(&self) -> bool {
    match self {
      Self::Named { is_type_only, .. } | Self::Namespace { is_type_only, .. } => *is_type_only,
    }
  }
}

#[derive(Debug, Clone)]
pub struct ExportBinding {
  pub target: ExportTarget,
  /// Source offset of the exporting statement or specifier.
  pub position: u32,
  pub is_type_only: bool,
}

#[derive(Debug, Clone)]
pub enum ExportTarget {
  /// Exports a top-level binding of this module, which may itself be an import.
  Local(String),
  ReExport { request: usize, imported: String },
  ReExportNamespace { request: usize },
}

#[derive(Debug, Clone)]
pub struct StarExport {
  pub request: usize,
  pub position: u32,
  pub is_type_only: bool,
}

#[derive(Debug, Clone, Default)]
pub struct LocalDeclaration {
  /// Binding identifier spans of every declaration merged into this name. Empty for the
  /// synthetic name of an anonymous default export.
  pub spans: Vec<Span>,
  /// Only interfaces and type aliases declare this name.
  pub is_type_only: bool,
}

#[derive(Debug)]
pub struct DeclarationStmt {
  pub span: Span,
  /// Start of the statement including the comments right before it.
  pub leading_start: u32,
  pub kind: DeclarationStmtKind,
  pub declared: Vec<String>,
  /// Top-level bindings referenced from inside this statement.
  pub referenced: FxIndexSet<String>,
}

#[derive(Debug)]
pub enum DeclarationStmtKind {
  /// Imports and exports without a declaration; consumed by linking, never rendered.
  ModuleSyntax,
  Declaration {
    /// `export `/`export default ` prefix and the text that replaces it.
    export_prefix: Option<(Span, &'static str)>,
    anonymous_default: Option<AnonymousDefault>,
  },
  /// Statements declaring no binding, e.g. `declare global {}` or `declare module 'x' {}`.
  Ambient,
  Unsupported(&'static str),
}

#[derive(Debug)]
pub struct AnonymousDefault {
  pub local: String,
  /// Offset right after the `function`/`class` keyword where the name goes.
  pub insert_at: u32,
}

impl DeclarationModule {
  pub fn scan(path: &Path, source: impl Into<ArcStr>) -> Result<Self, DtsError> {
    let source: ArcStr = source.into();
    let display_name = path.to_string_lossy();
    let source_type = SourceType::from_path(path)
      .ok()
      .filter(|source_type| source_type.is_typescript_definition())
      .unwrap_or_else(|| SourceType::mjs().with_typescript(true).with_typescript_definition(true));

    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, &source, source_type).parse();
    if !parsed.errors.is_empty() {
      return Err(DtsError::Compilation(
        parsed.errors.iter().map(|error| to_diagnostic(&display_name, &source, error)).collect(),
      ));
    }

    // The semantic builder binds nothing in definition files, so the same text is analyzed as a
    // plain TypeScript module. Spans are shared between both parses.
    let analysis_allocator = Allocator::default();
    let analyzed = Parser::new(&analysis_allocator, &source, SourceType::ts()).parse();
    if analyzed.panicked {
      return Err(DtsError::Compilation(
        analyzed.errors.iter().map(|error| to_diagnostic(&display_name, &source, error)).collect(),
      ));
    }
    let program = analyzed.program;

    let (reference_directives, directives_end) = trivia::scan_reference_directives(&source);

    let mut scanner = StmtScanner::new(&source);
    for stmt in &program.body {
      scanner.scan_stmt(stmt);
    }
    let mut module = scanner.finish(&source, reference_directives);
    trivia::assign_leading_starts(&source, directives_end, &mut module.stmts);

    let semantic = SemanticBuilder::new().build(&program).semantic;
    let scoping = semantic.scoping();
    let nodes = semantic.nodes();

    let root_names = module.locals.keys().chain(module.imports.keys()).cloned().collect::<Vec<_>>();
    for name in root_names {
      let Some(symbol_id) = scoping.get_root_binding(&name) else {
        continue;
      };
      let spans = scoping
        .get_resolved_reference_ids(symbol_id)
        .iter()
        .map(|reference_id| nodes.get_node(scoping.get_reference(*reference_id).node_id()).kind().span())
        .collect::<Vec<_>>();
      for span in &spans {
        if let Some(stmt) = module.stmt_containing_mut(span.start) {
          stmt.referenced.insert(name.clone());
        }
      }
      module.references.insert(name, spans);
    }

    let mut unresolved =
      scoping.root_unresolved_references().keys().map(ToString::to_string).collect::<Vec<_>>();
    unresolved.sort_unstable();
    module.unresolved_references = unresolved;

    let root_symbol_ids =
      scoping.get_bindings(scoping.root_scope_id()).values().copied().collect::<FxHashSet<_>>();
    module.nested_names = scoping
      .symbol_ids()
      .zip(scoping.symbol_names())
      .filter(|(symbol_id, _)| !root_symbol_ids.contains(symbol_id))
      .map(|(_, name)| name.to_string())
      .collect();

    Ok(module)
  }

  pub fn text(&self, span: Span) -> &str {
    &self.source[span.start as usize..span.end as usize]
  }

  fn stmt_containing_mut(&mut self, offset: u32) -> Option<&mut DeclarationStmt> {
    let index = self.stmts.partition_point(|stmt| stmt.span.end <= offset);
    self.stmts.get_mut(index).filter(|stmt| stmt.span.start <= offset)
  }

  /// Whether `name` is bound at the top level, either declared or imported.
  pub fn has_binding(&self, name: &str) -> bool {
    self.locals.contains_key(name) || self.imports.contains_key(name)
  }
}

#[cfg(test)]
mod tests;
