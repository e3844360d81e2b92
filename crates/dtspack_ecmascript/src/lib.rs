mod declaration_scanner;
mod diagnostic;
mod ecma_compiler;
mod module_request;

pub use crate::{
  declaration_scanner::{
    AnonymousDefault, DeclarationModule, DeclarationStmt, DeclarationStmtKind, ExportBinding,
    ExportTarget, ImportBinding, LocalDeclaration, StarExport,
  },
  diagnostic::{line_column, to_diagnostic},
  ecma_compiler::{EcmaCompiler, SourceCompileReturn},
  module_request::ModuleRequest,
};
