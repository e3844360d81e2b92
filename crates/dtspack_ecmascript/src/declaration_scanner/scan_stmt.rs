use oxc::{
  ast::ast::{
    BindingPatternKind, Declaration, ExportDefaultDeclarationKind, Expression,
    ImportDeclarationSpecifier, ModuleExportName, Statement, StringLiteral, TSModuleDeclarationKind,
    TSModuleDeclarationName, TSModuleReference,
  },
  span::{GetSpan, Span},
};

use super::{
  AnonymousDefault, DeclarationModule, DeclarationStmt, DeclarationStmtKind, ExportBinding,
  ExportTarget, ImportBinding, LocalDeclaration, StarExport,
};
use crate::module_request::ModuleRequest;

const ANONYMOUS_DEFAULT_HINT: &str = "_default";

pub struct StmtScanner<'s> {
  source: &'s str,
  module: DeclarationModule,
  anonymous_default: Option<usize>,
}

impl<'s> StmtScanner<'s> {
  pub fn new(source: &'s str) -> Self {
    Self {
      source,
      module: DeclarationModule {
        source: arcstr::ArcStr::default(),
        requests: vec![],
        stmts: vec![],
        imports: Default::default(),
        exports: Default::default(),
        star_exports: vec![],
        locals: Default::default(),
        references: Default::default(),
        unresolved_references: vec![],
        nested_names: Default::default(),
        reference_directives: vec![],
      },
      anonymous_default: None,
    }
  }

  pub fn scan_stmt(&mut self, stmt: &Statement<'_>) {
    let span = stmt.span();
    let (kind, declared) = match stmt {
      Statement::ImportDeclaration(decl) => {
        let request = self.add_request(&decl.source);
        for specifier in decl.specifiers.iter().flatten() {
          let (local, binding) = match specifier {
            ImportDeclarationSpecifier::ImportSpecifier(spec) => (
              spec.local.name.as_str(),
              ImportBinding::Named {
                request,
                imported: spec.imported.name().to_string(),
                is_type_only: decl.import_kind.is_type() || spec.import_kind.is_type(),
              },
            ),
            ImportDeclarationSpecifier::ImportDefaultSpecifier(spec) => (
              spec.local.name.as_str(),
              ImportBinding::Named {
                request,
                imported: "default".to_string(),
                is_type_only: decl.import_kind.is_type(),
              },
            ),
            ImportDeclarationSpecifier::ImportNamespaceSpecifier(spec) => (
              spec.local.name.as_str(),
              ImportBinding::Namespace { request, is_type_only: decl.import_kind.is_type() },
            ),
          };
          self.module.imports.insert(local.to_string(), binding);
        }
        (DeclarationStmtKind::ModuleSyntax, vec![])
      }
      Statement::ExportNamedDeclaration(decl) => {
        let is_type_only = decl.export_kind.is_type();
        if let Some(source) = &decl.source {
          let request = self.add_request(source);
          for spec in &decl.specifiers {
            self.add_export(
              &spec.exported,
              ExportTarget::ReExport { request, imported: spec.local.name().to_string() },
              spec.span.start,
              is_type_only || spec.export_kind.is_type(),
            );
          }
          (DeclarationStmtKind::ModuleSyntax, vec![])
        } else if let Some(declaration) = &decl.declaration {
          let declared = self.declare(declaration);
          // oxc marks every `export declare ..` as a type export; whether the name is a type is
          // decided by its merged declarations in `locals` instead.
          for name in &declared {
            self.module.exports.insert(
              name.clone(),
              ExportBinding {
                target: ExportTarget::Local(name.clone()),
                position: span.start,
                is_type_only: false,
              },
            );
          }
          let prefix = Span::new(span.start, declaration.span().start);
          (
            DeclarationStmtKind::Declaration {
              export_prefix: Some((prefix, self.declare_keyword_for(declaration))),
              anonymous_default: None,
            },
            declared,
          )
        } else {
          for spec in &decl.specifiers {
            self.add_export(
              &spec.exported,
              ExportTarget::Local(spec.local.name().to_string()),
              spec.span.start,
              is_type_only || spec.export_kind.is_type(),
            );
          }
          (DeclarationStmtKind::ModuleSyntax, vec![])
        }
      }
      Statement::ExportDefaultDeclaration(decl) => self.scan_export_default(span, &decl.declaration),
      Statement::ExportAllDeclaration(decl) => {
        let request = self.add_request(&decl.source);
        let is_type_only = decl.export_kind.is_type();
        if let Some(exported) = &decl.exported {
          self.add_export(
            exported,
            ExportTarget::ReExportNamespace { request },
            span.start,
            is_type_only,
          );
        } else {
          self.module.star_exports.push(StarExport { request, position: span.start, is_type_only });
        }
        (DeclarationStmtKind::ModuleSyntax, vec![])
      }
      Statement::TSExportAssignment(_) => (DeclarationStmtKind::Unsupported("export ="), vec![]),
      // `export as namespace X` only matters for UMD globals of a single file.
      Statement::TSNamespaceExportDeclaration(_) => (DeclarationStmtKind::ModuleSyntax, vec![]),
      Statement::TSImportEqualsDeclaration(decl) => match &decl.module_reference {
        TSModuleReference::ExternalModuleReference(reference) => {
          let request = self.add_request(&reference.expression);
          self.module.imports.insert(
            decl.id.name.to_string(),
            ImportBinding::Namespace { request, is_type_only: decl.import_kind.is_type() },
          );
          (DeclarationStmtKind::ModuleSyntax, vec![])
        }
        _ => {
          let declared = self.declare_name(&decl.id.name, decl.id.span, false);
          (plain_declaration(), declared)
        }
      },
      _ => match stmt.as_declaration() {
        Some(declaration) => {
          let declared = self.declare(declaration);
          if declared.is_empty() {
            (DeclarationStmtKind::Ambient, declared)
          } else {
            (plain_declaration(), declared)
          }
        }
        None => (DeclarationStmtKind::Ambient, vec![]),
      },
    };

    self.module.stmts.push(DeclarationStmt {
      span,
      leading_start: span.start,
      kind,
      declared,
      referenced: Default::default(),
    });
  }

  fn scan_export_default(
    &mut self,
    span: Span,
    declaration: &ExportDefaultDeclarationKind<'_>,
  ) -> (DeclarationStmtKind, Vec<String>) {
    let (id, keyword, declaration_span, is_type) = match declaration {
      ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
        (func.id.as_ref(), "function", func.span, false)
      }
      ExportDefaultDeclarationKind::ClassDeclaration(class) => {
        (class.id.as_ref(), "class", class.span, false)
      }
      ExportDefaultDeclarationKind::TSInterfaceDeclaration(interface) => {
        (Some(&interface.id), "interface", interface.span, true)
      }
      kind => {
        if let Some(Expression::Identifier(ident)) = kind.as_expression() {
          self.module.exports.insert(
            "default".to_string(),
            ExportBinding {
              target: ExportTarget::Local(ident.name.to_string()),
              position: span.start,
              is_type_only: false,
            },
          );
          return (DeclarationStmtKind::ModuleSyntax, vec![]);
        }
        return (DeclarationStmtKind::Unsupported("export default <expression>"), vec![]);
      }
    };

    let prefix = Span::new(span.start, declaration_span.start);
    let replacement = if is_type { "" } else { self.declare_keyword_at(declaration_span.start) };

    let (declared, anonymous_default) = if let Some(id) = id {
      (self.declare_name(&id.name, id.span, is_type), None)
    } else {
      let text = &self.source[declaration_span.start as usize..declaration_span.end as usize];
      let insert_at = text
        .find(keyword)
        .map_or(declaration_span.start, |index| declaration_span.start + (index + keyword.len()) as u32);
      self.anonymous_default = Some(self.module.stmts.len());
      // Named once every top-level binding is known.
      (vec![], Some(AnonymousDefault { local: String::new(), insert_at }))
    };

    if let Some(local) = declared.first() {
      self.module.exports.insert(
        "default".to_string(),
        ExportBinding {
          target: ExportTarget::Local(local.clone()),
          position: span.start,
          is_type_only: is_type,
        },
      );
    }

    (
      DeclarationStmtKind::Declaration {
        export_prefix: Some((prefix, replacement)),
        anonymous_default,
      },
      declared,
    )
  }

  /// Registers the names a declaration binds at the top level.
  fn declare(&mut self, declaration: &Declaration<'_>) -> Vec<String> {
    match declaration {
      Declaration::VariableDeclaration(decl) => decl
        .declarations
        .iter()
        .filter_map(|declarator| match &declarator.id.kind {
          BindingPatternKind::BindingIdentifier(id) => Some((id.name.as_str(), id.span)),
          _ => None,
        })
        .flat_map(|(name, span)| self.declare_name(name, span, false))
        .collect(),
      Declaration::FunctionDeclaration(func) => {
        func.id.as_ref().map(|id| self.declare_name(&id.name, id.span, false)).unwrap_or_default()
      }
      Declaration::ClassDeclaration(class) => {
        class.id.as_ref().map(|id| self.declare_name(&id.name, id.span, false)).unwrap_or_default()
      }
      Declaration::TSTypeAliasDeclaration(decl) => self.declare_name(&decl.id.name, decl.id.span, true),
      Declaration::TSInterfaceDeclaration(decl) => self.declare_name(&decl.id.name, decl.id.span, true),
      Declaration::TSEnumDeclaration(decl) => self.declare_name(&decl.id.name, decl.id.span, false),
      // `declare global {}` augments the global scope and binds no name of its own.
      Declaration::TSModuleDeclaration(decl)
        if matches!(decl.kind, TSModuleDeclarationKind::Global) =>
      {
        vec![]
      }
      Declaration::TSModuleDeclaration(decl) => match &decl.id {
        TSModuleDeclarationName::Identifier(id) => self.declare_name(&id.name, id.span, false),
        TSModuleDeclarationName::StringLiteral(_) => vec![],
      },
      Declaration::TSImportEqualsDeclaration(decl) => {
        self.declare_name(&decl.id.name, decl.id.span, false)
      }
    }
  }

  fn declare_name(&mut self, name: &str, span: Span, is_type: bool) -> Vec<String> {
    let local = self
      .module
      .locals
      .entry(name.to_string())
      .or_insert_with(|| LocalDeclaration { spans: vec![], is_type_only: true });
    local.spans.push(span);
    local.is_type_only &= is_type;
    vec![name.to_string()]
  }

  /// Top-level value declarations of a declaration file need `declare` once `export` is gone.
  fn declare_keyword_for(&self, declaration: &Declaration<'_>) -> &'static str {
    match declaration {
      Declaration::TSTypeAliasDeclaration(_)
      | Declaration::TSInterfaceDeclaration(_)
      | Declaration::TSImportEqualsDeclaration(_) => "",
      _ => self.declare_keyword_at(declaration.span().start),
    }
  }

  fn declare_keyword_at(&self, offset: u32) -> &'static str {
    if self.source[offset as usize..].starts_with("declare ") { "" } else { "declare " }
  }

  fn add_request(&mut self, source: &StringLiteral<'_>) -> usize {
    let requests = &mut self.module.requests;
    if let Some(index) = requests.iter().position(|request| request.specifier == source.value.as_str()) {
      return index;
    }
    requests.push(ModuleRequest { specifier: source.value.to_string(), span: source.span });
    requests.len() - 1
  }

  fn add_export(
    &mut self,
    exported: &ModuleExportName<'_>,
    target: ExportTarget,
    position: u32,
    is_type_only: bool,
  ) {
    self
      .module
      .exports
      .insert(exported.name().to_string(), ExportBinding { target, position, is_type_only });
  }

  pub fn finish(mut self, source: &arcstr::ArcStr, reference_directives: Vec<String>) -> DeclarationModule {
    if let Some(stmt_index) = self.anonymous_default.take() {
      let mut local = ANONYMOUS_DEFAULT_HINT.to_string();
      let mut count = 0u32;
      while self.module.has_binding(&local) {
        count += 1;
        local = format!("{ANONYMOUS_DEFAULT_HINT}${count}");
      }
      self.module.locals.insert(local.clone(), LocalDeclaration { spans: vec![], is_type_only: false });
      let position = self.module.stmts[stmt_index].span.start;
      self.module.exports.insert(
        "default".to_string(),
        ExportBinding { target: ExportTarget::Local(local.clone()), position, is_type_only: false },
      );
      let stmt = &mut self.module.stmts[stmt_index];
      stmt.declared.push(local.clone());
      if let DeclarationStmtKind::Declaration { anonymous_default: Some(anonymous), .. } =
        &mut stmt.kind
      {
        anonymous.local = local;
      }
    }

    self.module.source = source.clone();
    self.module.reference_directives = reference_directives;
    self.module
  }
}

fn plain_declaration() -> DeclarationStmtKind {
  DeclarationStmtKind::Declaration { export_prefix: None, anonymous_default: None }
}
