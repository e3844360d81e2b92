use oxc::{
  ast::ast::{Declaration, Statement, TSModuleReference},
  span::Span,
};

/// A module specifier written in an `import`/`export … from`/`import x = require(…)`.
#[derive(Debug, Clone)]
pub struct ModuleRequest {
  pub specifier: String,
  pub span: Span,
}

/// Collects the unique module requests of a program in source order.
pub fn collect_module_requests(body: &[Statement<'_>]) -> Vec<ModuleRequest> {
  let mut requests: Vec<ModuleRequest> = vec![];
  let mut add = |specifier: &str, span: Span| {
    if !requests.iter().any(|request| request.specifier == specifier) {
      requests.push(ModuleRequest { specifier: specifier.to_string(), span });
    }
  };

  for stmt in body {
    match stmt {
      Statement::ImportDeclaration(decl) => add(&decl.source.value, decl.source.span),
      Statement::ExportAllDeclaration(decl) => add(&decl.source.value, decl.source.span),
      Statement::ExportNamedDeclaration(decl) => {
        if let Some(source) = &decl.source {
          add(&source.value, source.span);
        } else if let Some(Declaration::TSImportEqualsDeclaration(import_equals)) = &decl.declaration
        {
          if let TSModuleReference::ExternalModuleReference(reference) =
            &import_equals.module_reference
          {
            add(&reference.expression.value, reference.expression.span);
          }
        }
      }
      Statement::TSImportEqualsDeclaration(decl) => {
        if let TSModuleReference::ExternalModuleReference(reference) = &decl.module_reference {
          add(&reference.expression.value, reference.expression.span);
        }
      }
      _ => {}
    }
  }

  requests
}
