use std::path::Path;

use dtspack_error::Diagnostic;
use oxc::{
  allocator::Allocator,
  codegen::Codegen,
  isolated_declarations::{IsolatedDeclarations, IsolatedDeclarationsOptions},
  parser::Parser,
  semantic::SemanticBuilder,
  span::SourceType,
};

use crate::{
  diagnostic::to_diagnostic,
  module_request::{ModuleRequest, collect_module_requests},
};

pub struct EcmaCompiler;

/// Result of checking one program file and emitting its declaration.
#[derive(Debug, Default)]
pub struct SourceCompileReturn {
  /// `None` when the file could not be parsed far enough to emit anything.
  pub declaration: Option<String>,
  pub requests: Vec<ModuleRequest>,
  pub diagnostics: Vec<Diagnostic>,
}

impl EcmaCompiler {
  pub fn source_type_of(path: &Path) -> Option<SourceType> {
    SourceType::from_path(path).ok().filter(|source_type| source_type.is_typescript())
  }

  /// Parses and checks a TypeScript file and emits its declaration with isolated declaration
  /// rules. Declaration files are parsed for their requests and passed through unchanged.
  pub fn compile_source(
    path: &Path,
    display_name: &str,
    source_text: &str,
    strip_internal: bool,
  ) -> SourceCompileReturn {
    let mut ret = SourceCompileReturn::default();

    let Some(source_type) = Self::source_type_of(path) else {
      ret.diagnostics.push(Diagnostic {
        file: display_name.to_string(),
        line: 1,
        column: 1,
        message: "Only TypeScript files can be part of the declaration program".to_string(),
      });
      return ret;
    };

    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, source_text, source_type).parse();
    ret.diagnostics.extend(
      parsed.errors.iter().map(|error| to_diagnostic(display_name, source_text, error)),
    );
    if parsed.panicked {
      return ret;
    }

    ret.requests = collect_module_requests(&parsed.program.body);

    // Definition files carry no bodies to check and bind nothing semantically.
    if source_type.is_typescript_definition() {
      ret.declaration = Some(source_text.to_string());
      return ret;
    }

    let semantic = SemanticBuilder::new().with_check_syntax_error(true).build(&parsed.program);
    ret.diagnostics.extend(
      semantic.errors.iter().map(|error| to_diagnostic(display_name, source_text, error)),
    );

    let emitted = IsolatedDeclarations::new(&allocator, IsolatedDeclarationsOptions { strip_internal })
      .build(&parsed.program);
    ret.diagnostics.extend(
      emitted.errors.iter().map(|error| to_diagnostic(display_name, source_text, error)),
    );
    ret.declaration = Some(Codegen::new().build(&emitted.program).code);

    ret
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn emits_declaration_and_collects_requests() {
    let source = "import { b } from './b';\nexport function foo(): number { return b; }\nexport * from 'external-package';\n";
    let ret = EcmaCompiler::compile_source(Path::new("a.ts"), "a.ts", source, false);
    assert!(ret.diagnostics.is_empty(), "{:?}", ret.diagnostics);
    let declaration = ret.declaration.unwrap();
    assert!(declaration.contains("export declare function foo(): number;"), "{declaration}");
    let specifiers = ret.requests.iter().map(|r| r.specifier.as_str()).collect::<Vec<_>>();
    assert_eq!(specifiers, vec!["./b", "external-package"]);
  }

  #[test]
  fn reports_missing_type_annotation_with_position() {
    let source = "export const seed = Math.random();\n";
    let ret = EcmaCompiler::compile_source(Path::new("a.ts"), "src/a.ts", source, false);
    assert!(!ret.diagnostics.is_empty());
    assert_eq!(ret.diagnostics[0].file, "src/a.ts");
    assert_eq!(ret.diagnostics[0].line, 1);
  }

  #[test]
  fn reports_syntax_errors() {
    let ret = EcmaCompiler::compile_source(Path::new("a.ts"), "a.ts", "export const = ;", false);
    assert!(!ret.diagnostics.is_empty());
  }

  #[test]
  fn passes_declaration_files_through() {
    let source = "import type { B } from './b';\nexport declare const a: B;\n";
    let ret = EcmaCompiler::compile_source(Path::new("a.d.ts"), "a.d.ts", source, false);
    assert!(ret.diagnostics.is_empty());
    assert_eq!(ret.declaration.as_deref(), Some(source));
    assert_eq!(ret.requests.len(), 1);
    assert_eq!(ret.requests[0].specifier, "./b");
  }

  #[test]
  fn reports_redeclarations_in_sources() {
    let source = "export let a: number = 1;\nexport let a: number = 2;\n";
    let ret = EcmaCompiler::compile_source(Path::new("a.ts"), "a.ts", source, false);
    assert!(
      ret.diagnostics.iter().any(|diagnostic| diagnostic.message.contains("already been declared")),
      "{:?}",
      ret.diagnostics
    );
  }
}
