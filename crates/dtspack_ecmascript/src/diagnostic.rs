use dtspack_error::Diagnostic;
use oxc::diagnostics::OxcDiagnostic;

/// 1-based line and column of the byte `offset` in `source`.
pub fn line_column(source: &str, offset: usize) -> (usize, usize) {
  let mut offset = offset.min(source.len());
  while !source.is_char_boundary(offset) {
    offset -= 1;
  }
  let before = &source[..offset];
  let line = before.matches('\n').count() + 1;
  let line_start = before.rfind('\n').map_or(0, |index| index + 1);
  let column = before[line_start..].chars().count() + 1;
  (line, column)
}

pub fn to_diagnostic(file: &str, source: &str, error: &OxcDiagnostic) -> Diagnostic {
  let offset = error.labels.as_ref().and_then(|labels| labels.first()).map_or(0, |label| label.offset());
  let (line, column) = line_column(source, offset);
  Diagnostic { file: file.to_string(), line, column, message: error.message.to_string() }
}

#[test]
fn test_line_column() {
  let source = "const a = 1;\nexport function foo() {}\n";
  assert_eq!(line_column(source, 0), (1, 1));
  assert_eq!(line_column(source, 6), (1, 7));
  assert_eq!(line_column(source, 13), (2, 1));
  assert_eq!(line_column(source, 29), (2, 17));
  assert_eq!(line_column(source, 10_000), (3, 1));
}
