use super::DeclarationStmt;

/// Collects the leading `/// <reference types|lib="..." />` directives. `path` references point
/// at files that do not survive rolling up and are dropped. Returns the directives and the
/// offset where the directive block ends.
pub fn scan_reference_directives(source: &str) -> (Vec<String>, u32) {
  let mut directives = vec![];
  let mut offset = 0;
  let mut end = 0;
  for line in source.split_inclusive('\n') {
    let trimmed = line.trim();
    if !trimmed.is_empty() && !trimmed.starts_with("//") {
      break;
    }
    offset += line.len();
    if trimmed.starts_with("/// <reference") {
      end = offset;
      if trimmed.contains("types=") || trimmed.contains("lib=") {
        directives.push(trimmed.to_string());
      }
    }
  }
  (directives, u32::try_from(end).unwrap_or(u32::MAX))
}

/// Extends every statement backwards over the comments between it and the previous statement,
/// so doc comments travel with their declaration.
pub fn assign_leading_starts(source: &str, directives_end: u32, stmts: &mut [DeclarationStmt]) {
  let mut prev_end = directives_end;
  for stmt in stmts {
    let start = stmt.span.start;
    if prev_end < start {
      let gap = &source[prev_end as usize..start as usize];
      let whitespace = gap.len() - gap.trim_start().len();
      stmt.leading_start = prev_end + whitespace as u32;
    }
    prev_end = stmt.span.end;
  }
}

#[test]
fn test_scan_reference_directives() {
  let source = "/// <reference types=\"node\" />\n/// <reference path=\"./x.d.ts\" />\nexport {};\n";
  let (directives, end) = scan_reference_directives(source);
  assert_eq!(directives, vec!["/// <reference types=\"node\" />".to_string()]);
  assert_eq!(&source[end as usize..], "export {};\n");
}
