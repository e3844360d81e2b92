//! Helpers for the three declaration file flavours: `.d.ts`, `.d.mts` and `.d.cts`.

use std::path::{Path, PathBuf};

pub const DECLARATION_EXTENSIONS: [&str; 3] = [".d.ts", ".d.mts", ".d.cts"];

pub fn is_declaration_file(path: &Path) -> bool {
  path
    .file_name()
    .and_then(|name| name.to_str())
    .is_some_and(|name| DECLARATION_EXTENSIONS.iter().any(|ext| name.ends_with(ext)))
}

/// Strips a trailing `.d.ts`/`.d.mts`/`.d.cts` from a path or specifier.
pub fn strip_declaration_extension(specifier: &str) -> &str {
  DECLARATION_EXTENSIONS
    .iter()
    .find_map(|ext| specifier.strip_suffix(ext))
    .unwrap_or(specifier)
}

/// Maps a source file to the declaration file name the emitter writes for it.
pub fn declaration_file_name(source: &Path) -> PathBuf {
  if is_declaration_file(source) {
    return source.to_path_buf();
  }
  let ext = match source.extension().and_then(|ext| ext.to_str()) {
    Some("mts") => "d.mts",
    Some("cts") => "d.cts",
    _ => "d.ts",
  };
  source.with_extension(ext)
}

#[test]
fn test_strip_declaration_extension() {
  assert_eq!(strip_declaration_extension("./declaration/index.d.ts"), "./declaration/index");
  assert_eq!(strip_declaration_extension("./a.d.mts"), "./a");
  assert_eq!(strip_declaration_extension("./a.d.cts"), "./a");
  assert_eq!(strip_declaration_extension("./a.ts"), "./a.ts");
}

#[test]
fn test_declaration_file_name() {
  assert_eq!(declaration_file_name(Path::new("src/a.ts")), Path::new("src/a.d.ts"));
  assert_eq!(declaration_file_name(Path::new("src/a.tsx")), Path::new("src/a.d.ts"));
  assert_eq!(declaration_file_name(Path::new("src/a.mts")), Path::new("src/a.d.mts"));
  assert_eq!(declaration_file_name(Path::new("src/a.cts")), Path::new("src/a.d.cts"));
  assert_eq!(declaration_file_name(Path::new("src/a.d.ts")), Path::new("src/a.d.ts"));
  assert!(is_declaration_file(Path::new("x/_dtspack-aggregation.dmts.d.ts")));
}
