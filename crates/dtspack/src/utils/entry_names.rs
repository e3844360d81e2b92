use std::path::{Component, Path, PathBuf};

use dtspack_common::InputItem;
use dtspack_utils::dts_path::strip_declaration_extension;
use sugar_path::SugarPath;

/// Output names of the distribution files, one per entry. An explicit `InputItem::name` wins;
/// otherwise the entry path relative to the common directory of all entries, without its
/// extension.
pub fn entry_names(input: &[InputItem], entries: &[PathBuf]) -> Vec<String> {
  let base = common_dir(entries.iter().filter_map(|entry| entry.parent()));
  input
    .iter()
    .zip(entries)
    .map(|(item, entry)| {
      item.name.clone().unwrap_or_else(|| {
        let relative = entry.relative(&base).to_slash_lossy().into_owned();
        let without_dts = strip_declaration_extension(&relative);
        if without_dts.len() != relative.len() {
          return without_dts.to_string();
        }
        match Path::new(without_dts).extension() {
          Some(ext) => without_dts[..without_dts.len() - ext.len() - 1].to_string(),
          None => without_dts.to_string(),
        }
      })
    })
    .collect()
}

/// Deepest directory containing every path in `dirs`.
pub fn common_dir<'a>(dirs: impl IntoIterator<Item = &'a Path>) -> PathBuf {
  let mut dirs = dirs.into_iter();
  let Some(first) = dirs.next() else {
    return PathBuf::new();
  };
  let mut common = first.components().collect::<Vec<Component>>();
  for dir in dirs {
    let matching =
      common.iter().zip(dir.components()).take_while(|(left, right)| **left == *right).count();
    common.truncate(matching);
  }
  common.into_iter().collect()
}

#[test]
fn test_entry_names() {
  let entries = [PathBuf::from("/p/src/index.ts"), PathBuf::from("/p/src/cli/main.mts")];
  let input = [InputItem::from("src/index.ts"), InputItem::from("src/cli/main.mts")];
  assert_eq!(entry_names(&input, &entries), vec!["index", "cli/main"]);

  let named = [InputItem { name: Some("public".into()), import: "src/index.ts".into() }];
  assert_eq!(entry_names(&named, &entries[..1]), vec!["public"]);

  let dts = [PathBuf::from("/p/types/globals.d.ts")];
  assert_eq!(entry_names(&[InputItem::from("types/globals.d.ts")], &dts), vec!["globals"]);
}

#[test]
fn test_common_dir() {
  let dirs = [Path::new("/p/src/a"), Path::new("/p/src/b/c"), Path::new("/p/src")];
  assert_eq!(common_dir(dirs), PathBuf::from("/p/src"));
  assert_eq!(common_dir([Path::new("/p/src")]), PathBuf::from("/p/src"));
}
