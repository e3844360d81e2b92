use std::path::{Path, PathBuf};

use dtspack_utils::indexmap::FxIndexMap;
use rustc_hash::FxHashMap;

/// Absolute source file path to the absolute path of the declaration emitted for it, in
/// emission order.
#[derive(Debug, Default)]
pub struct DeclarationMap {
  source_to_declaration: FxIndexMap<PathBuf, PathBuf>,
  declaration_to_source: FxHashMap<PathBuf, PathBuf>,
}

impl DeclarationMap {
  pub fn insert(&mut self, source: PathBuf, declaration: PathBuf) {
    self.declaration_to_source.insert(declaration.clone(), source.clone());
    self.source_to_declaration.insert(source, declaration);
  }

  pub fn declaration_of(&self, source: &Path) -> Option<&Path> {
    self.source_to_declaration.get(source).map(PathBuf::as_path)
  }

  pub fn source_of(&self, declaration: &Path) -> Option<&Path> {
    self.declaration_to_source.get(declaration).map(PathBuf::as_path)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&Path, &Path)> {
    self.source_to_declaration.iter().map(|(source, dts)| (source.as_path(), dts.as_path()))
  }

  pub fn len(&self) -> usize {
    self.source_to_declaration.len()
  }

  pub fn is_empty(&self) -> bool {
    self.source_to_declaration.is_empty()
  }
}

#[test]
fn test_declaration_map_lookups() {
  let mut map = DeclarationMap::default();
  map.insert("/p/src/a.ts".into(), "/p/.dtspack/declaration/a.d.ts".into());
  assert_eq!(
    map.declaration_of(Path::new("/p/src/a.ts")),
    Some(Path::new("/p/.dtspack/declaration/a.d.ts"))
  );
  assert_eq!(
    map.source_of(Path::new("/p/.dtspack/declaration/a.d.ts")),
    Some(Path::new("/p/src/a.ts"))
  );
  assert_eq!(map.declaration_of(Path::new("/p/src/b.ts")), None);
  assert_eq!(map.len(), 1);
}
