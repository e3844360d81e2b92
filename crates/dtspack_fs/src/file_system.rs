use std::{
  io,
  path::{Path, PathBuf},
};

/// File system access needed by the declaration pipeline. Writes always create missing parent
/// directories.
pub trait FileSystem: Send + Sync {
  fn read_to_string(&self, path: &Path) -> io::Result<String>;

  fn write(&self, path: &Path, content: &[u8]) -> io::Result<()>;

  fn remove_file(&self, path: &Path) -> io::Result<()>;

  fn create_dir_all(&self, path: &Path) -> io::Result<()>;

  fn exists(&self, path: &Path) -> bool;

  /// Every regular file below `dir`, depth first in file name order. A missing `dir` yields an
  /// empty list.
  fn walk_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;
}
