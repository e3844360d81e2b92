use std::{
  fs, io,
  path::{Path, PathBuf},
};

use walkdir::WalkDir;

use crate::FileSystem;

#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
  }

  fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
  }

  fn remove_file(&self, path: &Path) -> io::Result<()> {
    fs::remove_file(path)
  }

  fn create_dir_all(&self, path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
  }

  fn exists(&self, path: &Path) -> bool {
    path.exists()
  }

  fn walk_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
      return Ok(vec![]);
    }
    let mut files = vec![];
    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
      let entry = entry?;
      if entry.file_type().is_file() {
        files.push(entry.into_path());
      }
    }
    Ok(files)
  }
}
