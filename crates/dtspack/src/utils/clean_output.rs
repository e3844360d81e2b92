use std::path::{Path, PathBuf};

use anyhow::Context;
use dtspack_fs::FileSystem;
use sugar_path::SugarPath;

const DECLARATION_GLOB: &str = "**/*.d.{ts,mts,cts}";

/// Deletes every declaration file below `dir`, leaving everything else in place.
pub fn clean_declarations(fs: &dyn FileSystem, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
  let mut removed = vec![];
  for file in fs.walk_files(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
    let relative = file.relative(dir).to_slash_lossy().into_owned();
    if fast_glob::glob_match(DECLARATION_GLOB, relative.as_str()) {
      fs.remove_file(&file).with_context(|| format!("Failed to remove {}", file.display()))?;
      removed.push(file);
    }
  }
  tracing::debug!("Cleaned {} declaration file(s) from {}", removed.len(), dir.display());
  Ok(removed)
}

/// Creates the cache directory together with a `.gitignore` that ignores all of it.
pub fn prepare_cache_dir(fs: &dyn FileSystem, cache_dir: &Path) -> anyhow::Result<()> {
  fs.create_dir_all(cache_dir)
    .with_context(|| format!("Failed to create cache directory {}", cache_dir.display()))?;
  let gitignore = cache_dir.join(".gitignore");
  if !fs.exists(&gitignore) {
    fs.write(&gitignore, b"*\n")
      .with_context(|| format!("Failed to write {}", gitignore.display()))?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use dtspack_fs::OsFileSystem;

  use super::*;

  #[test]
  fn removes_only_declaration_files() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    for file in ["index.d.ts", "index.js", "cli/main.d.mts", "cli/main.d.cts", "style.css"] {
      OsFileSystem.write(&root.join(file), b"").unwrap();
    }

    let removed = clean_declarations(&OsFileSystem, root).unwrap();

    assert_eq!(removed.len(), 3);
    assert!(root.join("index.js").exists());
    assert!(root.join("style.css").exists());
    assert!(!root.join("index.d.ts").exists());
    assert!(!root.join("cli/main.d.mts").exists());
  }

  #[test]
  fn missing_directory_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(clean_declarations(&OsFileSystem, &dir.path().join("dist")).unwrap().is_empty());
  }

  #[test]
  fn cache_dir_ignores_itself() {
    let dir = tempfile::tempdir().unwrap();
    let cache_dir = dir.path().join(".dtspack");
    prepare_cache_dir(&OsFileSystem, &cache_dir).unwrap();
    assert_eq!(std::fs::read_to_string(cache_dir.join(".gitignore")).unwrap(), "*\n");
  }
}
