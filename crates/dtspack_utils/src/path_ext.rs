use std::path::Path;

use sugar_path::SugarPath;

pub trait PathExt {
  fn expect_to_str(&self) -> &str;

  fn expect_to_slash(&self) -> String;

  /// Relative module specifier from the directory `from_dir` to this path, always starting
  /// with `./` or `../` so it can never be mistaken for a bare package name.
  fn relative_specifier(&self, from_dir: &Path) -> String;
}

impl PathExt for std::path::Path {
  fn expect_to_str(&self) -> &str {
    self.to_str().unwrap_or_else(|| {
      panic!("Failed to convert {:?} to valid utf8 str", self.display());
    })
  }

  fn expect_to_slash(&self) -> String {
    self
      .to_slash()
      .unwrap_or_else(|| panic!("Failed to convert {:?} to slash str", self.display()))
      .into_owned()
  }

  fn relative_specifier(&self, from_dir: &Path) -> String {
    let relative = self.relative(from_dir).to_slash_lossy().into_owned();
    if relative.starts_with("../") || relative == ".." {
      relative
    } else if let Some(stripped) = relative.strip_prefix("./") {
      format!("./{stripped}")
    } else {
      format!("./{relative}")
    }
  }
}

#[test]
fn test_relative_specifier() {
  let root = Path::new("/project");
  let dist = root.join("dist");
  assert_eq!(dist.join("_rollup.d.ts").relative_specifier(&dist), "./_rollup.d.ts");
  assert_eq!(dist.join("_rollup.d.ts").relative_specifier(&dist.join("cli")), "../_rollup.d.ts");
  assert_eq!(
    root.join(".dtspack/declaration/src/index.d.ts").relative_specifier(&root.join(".dtspack")),
    "./declaration/src/index.d.ts"
  );
}
