use crate::{OutputFormat, PackageType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DtsExtension {
  Dts,
  Dmts,
  Dcts,
}

impl DtsExtension {
  /// Declaration extension for `format`, following how Node.js would pick the module system of
  /// the matching JavaScript output inside a package of type `package_type`.
  pub fn for_format(format: OutputFormat, package_type: PackageType) -> Self {
    match (package_type, format) {
      (PackageType::Module, OutputFormat::Cjs) => Self::Dcts,
      (PackageType::CommonJs, OutputFormat::Esm) => Self::Dmts,
      (_, OutputFormat::Esm | OutputFormat::Cjs | OutputFormat::Iife) => Self::Dts,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Dts => ".d.ts",
      Self::Dmts => ".d.mts",
      Self::Dcts => ".d.cts",
    }
  }

  /// Suffix used when another declaration file imports a file with this extension.
  pub fn import_suffix(self) -> &'static str {
    match self {
      Self::Dts => "",
      Self::Dmts => ".mjs",
      Self::Dcts => ".cjs",
    }
  }

  /// Extension accepted by back ends that only understand `.d.ts` entry points.
  pub fn plain_entry_extension(self) -> &'static str {
    match self {
      Self::Dts => ".d.ts",
      Self::Dmts => ".dmts.d.ts",
      Self::Dcts => ".dcts.d.ts",
    }
  }
}

#[test]
fn test_for_format() {
  use OutputFormat::{Cjs, Esm, Iife};

  assert_eq!(DtsExtension::for_format(Esm, PackageType::Module), DtsExtension::Dts);
  assert_eq!(DtsExtension::for_format(Cjs, PackageType::Module), DtsExtension::Dcts);
  assert_eq!(DtsExtension::for_format(Iife, PackageType::Module), DtsExtension::Dts);
  assert_eq!(DtsExtension::for_format(Esm, PackageType::CommonJs), DtsExtension::Dmts);
  assert_eq!(DtsExtension::for_format(Cjs, PackageType::CommonJs), DtsExtension::Dts);
  assert_eq!(DtsExtension::for_format(Iife, PackageType::CommonJs), DtsExtension::Dts);
}

#[test]
fn test_plain_entry_extension() {
  assert_eq!(DtsExtension::Dmts.plain_entry_extension(), ".dmts.d.ts");
  assert_eq!(DtsExtension::Dcts.plain_entry_extension(), ".dcts.d.ts");
  assert_eq!(DtsExtension::Dts.plain_entry_extension(), ".d.ts");
}
