/// The `type` field of the package being built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PackageType {
  Module,
  #[default]
  CommonJs,
}

impl PackageType {
  pub fn from_package_json_type(value: Option<&str>) -> Self {
    match value {
      Some("module") => Self::Module,
      _ => Self::CommonJs,
    }
  }
}

#[test]
fn test_from_package_json_type() {
  assert_eq!(PackageType::from_package_json_type(Some("module")), PackageType::Module);
  assert_eq!(PackageType::from_package_json_type(Some("commonjs")), PackageType::CommonJs);
  assert_eq!(PackageType::from_package_json_type(None), PackageType::CommonJs);
}
