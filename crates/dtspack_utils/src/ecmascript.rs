use std::borrow::Cow;

use oxc::syntax::identifier;

pub fn is_validate_identifier_name(name: &str) -> bool {
  identifier::is_identifier_name(name)
}

/// Renders a name for an `import { .. }`/`export { .. }` clause, quoting it when it is an
/// arbitrary module namespace name such as `"a-b"`.
pub fn to_module_import_export_name(name: &str) -> String {
  if is_validate_identifier_name(name) {
    name.into()
  } else {
    serde_json::to_string(name).unwrap_or_else(|_| format!("\"{name}\""))
  }
}

/// Turns any string, e.g. a package name, into something usable as an identifier by replacing
/// every character an identifier cannot contain with `_`.
pub fn legitimize_identifier_name(name: &str) -> Cow<'_, str> {
  if is_validate_identifier_name(name) {
    return Cow::Borrowed(name);
  }
  let mut legitimized = String::with_capacity(name.len() + 1);
  for (index, char) in name.chars().enumerate() {
    if index == 0 && !identifier::is_identifier_start(char) {
      legitimized.push('_');
      if identifier::is_identifier_part(char) {
        legitimized.push(char);
      }
    } else if identifier::is_identifier_part(char) {
      legitimized.push(char);
    } else {
      legitimized.push('_');
    }
  }
  if legitimized.is_empty() {
    legitimized.push('_');
  }
  Cow::Owned(legitimized)
}

#[test]
fn test_legitimize_identifier_name() {
  assert_eq!(legitimize_identifier_name("foo"), "foo");
  assert_eq!(legitimize_identifier_name("@scope/pkg-name"), "_scope_pkg_name");
  assert_eq!(legitimize_identifier_name("1st"), "_1st");
  assert_eq!(legitimize_identifier_name(""), "_");
}

#[test]
fn test_is_validate_identifier_name() {
  assert!(is_validate_identifier_name("foo"));
  assert!(is_validate_identifier_name("default_alias"));
  assert!(!is_validate_identifier_name("1aaaa"));
  assert!(!is_validate_identifier_name("😈"));
}

#[test]
fn test_to_module_import_export_name() {
  assert_eq!(to_module_import_export_name("foo"), "foo");
  assert_eq!(to_module_import_export_name("a-b"), "\"a-b\"");
}
