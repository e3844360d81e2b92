use dtspack_error::DtsError;
use dtspack_utils::concat_string;
use rustc_hash::FxHashSet;

/// Highest `_alias_<n>` suffix tried before giving up.
const MAX_ALIAS_ATTEMPTS: u32 = 1000;

/// Hands out export aliases that are unique across every entry of one build.
#[derive(Debug, Default)]
pub struct AliasAllocator {
  used_aliases: FxHashSet<String>,
}

impl AliasAllocator {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reserves and returns `name` itself when it is still free, otherwise the first free
  /// `<name>_alias_<n>`. `default` is never a usable alias and starts out as `default_alias`.
  pub fn assign(&mut self, name: &str) -> Result<String, DtsError> {
    let base = if name == "default" { "default_alias" } else { name };
    if self.used_aliases.insert(base.to_string()) {
      return Ok(base.to_string());
    }

    for count in 1..MAX_ALIAS_ATTEMPTS {
      let candidate = concat_string!(base, "_alias_", itoa::Buffer::new().format(count));
      if self.used_aliases.insert(candidate.clone()) {
        tracing::debug!("Export `{name}` collides with an earlier export, aliased to `{candidate}`");
        return Ok(candidate);
      }
    }

    Err(DtsError::AliasExhausted { name: name.to_string(), attempts: MAX_ALIAS_ATTEMPTS })
  }

  pub fn is_reserved(&self, alias: &str) -> bool {
    self.used_aliases.contains(alias)
  }
}

#[test]
fn test_unique_names_keep_their_name() {
  let mut allocator = AliasAllocator::new();
  assert_eq!(allocator.assign("foo").unwrap(), "foo");
  assert_eq!(allocator.assign("bar").unwrap(), "bar");
  assert!(allocator.is_reserved("foo"));
}

#[test]
fn test_collisions_get_numbered_aliases() {
  let mut allocator = AliasAllocator::new();
  assert_eq!(allocator.assign("foo").unwrap(), "foo");
  assert_eq!(allocator.assign("foo").unwrap(), "foo_alias_1");
  assert_eq!(allocator.assign("foo").unwrap(), "foo_alias_2");
  // A real export that happens to look like a generated alias.
  assert_eq!(allocator.assign("foo_alias_3").unwrap(), "foo_alias_3");
  assert_eq!(allocator.assign("foo").unwrap(), "foo_alias_4");
}

#[test]
fn test_default_is_never_an_alias() {
  let mut allocator = AliasAllocator::new();
  assert_eq!(allocator.assign("default").unwrap(), "default_alias");
  assert_eq!(allocator.assign("default").unwrap(), "default_alias_alias_1");
  assert!(!allocator.is_reserved("default"));
}

#[test]
fn test_exhaustion_is_reported() {
  let mut allocator = AliasAllocator::new();
  for _ in 0..MAX_ALIAS_ATTEMPTS {
    allocator.assign("x").unwrap();
  }
  assert!(allocator.is_reserved("x_alias_999"));
  let error = allocator.assign("x").unwrap_err();
  assert!(matches!(error, DtsError::AliasExhausted { ref name, attempts: 1000 } if name == "x"));
}
