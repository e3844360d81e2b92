use std::collections::hash_map::Entry;

use dtspack_utils::concat_string;
use rustc_hash::{FxHashMap, FxHashSet};

/// Picks top-level names for the rolled-up declaration file so that declarations coming from
/// different modules never collide.
#[derive(Debug, Default)]
pub struct Renamer {
  // Maps a base name to the last suffix tried for it (`a` -> 0 means `a` is taken, try `a$1`).
  used_canonical_names: FxHashMap<String, u32>,

  /// Every name handed out so far.
  used_names: FxHashSet<String>,
}

impl Renamer {
  /// `reserved` names are never handed out, e.g. globals referenced without a declaration.
  pub fn new<'a>(reserved: impl IntoIterator<Item = &'a str>) -> Self {
    let used_canonical_names = reserved.into_iter().map(|name| (name.to_string(), 0)).collect();
    Self { used_canonical_names, used_names: FxHashSet::default() }
  }

  /// Returns `hint`, or `hint$<n>` for the first `n` that is neither used nor rejected by
  /// `is_shadowed`. The caller uses `is_shadowed` to skip names bound in a nested scope of a
  /// module where the symbol is referenced.
  pub fn create_conflictless_name(
    &mut self,
    hint: &str,
    is_shadowed: impl Fn(&str) -> bool,
  ) -> String {
    let (mut candidate_name, mut count) = match self.used_canonical_names.entry(hint.to_string()) {
      Entry::Occupied(mut occ) => {
        *occ.get_mut() += 1;
        (Self::generate_candidate_name(hint, *occ.get()), *occ.get())
      }
      Entry::Vacant(vac) => {
        vac.insert(0);
        (hint.to_string(), 0)
      }
    };

    loop {
      if !self.used_names.contains(&candidate_name)
        && !self.used_canonical_names.get(&candidate_name).is_some_and(|_| candidate_name != hint)
        && !is_shadowed(&candidate_name)
      {
        self.used_canonical_names.entry(candidate_name.clone()).or_insert(0);
        self.used_names.insert(candidate_name.clone());
        return candidate_name;
      }

      count += 1;
      candidate_name = Self::generate_candidate_name(hint, count);
      self.used_canonical_names.insert(hint.to_string(), count);
    }
  }

  fn generate_candidate_name(original_name: &str, count: u32) -> String {
    concat_string!(original_name, "$", itoa::Buffer::new().format(count))
  }
}

#[test]
fn test_conflicting_names_are_suffixed() {
  let mut renamer = Renamer::new([]);
  assert_eq!(renamer.create_conflictless_name("Foo", |_| false), "Foo");
  assert_eq!(renamer.create_conflictless_name("Foo", |_| false), "Foo$1");
  assert_eq!(renamer.create_conflictless_name("Foo", |_| false), "Foo$2");
  assert_eq!(renamer.create_conflictless_name("Bar", |_| false), "Bar");
}

#[test]
fn test_reserved_names_are_skipped() {
  let mut renamer = Renamer::new(["Promise"]);
  assert_eq!(renamer.create_conflictless_name("Promise", |_| false), "Promise$1");
}

#[test]
fn test_generated_names_do_not_collide_with_real_ones() {
  let mut renamer = Renamer::new([]);
  assert_eq!(renamer.create_conflictless_name("a$1", |_| false), "a$1");
  assert_eq!(renamer.create_conflictless_name("a", |_| false), "a");
  assert_eq!(renamer.create_conflictless_name("a", |_| false), "a$2");
}

#[test]
fn test_shadowed_names_are_skipped() {
  let mut renamer = Renamer::new([]);
  assert_eq!(renamer.create_conflictless_name("T", |name| name == "T"), "T$1");
  assert_eq!(renamer.create_conflictless_name("U", |name| name == "U" || name == "U$1"), "U$2");
}
