/// Concatenates string-like expressions into a `String`, allocating once.
///
/// ```ignore
/// let name = concat_string!("foo", "_alias_", "1");
/// ```
#[macro_export]
macro_rules! concat_string {
  () => { String::new() };
  ($($s:expr),+ $(,)?) => {{
    let mut len = 0;
    $(len += AsRef::<str>::as_ref(&$s).len();)+
    let mut buf = String::with_capacity(len);
    $(buf.push_str(AsRef::<str>::as_ref(&$s));)+
    buf
  }};
}

#[test]
fn test_concat_string() {
  let count = 3.to_string();
  assert_eq!(concat_string!("a", "_alias_", count), "a_alias_3");
  assert_eq!(concat_string!(), "");
}
