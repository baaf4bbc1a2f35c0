pub mod dom;

pub use dom::{
  insert_after_first,
  parse_document,
  parse_fragment,
  replace_contents_by_id,
  serialize_body,
};

/// First line of `text`, shortened for error messages.
#[must_use]
pub fn snippet(text: &str) -> String {
  const MAX_CHARS: usize = 40;
  let line = text.trim().lines().next().unwrap_or_default();
  if line.chars().count() > MAX_CHARS {
    let cut: String = line.chars().take(MAX_CHARS).collect();
    format!("{cut}…")
  } else {
    line.to_string()
  }
}

/// Create a regex that never matches anything.
///
/// This is used as a fallback pattern when a regex fails to compile.
/// It will never match any input, which is safer than using a trivial regex
/// like `^$` which would match empty strings.
#[must_use]
#[allow(
  clippy::expect_used,
  reason = "Literal pattern, checked by test_never_matching_regex"
)]
pub fn never_matching_regex() -> regex::Regex {
  regex::Regex::new(r"[^\s\S]").expect("never-matching pattern compiles")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_never_matching_regex() {
    let re = never_matching_regex();
    assert!(!re.is_match(""));
    assert!(!re.is_match("anything at all"));
  }

  #[test]
  fn test_snippet_truncates_first_line() {
    assert_eq!(snippet("  short\nsecond"), "short");
    let long = "x".repeat(100);
    assert_eq!(snippet(&long).chars().count(), 41);
  }
}
