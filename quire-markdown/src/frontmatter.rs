//! YAML frontmatter extraction and validation.
//!
//! A document may start with a metadata block delimited by `---` lines:
//!
//! ```markdown
//! ---
//! description: Notes on writing a rasterizer
//! publish_date: "2024-01-01"
//! ---
//!
//! # Rasterizer notes
//! ```
//!
//! Documents without an opening delimiter have empty metadata and the whole
//! text is the body. An opening delimiter without a closing one is an error,
//! never silently treated as body text.
use serde_yaml_ng::{Mapping, Value};

use crate::{
  error::{ProcessError, ProcessResult},
  types::Frontmatter,
};

const DELIMITER: &str = "---";

/// Split a raw document into its metadata mapping and Markdown body.
///
/// # Errors
///
/// Returns [`ProcessError::MetadataParse`] if the block is unterminated, is
/// not valid YAML, or is not a mapping.
pub fn split_frontmatter(source: &str) -> ProcessResult<(Mapping, &str)> {
  let source = source.strip_prefix('\u{feff}').unwrap_or(source);

  let Some(rest) = strip_opening_delimiter(source) else {
    return Ok((Mapping::new(), source));
  };

  let mut offset = 0;
  for line in rest.split_inclusive('\n') {
    if line.trim_end_matches(['\r', '\n']) == DELIMITER {
      let block = &rest[..offset];
      let body = &rest[offset + line.len()..];
      return Ok((parse_block(block)?, body));
    }
    offset += line.len();
  }

  Err(ProcessError::MetadataParse(
    "opening '---' has no closing delimiter".to_string(),
  ))
}

/// Returns the text after the opening delimiter line, if the document starts
/// with one.
fn strip_opening_delimiter(source: &str) -> Option<&str> {
  let (first, rest) = source
    .split_once('\n')
    .unwrap_or((source, ""));
  (first.trim_end_matches('\r') == DELIMITER).then_some(rest)
}

fn parse_block(block: &str) -> ProcessResult<Mapping> {
  if block.trim().is_empty() {
    return Ok(Mapping::new());
  }

  match serde_yaml_ng::from_str::<Value>(block) {
    Ok(Value::Mapping(mapping)) => Ok(mapping),
    Ok(Value::Null) => Ok(Mapping::new()),
    Ok(_) => {
      Err(ProcessError::MetadataParse(
        "frontmatter must be a mapping of keys to values".to_string(),
      ))
    },
    Err(e) => Err(ProcessError::MetadataParse(e.to_string())),
  }
}

impl Frontmatter {
  /// Validate a metadata mapping.
  ///
  /// `description` must be a non-empty string; `publish_date`, when present
  /// and not null, must be a string.
  ///
  /// # Errors
  ///
  /// Returns [`ProcessError::MissingField`] or
  /// [`ProcessError::InvalidField`] when the invariants above do not hold.
  pub fn from_mapping(mapping: &Mapping) -> ProcessResult<Self> {
    let description = match mapping.get("description") {
      None | Some(Value::Null) => {
        return Err(ProcessError::MissingField("description"));
      },
      Some(Value::String(s)) if s.trim().is_empty() => {
        return Err(ProcessError::MissingField("description"));
      },
      Some(Value::String(s)) => s.clone(),
      Some(_) => {
        return Err(ProcessError::InvalidField {
          field:    "description",
          expected: "a string",
        });
      },
    };

    let publish_date = match mapping.get("publish_date") {
      None | Some(Value::Null) => None,
      Some(Value::String(s)) => Some(s.clone()),
      Some(_) => {
        return Err(ProcessError::InvalidField {
          field:    "publish_date",
          expected: "a string",
        });
      },
    };

    Ok(Self {
      description,
      publish_date,
    })
  }
}

/// Split and validate in one step.
///
/// # Errors
///
/// Propagates errors from [`split_frontmatter`] and
/// [`Frontmatter::from_mapping`].
pub fn extract_frontmatter(source: &str) -> ProcessResult<(Frontmatter, &str)> {
  let (mapping, body) = split_frontmatter(source)?;
  let frontmatter = Frontmatter::from_mapping(&mapping)?;
  log::trace!(
    "Frontmatter parsed: publish_date={:?}, {} keys",
    frontmatter.publish_date,
    mapping.len()
  );
  Ok((frontmatter, body))
}
