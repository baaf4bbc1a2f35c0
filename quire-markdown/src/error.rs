//! Error types for the document pipeline.
//!
//! Every variant is fatal for the document being processed; the pipeline
//! never retries or falls back to partial output.

use crate::syntax::SyntaxError;

/// Result type for pipeline operations.
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Errors raised while turning a source document into a rendered page.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
  /// The frontmatter block is unterminated or is not valid YAML.
  #[error("Malformed frontmatter: {0}")]
  MetadataParse(String),

  /// A required frontmatter key is absent or empty.
  #[error("Frontmatter is missing required field '{0}'")]
  MissingField(&'static str),

  /// A frontmatter key holds a value of the wrong type.
  #[error("Frontmatter field '{field}' must be {expected}")]
  InvalidField {
    field:    &'static str,
    expected: &'static str,
  },

  /// Raw HTML passthrough is switched off, but footnotes and embedded markup
  /// depend on it.
  #[error(
    "Raw HTML passthrough is disabled; it is required for embedded markup \
     such as <fn> footnotes"
  )]
  RawHtmlDisabled,

  /// A math span could not be converted to MathML.
  #[error("Failed to render math '{snippet}': {reason}")]
  MathRender { snippet: String, reason: String },

  /// An anchor element has no usable `href`.
  #[error("Anchor without href (link text: '{0}')")]
  MissingHref(String),

  /// A code block has no `language-*` class.
  #[error("Code block has no language tag (starts with: '{0}')")]
  UnknownLanguage(String),

  /// The highlighter rejected a code block.
  #[error("Failed to highlight '{language}' code block: {source}")]
  Highlight {
    language: String,
    #[source]
    source:   SyntaxError,
  },

  /// The document has no level-1 heading to take a title from.
  #[error("Document has no level-1 heading to use as its title")]
  MissingTitle,

  /// Writing HTML out of the AST or the DOM failed.
  #[error("Failed to serialize document: {0}")]
  Serialize(String),
}

impl From<std::fmt::Error> for ProcessError {
  fn from(e: std::fmt::Error) -> Self {
    Self::Serialize(e.to_string())
  }
}

impl From<std::io::Error> for ProcessError {
  fn from(e: std::io::Error) -> Self {
    Self::Serialize(e.to_string())
  }
}

impl From<std::string::FromUtf8Error> for ProcessError {
  fn from(e: std::string::FromUtf8Error) -> Self {
    Self::Serialize(e.to_string())
  }
}
