//! Types for the quire-markdown public API.
use serde::{Deserialize, Serialize};

/// Validated document metadata. Other frontmatter keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
  /// Short summary, used for `<meta name="description">` and feed items.
  pub description: String,

  /// Publication date as written by the author (ISO-style, e.g.
  /// `2024-01-01`). Required for posts, optional otherwise.
  pub publish_date: Option<String>,
}

/// Result of running a document through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedPage {
  /// Rendered HTML fragment (the document body, no `<html>` shell).
  pub html: String,

  /// Text of the first level-1 heading.
  pub title: String,

  /// Description from frontmatter.
  pub description: String,

  /// Publish date from frontmatter, if any.
  pub publish_date: Option<String>,
}
