//! Type definitions for the Markdown processor.
//!
//! Contains the processor configuration (`MarkdownOptions`), the processor
//! itself and the two transformer traits, one per tree representation.
//!
//! # Examples
//!
//! ```
//! use quire_markdown::{MarkdownOptionsBuilder, MarkdownProcessor};
//!
//! let options = MarkdownOptionsBuilder::new()
//!   .math(true)
//!   .highlight_theme(Some("Nord"))
//!   .build();
//!
//! let processor = MarkdownProcessor::new(options);
//! assert!(processor.syntax_manager().is_some());
//! ```

use std::sync::Arc;

use comrak::{Arena, nodes::AstNode};
use kuchikikiki::NodeRef;

use crate::{error::ProcessResult, syntax::SyntaxManager};

/// Options for configuring the Markdown processor.
#[derive(Debug, Clone)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Config struct with related boolean flags"
)]
pub struct MarkdownOptions {
  /// Pass raw HTML through to the output. Must stay enabled: `<fn>`
  /// footnotes and other embedded markup depend on it.
  pub raw_html: bool,

  /// Parse `$…$`, `$$…$$` and ```` ```math ```` as math and render it to
  /// MathML.
  pub math: bool,

  /// Render `~~text~~` as `<del>`. A single tilde is always literal.
  pub strikethrough: bool,

  /// Enable syntax highlighting for code blocks.
  pub highlight_code: bool,

  /// Optional: syntax highlighting theme name, used for the stylesheet.
  pub highlight_theme: Option<String>,

  /// Class added to every highlighted `<code>` element.
  pub code_marker_class: String,
}

impl Default for MarkdownOptions {
  fn default() -> Self {
    Self {
      raw_html:          true,
      math:              true,
      strikethrough:     true,
      highlight_code:    true,
      highlight_theme:   None,
      code_marker_class: "highlight".to_string(),
    }
  }
}

/// Main Markdown processor.
///
/// Can be cheaply cloned and shared across threads; the syntax manager sits
/// behind an `Arc`.
#[derive(Clone)]
pub struct MarkdownProcessor {
  pub(crate) options:        MarkdownOptions,
  pub(crate) syntax_manager: Option<Arc<SyntaxManager>>,
}

/// Rewrite applied to the comrak AST before it is formatted to HTML.
pub trait AstTransformer {
  /// Transform the tree rooted at `root`. New nodes are allocated in
  /// `arena`.
  ///
  /// # Errors
  ///
  /// Any error aborts the pipeline for the current document.
  fn transform<'a>(
    &self,
    arena: &'a Arena<'a>,
    root: &'a AstNode<'a>,
  ) -> ProcessResult<()>;
}

/// Rewrite applied to the HTML DOM, where raw HTML is an ordinary element
/// tree.
pub trait DomTransformer {
  /// Transform `document` in place.
  ///
  /// # Errors
  ///
  /// Any error aborts the pipeline for the current document.
  fn transform(&self, document: &NodeRef) -> ProcessResult<()>;
}

/// Builder for constructing `MarkdownOptions` with method chaining.
#[derive(Debug, Clone)]
pub struct MarkdownOptionsBuilder {
  options: MarkdownOptions,
}

impl MarkdownOptionsBuilder {
  /// Create a new builder with default options.
  #[must_use]
  pub fn new() -> Self {
    Self {
      options: MarkdownOptions::default(),
    }
  }

  /// Enable or disable raw HTML passthrough.
  #[must_use]
  pub const fn raw_html(mut self, enabled: bool) -> Self {
    self.options.raw_html = enabled;
    self
  }

  /// Enable or disable math rendering.
  #[must_use]
  pub const fn math(mut self, enabled: bool) -> Self {
    self.options.math = enabled;
    self
  }

  /// Enable or disable double-tilde strikethrough.
  #[must_use]
  pub const fn strikethrough(mut self, enabled: bool) -> Self {
    self.options.strikethrough = enabled;
    self
  }

  /// Enable or disable syntax highlighting.
  #[must_use]
  pub const fn highlight_code(mut self, enabled: bool) -> Self {
    self.options.highlight_code = enabled;
    self
  }

  /// Set the syntax highlighting theme.
  #[must_use]
  pub fn highlight_theme<S: Into<String>>(mut self, theme: Option<S>) -> Self {
    self.options.highlight_theme = theme.map(Into::into);
    self
  }

  /// Set the class added to highlighted code elements.
  #[must_use]
  pub fn code_marker_class<S: Into<String>>(mut self, class: S) -> Self {
    self.options.code_marker_class = class.into();
    self
  }

  /// Build the final `MarkdownOptions`.
  #[must_use]
  pub fn build(self) -> MarkdownOptions {
    self.options
  }
}

impl Default for MarkdownOptionsBuilder {
  fn default() -> Self {
    Self::new()
  }
}
