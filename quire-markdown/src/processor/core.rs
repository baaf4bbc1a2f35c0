//! Core implementation of the Markdown processor.
//!
//! This module contains the main implementation of `MarkdownProcessor`: the
//! comrak configuration, the fixed transformer order and the hand-off from
//! the Markdown AST to the HTML DOM.
use std::sync::Arc;

use comrak::{Arena, format_html, options::Options, parse_document};
use log::{debug, trace};

use super::{
  ast::{MathTransformer, SingleTildeTransformer},
  dom::{
    CodeHighlightTransformer,
    ExternalLinkTransformer,
    FootnoteTransformer,
    extract_title,
  },
  types::{AstTransformer, DomTransformer, MarkdownOptions, MarkdownProcessor},
};
use crate::{
  error::{ProcessError, ProcessResult},
  frontmatter::extract_frontmatter,
  syntax::{SyntaxManager, create_default_manager},
  types::{Frontmatter, RenderedPage},
  utils::dom::{parse_document as parse_dom, serialize_body, sort_attributes},
};

/// Body HTML and title produced by [`MarkdownProcessor::render_body`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBody {
  pub html:  String,
  pub title: String,
}

impl MarkdownProcessor {
  /// Create a new `MarkdownProcessor` with the given options.
  ///
  /// If highlighting is enabled but the backend cannot be created (for
  /// example an unknown theme), the error is logged and any document with a
  /// code block will fail to render.
  #[must_use]
  pub fn new(options: MarkdownOptions) -> Self {
    let syntax_manager = if options.highlight_code {
      match create_default_manager(options.highlight_theme.as_deref()) {
        Ok(manager) => Some(Arc::new(manager)),
        Err(e) => {
          log::error!("Failed to initialize syntax highlighting: {e}");
          None
        },
      }
    } else {
      None
    };

    Self {
      options,
      syntax_manager,
    }
  }

  /// Access processor options.
  #[must_use]
  pub const fn options(&self) -> &MarkdownOptions {
    &self.options
  }

  /// The syntax manager, if highlighting is enabled and initialized.
  #[must_use]
  pub fn syntax_manager(&self) -> Option<&SyntaxManager> {
    self.syntax_manager.as_deref()
  }

  /// Render a full document: frontmatter, then body.
  ///
  /// Frontmatter is validated before any Markdown is parsed, so a document
  /// with a missing `description` fails without doing further work.
  ///
  /// # Errors
  ///
  /// Returns the first [`ProcessError`] raised by any stage.
  pub fn render(&self, source: &str) -> ProcessResult<RenderedPage> {
    let (frontmatter, body) = extract_frontmatter(source)?;
    let RenderedBody { html, title } = self.render_body(body)?;
    let Frontmatter {
      description,
      publish_date,
    } = frontmatter;

    debug!("Rendered '{title}' ({} bytes)", html.len());
    Ok(RenderedPage {
      html,
      title,
      description,
      publish_date,
    })
  }

  /// Render a Markdown body (no frontmatter) to HTML and extract its title.
  ///
  /// # Errors
  ///
  /// Returns the first [`ProcessError`] raised by any stage.
  pub fn render_body(&self, markdown: &str) -> ProcessResult<RenderedBody> {
    if !self.options.raw_html {
      return Err(ProcessError::RawHtmlDisabled);
    }

    let html = self.render_markdown(markdown)?;

    let document = parse_dom(&html);
    for transformer in self.dom_transformers() {
      transformer.transform(&document)?;
    }

    let title = extract_title(&document)?;
    sort_attributes(&document);
    let html = serialize_body(&document)?;

    Ok(RenderedBody { html, title })
  }

  /// Parse with comrak, run the AST stage and format to HTML.
  fn render_markdown(&self, markdown: &str) -> ProcessResult<String> {
    let arena = Arena::new();
    let options = self.comrak_options();
    let root = parse_document(&arena, markdown, &options);

    for transformer in self.ast_transformers() {
      transformer.transform(&arena, root)?;
    }

    let mut html = String::new();
    format_html(root, &options, &mut html)?;
    trace!("comrak produced {} bytes of HTML", html.len());
    Ok(html)
  }

  fn ast_transformers(&self) -> Vec<Box<dyn AstTransformer>> {
    let mut transformers: Vec<Box<dyn AstTransformer>> = Vec::new();
    if self.options.math {
      transformers.push(Box::new(MathTransformer));
    }
    if self.options.strikethrough {
      transformers.push(Box::new(SingleTildeTransformer));
    }
    transformers
  }

  fn dom_transformers(&self) -> Vec<Box<dyn DomTransformer + '_>> {
    let mut transformers: Vec<Box<dyn DomTransformer + '_>> =
      vec![Box::new(ExternalLinkTransformer)];
    if self.options.highlight_code {
      transformers.push(Box::new(CodeHighlightTransformer {
        manager:      self.syntax_manager(),
        marker_class: &self.options.code_marker_class,
      }));
    }
    transformers.push(Box::new(FootnoteTransformer));
    transformers
  }

  /// Build comrak options from `MarkdownOptions`.
  fn comrak_options(&self) -> Options<'_> {
    let mut options = Options::default();
    options.render.r#unsafe = self.options.raw_html;
    options.extension.math_dollars = self.options.math;
    // Subscript is only parsed so single tildes can be restored afterwards.
    options.extension.strikethrough = self.options.strikethrough;
    options.extension.subscript = self.options.strikethrough;
    options.extension.header_ids = None;
    options
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use super::*;
  use crate::processor::MarkdownOptionsBuilder;

  #[test]
  fn test_processor_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MarkdownProcessor>();
  }

  #[test]
  fn test_raw_html_required() {
    let processor = MarkdownProcessor::new(
      MarkdownOptionsBuilder::new().raw_html(false).build(),
    );
    assert!(matches!(
      processor.render_body("# Title"),
      Err(ProcessError::RawHtmlDisabled)
    ));
  }

  #[test]
  fn test_stage_order_math_before_links() {
    let processor = MarkdownProcessor::new(MarkdownOptions::default());
    let body = processor
      .render_body("# T\n\n[$x$](https://example.com)")
      .expect("render");
    assert!(body.html.contains("<math"));
    assert!(body.html.contains("target=\"_blank\""));
  }

  #[test]
  fn test_highlighting_disabled_leaves_code_alone() {
    let processor = MarkdownProcessor::new(
      MarkdownOptionsBuilder::new().highlight_code(false).build(),
    );
    let body = processor
      .render_body("# T\n\n    indented, no language\n")
      .expect("render");
    assert!(body.html.contains("<pre><code>indented, no language"));
  }

  #[test]
  fn test_unknown_theme_fails_at_highlight_time() {
    let processor = MarkdownProcessor::new(
      MarkdownOptionsBuilder::new()
        .highlight_theme(Some("NoSuchTheme"))
        .build(),
    );
    assert!(processor.syntax_manager().is_none());
    assert!(processor.render_body("# T\n\nno code").is_ok());
    assert!(matches!(
      processor.render_body("# T\n\n```rust\nfn x() {}\n```\n"),
      Err(ProcessError::Highlight { .. })
    ));
  }

  #[test]
  fn test_attributes_are_sorted() {
    let processor = MarkdownProcessor::new(MarkdownOptions::default());
    let body = processor
      .render_body("# T\n\n[out](https://example.com)")
      .expect("render");
    assert!(body.html.contains(
      r#"<a href="https://example.com" rel="nofollow noopener noreferrer" target="_blank">out</a>"#
    ));
  }
}
