//! # quire-markdown - the document pipeline behind quire
//!
//! Turns a Markdown source with YAML frontmatter into an HTML fragment plus
//! the metadata the site assembler needs (title, description, publish date).
//!
//! ## Quick Start
//!
//! ```rust
//! use quire_markdown::{MarkdownOptions, MarkdownProcessor};
//!
//! let processor = MarkdownProcessor::new(MarkdownOptions::default());
//! let page = processor
//!   .render("---\ndescription: A page\n---\n# Hello\n\nSome ~~old~~ text.")
//!   .expect("page should render");
//!
//! assert_eq!(page.title, "Hello");
//! assert_eq!(page.description, "A page");
//! assert!(page.html.contains("<del>old</del>"));
//! ```
//!
//! ## Pipeline
//!
//! 1. Frontmatter is split off and validated ([`frontmatter`]).
//! 2. The body is parsed with `comrak` (raw HTML, `$` math, strikethrough).
//! 3. Markdown-level transformers run on the comrak AST: math is rendered to
//!    MathML and single-tilde spans are restored to plain text.
//! 4. The result is parsed into a DOM where raw HTML (including the custom
//!    `<fn>` footnote tag) is an ordinary element tree, and the DOM
//!    transformers run in order: external links, code highlighting,
//!    footnotes.
//! 5. The body of the DOM is serialized and the first `<h1>` becomes the
//!    page title.

pub mod error;
pub mod frontmatter;
pub mod processor;
pub mod syntax;
mod types;
pub mod utils;

pub use crate::{
  error::{ProcessError, ProcessResult},
  processor::{
    AstTransformer,
    DomTransformer,
    MarkdownOptions,
    MarkdownOptionsBuilder,
    MarkdownProcessor,
  },
  types::{Frontmatter, RenderedPage},
};
