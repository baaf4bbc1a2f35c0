//! Markdown processing module.
//!
//! # Architecture
//!
//! - [`types`]: configuration, the processor struct and transformer traits
//! - [`core`]: the pipeline itself
//! - [`ast`]: transformers on the comrak AST (math, single tildes)
//! - [`dom`]: transformers on the HTML DOM (links, highlighting, footnotes)
//!   and title extraction
pub mod ast;
pub mod core;
pub mod dom;
pub mod types;

pub use self::core::RenderedBody;
pub use ast::{MathTransformer, SingleTildeTransformer};
pub use dom::{
  CodeHighlightTransformer,
  ExternalLinkTransformer,
  FootnoteTransformer,
  extract_title,
  is_external_href,
};
pub use types::{
  AstTransformer,
  DomTransformer,
  MarkdownOptions,
  MarkdownOptionsBuilder,
  MarkdownProcessor,
};
