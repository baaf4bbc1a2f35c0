use std::{io, path::PathBuf};

use quire_markdown::ProcessError;
use thiserror::Error;

/// Top-level error type for site assembly.
///
/// Document-level pipeline failures keep their [`ProcessError`] and are
/// wrapped with the offending file name by the caller.
#[derive(Debug, Error)]
pub enum SiteError {
  #[error("Post '{0}' has no publish_date in its frontmatter")]
  MissingPublishDate(String),

  #[error(
    "Only markdown files are allowed in the posts directory, found: {}",
    .0.display()
  )]
  NonMarkdownEntry(PathBuf),

  #[error("Post '{post}' has an unreadable publish_date '{date}': {reason}")]
  InvalidPublishDate {
    post:   String,
    date:   String,
    reason: String,
  },

  #[error("Template error: {0}")]
  Template(String),

  #[error("Feed error: {0}")]
  Feed(String),

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("Configuration error: {0}")]
  Config(String),

  #[error(transparent)]
  Process(#[from] ProcessError),
}

impl From<tera::Error> for SiteError {
  fn from(e: tera::Error) -> Self {
    // Tera keeps the useful part of the message in the source chain.
    let mut message = e.to_string();
    let mut source = std::error::Error::source(&e);
    while let Some(cause) = source {
      message.push_str(": ");
      message.push_str(&cause.to_string());
      source = cause.source();
    }
    Self::Template(message)
  }
}

impl From<fs_extra::error::Error> for SiteError {
  fn from(e: fs_extra::error::Error) -> Self {
    Self::Io(io::Error::other(e.to_string()))
  }
}

impl From<rss::validation::ValidationError> for SiteError {
  fn from(e: rss::validation::ValidationError) -> Self {
    Self::Feed(e.to_string())
  }
}

impl From<toml::de::Error> for SiteError {
  fn from(e: toml::de::Error) -> Self {
    Self::Config(e.to_string())
  }
}

impl From<serde_json::Error> for SiteError {
  fn from(e: serde_json::Error) -> Self {
    Self::Config(e.to_string())
  }
}
