//! Site assembly.
//!
//! Everything that can fail on content (posts, homepage, feed) is rendered
//! in memory first. Only then is the output directory cleared and written,
//! so a broken post leaves the previous build in place.
pub mod assets;
pub mod feed;
pub mod home;
pub mod posts;

use color_eyre::eyre::{Context, Result, bail};
use log::info;
use quire_markdown::{MarkdownOptionsBuilder, MarkdownProcessor};

use crate::{config::Config, html::template::PageRenderer};

/// What a build produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
  pub posts: usize,
}

/// Processor configured for this site.
///
/// # Errors
///
/// Fails if the configured highlight theme is unknown.
pub fn create_processor(config: &Config) -> Result<MarkdownProcessor> {
  let processor = MarkdownProcessor::new(
    MarkdownOptionsBuilder::new()
      .highlight_theme(Some(config.highlight_theme.as_str()))
      .build(),
  );
  if processor.syntax_manager().is_none() {
    bail!(
      "Unknown highlight theme '{}', see the syntect and two-face theme lists",
      config.highlight_theme
    );
  }
  Ok(processor)
}

/// Build the whole site into `config.output_dir`.
///
/// # Errors
///
/// Returns the first error hit; nothing is retried.
pub fn build(config: &Config) -> Result<BuildSummary> {
  let processor = create_processor(config)?;
  let renderer =
    PageRenderer::new(config).wrap_err("Failed to load page template")?;

  let posts = posts::render_posts(&processor, config)?;
  let home = home::render_home(&processor, config, &posts)?;
  let feed = feed::build_feed(config, &posts).wrap_err("Failed to build RSS feed")?;

  assets::prepare_output_dir(&config.output_dir)?;
  assets::copy_assets(config)?;
  assets::write_highlight_css(config, processor.syntax_manager())?;

  posts::write_posts(&posts, &renderer, config)?;
  home::write_home(&home, &renderer, config)?;
  feed::write_feed(config, &feed)?;

  info!(
    "Built {} posts into {}",
    posts.len(),
    config.output_dir.display()
  );
  Ok(BuildSummary { posts: posts.len() })
}
