//! RSS 2.0 feed generation.
use std::fs;

use color_eyre::eyre::{Context, Result};
use jiff::{Timestamp, civil, fmt::rfc2822::DateTimePrinter, tz::TimeZone};
use log::debug;
use rss::{
  ChannelBuilder,
  GuidBuilder,
  Item,
  ItemBuilder,
  extension::atom::{AtomExtensionBuilder, Link},
  validation::Validate,
};

use super::posts::Post;
use crate::{config::Config, error::SiteError};

/// Interpret a frontmatter date as an instant.
///
/// Accepts full timestamps with an offset, civil date-times and plain dates;
/// the latter two are taken as UTC.
fn parse_publish_date(date: &str) -> Result<Timestamp, jiff::Error> {
  let date = date.trim();
  if let Ok(timestamp) = date.parse::<Timestamp>() {
    return Ok(timestamp);
  }
  if let Ok(datetime) = date.parse::<civil::DateTime>() {
    return Ok(datetime.to_zoned(TimeZone::UTC)?.timestamp());
  }
  Ok(date.parse::<civil::Date>()?.to_zoned(TimeZone::UTC)?.timestamp())
}

/// Format a publish date the way RSS readers expect, e.g.
/// `Mon, 01 Jan 2024 00:00:00 GMT`.
///
/// # Errors
///
/// Returns [`SiteError::InvalidPublishDate`] if the date cannot be read.
pub fn rfc1123_date(post: &str, date: &str) -> Result<String, SiteError> {
  parse_publish_date(date)
    .and_then(|timestamp| {
      DateTimePrinter::new().timestamp_to_rfc9110_string(&timestamp)
    })
    .map_err(|e| {
      SiteError::InvalidPublishDate {
        post:   post.to_string(),
        date:   date.to_string(),
        reason: e.to_string(),
      }
    })
}

fn feed_item(post: &Post) -> Result<Item, SiteError> {
  let pub_date = rfc1123_date(&post.title, &post.publish_date)?;
  Ok(
    ItemBuilder::default()
      .title(post.title.clone())
      .link(Some(post.url.clone()))
      .guid(
        GuidBuilder::default()
          .permalink(true)
          .value(post.url.clone())
          .build(),
      )
      .description(post.description.clone())
      .pub_date(pub_date)
      .build(),
  )
}

/// Build the feed document for `posts`, which are expected newest first.
///
/// # Errors
///
/// Fails on an unreadable publish date or if the channel does not validate.
pub fn build_feed(config: &Config, posts: &[Post]) -> Result<String, SiteError> {
  let items = posts.iter().map(feed_item).collect::<Result<Vec<_>, _>>()?;

  let mut self_link = Link::default();
  self_link.set_href(config.feed_url());
  self_link.set_rel("self");
  self_link.set_mime_type(Some("application/rss+xml".to_string()));

  let channel = ChannelBuilder::default()
    .title(config.site_title.clone())
    .link(format!("{}/", config.base_url()))
    .description(config.site_description.clone())
    .language(Some(config.language.clone()))
    .atom_ext(Some(
      AtomExtensionBuilder::default()
        .links(vec![self_link])
        .build(),
    ))
    .items(items)
    .build();

  channel.validate()?;
  Ok(channel.to_string())
}

/// Write a built feed to `<output>/<feed_file>`.
///
/// # Errors
///
/// Fails if the file cannot be written.
pub fn write_feed(config: &Config, xml: &str) -> Result<()> {
  let target = config.output_dir.join(&config.feed_file);
  fs::write(&target, xml)
    .wrap_err_with(|| format!("Failed to write {}", target.display()))?;
  debug!("Wrote {}", target.display());
  Ok(())
}
