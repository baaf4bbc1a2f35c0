//! The homepage and its list of posts.
use std::fs;

use color_eyre::eyre::{Context, Result};
use html_escape::{encode_double_quoted_attribute, encode_text};
use log::{debug, warn};
use quire_markdown::{
  MarkdownProcessor,
  RenderedPage,
  utils::replace_contents_by_id,
};

use super::posts::{Post, time_element};
use crate::{
  config::Config,
  html::template::{Page, PageRenderer},
};

/// Id of the element whose contents become the post list.
pub const POST_LIST_ID: &str = "blog-entries";

/// Newest-first list of posts followed by a link to the feed.
#[must_use]
pub fn post_list_html(posts: &[Post], config: &Config) -> String {
  let items: String = posts
    .iter()
    .map(|post| {
      format!(
        "<li>{} - <a href=\"/{}\">{}</a></li>\n",
        time_element(&post.publish_date),
        encode_double_quoted_attribute(&post.folder),
        encode_text(&post.title)
      )
    })
    .collect();

  format!(
    "<ul>\n{items}</ul>\n<a href=\"/{}\">RSS Feed</a>",
    encode_double_quoted_attribute(&config.feed_file)
  )
}

/// Render `index.md` and fill in the post list.
///
/// A homepage without a `blog-entries` element is rendered as is.
///
/// # Errors
///
/// Fails if `index.md` is missing or does not render.
pub fn render_home(
  processor: &MarkdownProcessor,
  config: &Config,
  posts: &[Post],
) -> Result<RenderedPage> {
  let path = config.input_dir.join("index.md");
  let source = fs::read_to_string(&path)
    .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
  let mut page = processor
    .render(&source)
    .wrap_err_with(|| format!("Failed to render {}", path.display()))?;

  let (html, found) =
    replace_contents_by_id(&page.html, POST_LIST_ID, &post_list_html(posts, config))
      .wrap_err_with(|| format!("Failed to render {}", path.display()))?;
  if found {
    debug!("Listed {} posts on the homepage", posts.len());
  } else if !posts.is_empty() {
    warn!(
      "{} has no element with id '{POST_LIST_ID}', posts are not listed",
      path.display()
    );
  }

  page.html = html;
  Ok(page)
}

/// Wrap the rendered homepage in the page template and write
/// `<output>/index.html`.
///
/// # Errors
///
/// Fails on template or I/O errors.
pub fn write_home(
  home: &RenderedPage,
  renderer: &PageRenderer,
  config: &Config,
) -> Result<()> {
  let canonical_url = format!("{}/", config.base_url());

  let page = Page {
    title:         &home.title,
    description:   &home.description,
    canonical_url: &canonical_url,
    og_type:       "profile",
    og_extras:     vec![
      ("profile:first_name", config.author.first_name.clone()),
      ("profile:last_name", config.author.last_name.clone()),
    ],
    content:       &home.html,
  };
  let html = renderer
    .render(&page)
    .wrap_err("Failed to render the homepage template")?;

  let target = config.output_dir.join("index.html");
  fs::write(&target, html)
    .wrap_err_with(|| format!("Failed to write {}", target.display()))?;
  debug!("Wrote {}", target.display());
  Ok(())
}
