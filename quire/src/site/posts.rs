//! Blog posts: discovery, rendering and output.
use std::{
  fs,
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Context, Result};
use html_escape::{encode_double_quoted_attribute, encode_text};
use log::{debug, info};
use quire_markdown::{MarkdownProcessor, ProcessError, utils::insert_after_first};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::{
  config::Config,
  error::SiteError,
  html::template::{Page, PageRenderer},
};

/// A rendered post and the metadata the homepage and feed need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
  /// File stem of the source, e.g. `hello` for `blog/hello.md`.
  pub slug:         String,
  pub title:        String,
  pub description:  String,
  pub publish_date: String,
  /// Site-relative folder, e.g. `blog/hello`.
  pub folder:       String,
  /// Absolute canonical URL.
  pub url:          String,
  /// Post body wrapped in `<article>`, dated below its heading.
  pub html:         String,
}

/// `<time>` element showing a publish date.
#[must_use]
pub fn time_element(date: &str) -> String {
  format!(
    r#"<time datetime="{}">{}</time>"#,
    encode_double_quoted_attribute(date),
    encode_text(date)
  )
}

/// Insert the dated line after the first `<h1>` and wrap in `<article>`.
///
/// # Errors
///
/// Propagates serialization failures from the DOM round trip.
pub fn article_html(body: &str, publish_date: &str) -> Result<String, ProcessError> {
  let dated = insert_after_first(
    body,
    "h1",
    &format!("<p><strong>{}</strong></p>", time_element(publish_date)),
  )?;
  Ok(format!("<article>\n{dated}\n</article>"))
}

/// List post sources in `dir`, sorted by file name.
///
/// # Errors
///
/// Returns [`SiteError::NonMarkdownEntry`] for any directory or file without
/// an `.md` extension, or an I/O error if the directory cannot be read.
pub fn collect_post_sources(dir: &Path) -> Result<Vec<PathBuf>, SiteError> {
  let mut sources = Vec::new();

  for entry in WalkDir::new(dir)
    .follow_links(true)
    .min_depth(1)
    .max_depth(1)
    .sort_by_file_name()
  {
    let entry = entry.map_err(|e| SiteError::Io(e.into()))?;
    let path = entry.path();
    let is_markdown = entry.file_type().is_file()
      && path.extension().is_some_and(|ext| ext == "md");

    if !is_markdown {
      return Err(SiteError::NonMarkdownEntry(path.to_path_buf()));
    }
    sources.push(path.to_path_buf());
  }

  debug!("Found {} posts in {}", sources.len(), dir.display());
  Ok(sources)
}

/// Render a single post source.
///
/// # Errors
///
/// Fails on unreadable files, pipeline errors, a missing `publish_date`, or
/// a file name that is not valid UTF-8.
pub fn render_post(
  processor: &MarkdownProcessor,
  config: &Config,
  path: &Path,
) -> Result<Post> {
  let slug = path
    .file_stem()
    .and_then(|stem| stem.to_str())
    .map(str::to_string)
    .ok_or_else(|| SiteError::NonMarkdownEntry(path.to_path_buf()))?;

  let source = fs::read_to_string(path)
    .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
  let page = processor.render(&source)?;

  let publish_date = page
    .publish_date
    .ok_or_else(|| SiteError::MissingPublishDate(page.title.clone()))?;
  let html = article_html(&page.html, &publish_date)?;

  Ok(Post {
    folder: config.post_folder(&slug),
    url: config.post_url(&slug),
    slug,
    title: page.title,
    description: page.description,
    publish_date,
    html,
  })
}

/// Render every post in the posts directory in parallel.
///
/// The first failure aborts the build; it is reported with the file name.
///
/// # Errors
///
/// See [`collect_post_sources`] and [`render_post`].
pub fn render_posts(
  processor: &MarkdownProcessor,
  config: &Config,
) -> Result<Vec<Post>> {
  let dir = config.posts_dir();
  if !dir.is_dir() {
    info!("No posts directory at {}, skipping posts", dir.display());
    return Ok(Vec::new());
  }

  let sources = collect_post_sources(&dir).wrap_err_with(|| {
    format!("Failed to collect posts from {}", dir.display())
  })?;

  let mut posts = sources
    .par_iter()
    .map(|path| {
      render_post(processor, config, path)
        .wrap_err_with(|| format!("Failed to render post {}", path.display()))
    })
    .collect::<Result<Vec<_>>>()?;

  sort_posts(&mut posts);
  Ok(posts)
}

/// Newest first, by plain string comparison of the publish dates. Ties keep
/// a stable order by slug.
pub fn sort_posts(posts: &mut [Post]) {
  posts.sort_by(|a, b| {
    b.publish_date
      .cmp(&a.publish_date)
      .then_with(|| a.slug.cmp(&b.slug))
  });
}

/// Write each post to `<output>/<folder>/index.html`.
///
/// # Errors
///
/// Fails on template or I/O errors.
pub fn write_posts(
  posts: &[Post],
  renderer: &PageRenderer,
  config: &Config,
) -> Result<()> {
  posts.par_iter().try_for_each(|post| {
    let page = Page {
      title:         &post.title,
      description:   &post.description,
      canonical_url: &post.url,
      og_type:       "article",
      og_extras:     vec![(
        "article:published_time",
        post.publish_date.clone(),
      )],
      content:       &post.html,
    };
    let html = renderer
      .render(&page)
      .wrap_err_with(|| format!("Failed to render page for {}", post.slug))?;

    let target_dir = config.output_dir.join(&post.folder);
    fs::create_dir_all(&target_dir).wrap_err_with(|| {
      format!("Failed to create directory {}", target_dir.display())
    })?;
    let target = target_dir.join("index.html");
    fs::write(&target, html)
      .wrap_err_with(|| format!("Failed to write {}", target.display()))?;

    debug!("Wrote {}", target.display());
    Ok(())
  })
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use quire_markdown::MarkdownOptions;
  use tempfile::tempdir;

  use super::*;

  fn post(slug: &str, date: &str) -> Post {
    Post {
      slug:         slug.to_string(),
      title:        slug.to_uppercase(),
      description:  String::new(),
      publish_date: date.to_string(),
      folder:       format!("blog/{slug}"),
      url:          format!("https://example.com/blog/{slug}"),
      html:         String::new(),
    }
  }

  #[test]
  fn test_article_html() {
    let html = article_html("<h1>Title</h1>\n<p>Body</p>", "2024-01-01")
      .expect("article");
    assert_eq!(
      html,
      concat!(
        "<article>\n",
        "<h1>Title</h1>",
        r#"<p><strong><time datetime="2024-01-01">2024-01-01</time></strong></p>"#,
        "\n<p>Body</p>\n",
        "</article>",
      )
    );
  }

  #[test]
  fn test_sort_newest_first() {
    let mut posts = vec![
      post("old", "2023-12-31"),
      post("b", "2024-01-01"),
      post("a", "2024-01-01"),
    ];
    sort_posts(&mut posts);
    let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, ["a", "b", "old"]);
  }

  #[test]
  fn test_non_markdown_entry_rejected() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("a.md"), "x").expect("write");
    fs::write(dir.path().join("notes.txt"), "x").expect("write");
    assert!(matches!(
      collect_post_sources(dir.path()),
      Err(SiteError::NonMarkdownEntry(ref p)) if p.ends_with("notes.txt")
    ));
  }

  #[test]
  fn test_subdirectory_rejected() {
    let dir = tempdir().expect("tempdir");
    fs::create_dir(dir.path().join("drafts.md")).expect("mkdir");
    assert!(matches!(
      collect_post_sources(dir.path()),
      Err(SiteError::NonMarkdownEntry(_))
    ));
  }

  #[test]
  fn test_missing_publish_date() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("undated.md");
    fs::write(&path, "---\ndescription: x\n---\n# Undated\n").expect("write");

    let processor = MarkdownProcessor::new(MarkdownOptions::default());
    let error = render_post(&processor, &Config::default(), &path)
      .expect_err("should fail");
    assert!(matches!(
      error.downcast_ref::<SiteError>(),
      Some(SiteError::MissingPublishDate(title)) if title == "Undated"
    ));
  }

  #[test]
  fn test_render_post_urls() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("hello.md");
    fs::write(
      &path,
      "---\ndescription: Hi\npublish_date: \"2024-02-03\"\n---\n# Hello\n\nText.\n",
    )
    .expect("write");

    let mut config = Config::default();
    config.site_url = "https://example.com/".to_string();
    let processor = MarkdownProcessor::new(MarkdownOptions::default());
    let post = render_post(&processor, &config, &path).expect("render");

    assert_eq!(post.slug, "hello");
    assert_eq!(post.folder, "blog/hello");
    assert_eq!(post.url, "https://example.com/blog/hello");
    assert!(post.html.starts_with("<article>\n<h1>Hello</h1><p><strong><time"));
  }
}
