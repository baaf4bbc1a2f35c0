use std::fs;

use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Serialize;
use tera::Tera;

use crate::{config::Config, error::SiteError};

/// Built-in page shell, used unless `template_path` is configured.
const DEFAULT_TEMPLATE: &str = include_str!("../../../templates/page.html");

/// Name the template is registered under. It has no `.html` suffix so tera
/// does not autoescape: values are escaped here, and `content` is already
/// HTML.
const TEMPLATE_NAME: &str = "page";

/// What a single page contributes to the shell.
#[derive(Debug, Clone)]
pub struct Page<'a> {
  pub title:         &'a str,
  pub description:   &'a str,
  pub canonical_url: &'a str,
  /// `article` for posts, `profile` for the homepage.
  pub og_type:       &'a str,
  /// Extra `og:` style properties, e.g. `article:published_time`.
  pub og_extras:     Vec<(&'a str, String)>,
  /// Rendered body HTML, inserted verbatim.
  pub content:       &'a str,
}

#[derive(Serialize)]
struct OgTag {
  property: String,
  content:  String,
}

fn attr(value: &str) -> String {
  encode_double_quoted_attribute(value).into_owned()
}

/// Wraps rendered documents in the site's page template.
pub struct PageRenderer {
  tera:             Tera,
  lang:             String,
  site_title:       String,
  author:           String,
  keywords:         String,
  stylesheets:      Vec<String>,
  feed_href:        String,
  analytics_script: Option<String>,
}

impl PageRenderer {
  /// Load the configured template (or the built-in one) and precompute the
  /// site-wide values.
  ///
  /// # Errors
  ///
  /// Fails if a custom template cannot be read or does not parse.
  pub fn new(config: &Config) -> Result<Self, SiteError> {
    let content = get_template_content(config)?;
    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, &content)?;

    Ok(Self {
      tera,
      lang: attr(&config.language),
      site_title: attr(&config.site_title),
      author: attr(&config.author.full_name()),
      keywords: attr(&config.keywords.join(", ")),
      stylesheets: config.stylesheets.iter().map(|href| attr(href)).collect(),
      feed_href: attr(&format!("/{}", config.feed_file)),
      analytics_script: config.analytics_script.as_deref().map(attr),
    })
  }

  /// Render a complete HTML document for `page`.
  ///
  /// # Errors
  ///
  /// Returns [`SiteError::Template`] if tera fails to render.
  pub fn render(&self, page: &Page<'_>) -> Result<String, SiteError> {
    let og_extras: Vec<OgTag> = page
      .og_extras
      .iter()
      .map(|(property, content)| {
        OgTag {
          property: attr(property),
          content:  attr(content),
        }
      })
      .collect();

    let mut context = tera::Context::new();
    context.insert("lang", &self.lang);
    context.insert("site_title", &self.site_title);
    context.insert("author", &self.author);
    context.insert("keywords", &self.keywords);
    context.insert("stylesheets", &self.stylesheets);
    context.insert("feed_href", &self.feed_href);
    context.insert("analytics_script", &self.analytics_script);
    context.insert("title", &encode_text(page.title));
    context.insert("title_attr", &attr(page.title));
    context.insert("description", &attr(page.description));
    context.insert("canonical_url", &attr(page.canonical_url));
    context.insert("og_type", &attr(page.og_type));
    context.insert("og_extras", &og_extras);
    context.insert("content", page.content);

    Ok(self.tera.render(TEMPLATE_NAME, &context)?)
  }
}

/// Read the custom template if one is configured, otherwise use the
/// built-in one.
fn get_template_content(config: &Config) -> Result<String, SiteError> {
  match &config.template_path {
    Some(path) => {
      log::debug!("Using custom page template: {}", path.display());
      fs::read_to_string(path).map_err(|e| {
        SiteError::Template(format!(
          "Failed to read template {}: {e}",
          path.display()
        ))
      })
    },
    None => Ok(DEFAULT_TEMPLATE.to_string()),
  }
}
