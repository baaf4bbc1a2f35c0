use crate::error::SiteError;

/// Default configuration in TOML, commented so a new user knows what each
/// key does.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# quire configuration file

# Directory containing index.md and the posts directory
input_dir = "src"

# Output directory for the generated site (cleared on every build)
output_dir = "build"

# Name of the posts directory inside input_dir; also the URL prefix of posts
blog_dir = "blog"

# Absolute URL the site is served from, used for canonical links and the feed
site_url = "https://example.com"

# Channel metadata for the RSS feed and the page <head>
site_title = "My Blog"
site_description = "Notes and long-form posts"
language = "en-us"

# File name of the RSS feed inside output_dir
feed_file = "rss.xml"

# Author, used for <meta name="author"> and the homepage OpenGraph profile
[author]
first_name = "Jane"
last_name = "Doe"

# Everything below is optional.

# keywords = ["rust", "graphics"]

# Directory whose contents are copied verbatim into output_dir
# assets_dir = "assets"

# Extra stylesheets linked from every page, as URL paths
# stylesheets = ["/css/sakura-dark.css"]

# Syntax highlighting theme used for css/highlight.css
# highlight_theme = "GruvboxDark"

# Path to a custom page template (tera syntax)
# template_path = "templates/page.html"

# Number of threads used to render posts (defaults to number of CPU cores)
# jobs = 4

# Source of an analytics <script> included on every page
# analytics_script = "//gc.zgo.at/count.js"
"#;

/// Default configuration in JSON.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "input_dir": "src",
  "output_dir": "build",
  "blog_dir": "blog",
  "site_url": "https://example.com",
  "site_title": "My Blog",
  "site_description": "Notes and long-form posts",
  "language": "en-us",
  "feed_file": "rss.xml",
  "author": {
    "first_name": "Jane",
    "last_name": "Doe"
  },
  "keywords": [],
  "stylesheets": [],
  "highlight_theme": "GruvboxDark"
}
"#;

/// Get the configuration template for the requested format.
///
/// # Errors
///
/// Returns [`SiteError::Config`] for anything other than `toml` or `json`.
pub fn get_template(format: &str) -> Result<&'static str, SiteError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => {
      Err(SiteError::Config(format!(
        "Unsupported config format: {format}"
      )))
    },
  }
}
