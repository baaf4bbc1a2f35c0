pub mod templates;

use std::{
  collections::BTreeMap,
  fs,
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Context, Result, eyre};
use quire_markdown::syntax::DEFAULT_THEME;
use serde::{Deserialize, Serialize};

use crate::{
  cli::{Cli, Commands},
  error::SiteError,
};

fn default_input_dir() -> PathBuf {
  PathBuf::from("src")
}

fn default_output_dir() -> PathBuf {
  PathBuf::from("build")
}

fn default_site_url() -> String {
  "http://localhost:8080".to_string()
}

fn default_site_title() -> String {
  "My Blog".to_string()
}

fn default_site_description() -> String {
  "Posts and notes".to_string()
}

fn default_language() -> String {
  "en-us".to_string()
}

fn default_highlight_theme() -> String {
  DEFAULT_THEME.to_string()
}

fn default_blog_dir() -> String {
  "blog".to_string()
}

fn default_feed_file() -> String {
  "rss.xml".to_string()
}

/// Author name, shown in page metadata and the homepage profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
  #[serde(default)]
  pub first_name: String,

  #[serde(default)]
  pub last_name: String,
}

impl Author {
  /// First and last name joined by a space, or an empty string.
  #[must_use]
  pub fn full_name(&self) -> String {
    [self.first_name.trim(), self.last_name.trim()]
      .into_iter()
      .filter(|part| !part.is_empty())
      .collect::<Vec<_>>()
      .join(" ")
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
  /// Directory containing `index.md` and the posts directory.
  #[serde(default = "default_input_dir")]
  pub input_dir: PathBuf,

  /// Output directory for the generated site.
  #[serde(default = "default_output_dir")]
  pub output_dir: PathBuf,

  /// Directory whose contents are copied into the output directory.
  #[serde(default)]
  pub assets_dir: Option<PathBuf>,

  /// Path to a custom page template.
  #[serde(default)]
  pub template_path: Option<PathBuf>,

  /// Absolute URL the site is served from.
  #[serde(default = "default_site_url")]
  pub site_url: String,

  #[serde(default = "default_site_title")]
  pub site_title: String,

  #[serde(default = "default_site_description")]
  pub site_description: String,

  /// Language tag for the feed and the `<html lang>` attribute.
  #[serde(default = "default_language")]
  pub language: String,

  #[serde(default)]
  pub author: Author,

  #[serde(default)]
  pub keywords: Vec<String>,

  /// Extra stylesheet URLs linked from every page.
  #[serde(default)]
  pub stylesheets: Vec<String>,

  /// Theme used to generate `css/highlight.css`.
  #[serde(default = "default_highlight_theme")]
  pub highlight_theme: String,

  /// Number of threads to use for rendering posts.
  #[serde(default)]
  pub jobs: Option<usize>,

  /// Posts directory name inside `input_dir`, also the URL prefix of posts.
  #[serde(default = "default_blog_dir")]
  pub blog_dir: String,

  /// File name of the RSS feed inside `output_dir`.
  #[serde(default = "default_feed_file")]
  pub feed_file: String,

  /// Source URL of an analytics script included on every page.
  #[serde(default)]
  pub analytics_script: Option<String>,

  /// Keys we do not recognise; reported once at load time.
  #[serde(default, flatten, skip_serializing)]
  pub unknown: BTreeMap<String, serde_json::Value>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      input_dir:        default_input_dir(),
      output_dir:       default_output_dir(),
      assets_dir:       None,
      template_path:    None,
      site_url:         default_site_url(),
      site_title:       default_site_title(),
      site_description: default_site_description(),
      language:         default_language(),
      author:           Author::default(),
      keywords:         Vec::new(),
      stylesheets:      Vec::new(),
      highlight_theme:  default_highlight_theme(),
      jobs:             None,
      blog_dir:         default_blog_dir(),
      feed_file:        default_feed_file(),
      analytics_script: None,
      unknown:          BTreeMap::new(),
    }
  }
}

impl Config {
  /// Create a new configuration from a file.
  /// Only TOML and JSON are supported.
  ///
  /// # Errors
  ///
  /// Fails if the file cannot be read, has an unsupported extension or does
  /// not parse.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).wrap_err_with(|| {
      format!("Failed to read config file: {}", path.display())
    })?;

    let extension = path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_lowercase)
      .ok_or_else(|| {
        eyre!("Config file has no extension: {}", path.display())
      })?;

    let config: Self = match extension.as_str() {
      "json" => {
        serde_json::from_str(&content)
          .map_err(SiteError::from)
          .wrap_err_with(|| {
            format!("Failed to parse JSON config from {}", path.display())
          })?
      },
      "toml" => {
        toml::from_str(&content)
          .map_err(SiteError::from)
          .wrap_err_with(|| {
            format!("Failed to parse TOML config from {}", path.display())
          })?
      },
      _ => {
        return Err(eyre!(
          "Unsupported config file format: {}",
          path.display()
        ));
      },
    };

    for key in config.unknown.keys() {
      log::warn!("Ignoring unknown config key '{key}' in {}", path.display());
    }

    Ok(config)
  }

  /// Load config from file and CLI arguments, then validate it.
  ///
  /// # Errors
  ///
  /// Fails if an explicit or discovered config file cannot be loaded, or if
  /// the merged configuration does not validate.
  pub fn load(cli: &Cli) -> Result<Self> {
    let mut config = if let Some(config_path) = &cli.config_file {
      Self::from_file(config_path).wrap_err_with(|| {
        format!("Failed to load config from {}", config_path.display())
      })?
    } else if let Some(discovered_config) = Self::find_config_file() {
      log::info!(
        "Using discovered config file: {}",
        discovered_config.display()
      );
      Self::from_file(&discovered_config).wrap_err_with(|| {
        format!(
          "Failed to load discovered config from {}",
          discovered_config.display()
        )
      })?
    } else {
      log::debug!("No config file found, using defaults");
      Self::default()
    };

    config.merge_with_cli(cli);
    config.validate_paths()?;

    Ok(config)
  }

  /// Merge CLI arguments into this config, prioritizing CLI values when
  /// present.
  pub fn merge_with_cli(&mut self, cli: &Cli) {
    if let Some(Commands::Build {
      input_dir,
      output_dir,
      jobs,
      site_url,
      template,
    }) = &cli.command
    {
      if let Some(input_dir) = input_dir {
        self.input_dir.clone_from(input_dir);
      }
      if let Some(output_dir) = output_dir {
        self.output_dir.clone_from(output_dir);
      }
      if jobs.is_some() {
        self.jobs = *jobs;
      }
      if let Some(site_url) = site_url {
        self.site_url.clone_from(site_url);
      }
      if let Some(template) = template {
        self.template_path = Some(template.clone());
      }
    }
  }

  /// Search for config files in common locations.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    let config_filenames = [
      "quire.toml",
      "quire.json",
      ".quire.toml",
      ".quire.json",
      ".config/quire.toml",
      ".config/quire.json",
    ];

    let current_dir = std::env::current_dir().ok()?;
    for filename in &config_filenames {
      let config_path = current_dir.join(filename);
      if config_path.exists() {
        return Some(config_path);
      }
    }

    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
      let xdg_config_dir = PathBuf::from(xdg_config_home).join("quire");
      for filename in &["config.toml", "config.json"] {
        let config_path = xdg_config_dir.join(filename);
        if config_path.exists() {
          return Some(config_path);
        }
      }
    }

    if let Ok(home) = std::env::var("HOME") {
      let home_config_dir = PathBuf::from(home).join(".config").join("quire");
      for filename in &["config.toml", "config.json"] {
        let config_path = home_config_dir.join(filename);
        if config_path.exists() {
          return Some(config_path);
        }
      }
    }

    None
  }

  /// Validate paths and values, collecting every problem before failing.
  ///
  /// # Errors
  ///
  /// Returns [`SiteError::Config`] listing all problems found.
  pub fn validate_paths(&self) -> Result<(), SiteError> {
    let mut errors = Vec::new();

    if !self.input_dir.exists() {
      errors.push(format!(
        "Input directory does not exist: {}",
        self.input_dir.display()
      ));
    } else if !self.input_dir.is_dir() {
      errors.push(format!(
        "Input path is not a directory: {}",
        self.input_dir.display()
      ));
    }

    if let Some(ref template_path) = self.template_path {
      if !template_path.is_file() {
        errors.push(format!(
          "Template file does not exist: {}",
          template_path.display()
        ));
      }
    }

    if let Some(ref assets_dir) = self.assets_dir {
      if !assets_dir.exists() {
        errors.push(format!(
          "Assets directory does not exist: {}",
          assets_dir.display()
        ));
      } else if !assets_dir.is_dir() {
        errors.push(format!(
          "Assets directory path is not a directory: {}",
          assets_dir.display()
        ));
      } else if contains_path(&self.output_dir, assets_dir) {
        errors.push(format!(
          "Assets directory {} is inside the output directory, which is \
           cleared on every build",
          assets_dir.display()
        ));
      }
    }

    // The output directory is wiped, so it must not hold the sources.
    if self.input_dir.exists() && contains_path(&self.output_dir, &self.input_dir)
    {
      errors.push(format!(
        "Output directory {} contains the input directory {}",
        self.output_dir.display(),
        self.input_dir.display()
      ));
    }

    if !(self.site_url.starts_with("http://")
      || self.site_url.starts_with("https://"))
    {
      errors.push(format!(
        "site_url must be an absolute http(s) URL: {}",
        self.site_url
      ));
    }

    if self.jobs == Some(0) {
      errors.push("jobs must be at least 1".to_string());
    }

    for (key, value) in [("blog_dir", &self.blog_dir), ("feed_file", &self.feed_file)]
    {
      if value.trim().is_empty() || value.contains(['/', '\\']) || value == ".."
      {
        errors.push(format!(
          "{key} must be a single path segment, got '{value}'"
        ));
      }
    }

    if !errors.is_empty() {
      return Err(SiteError::Config(format!(
        "Configuration validation errors:\n{}",
        errors.join("\n")
      )));
    }

    Ok(())
  }

  /// Generate a default configuration file with commented explanations.
  ///
  /// # Errors
  ///
  /// Fails on an unsupported format or if the file cannot be written.
  pub fn generate_default_config(format: &str, path: &Path) -> Result<()> {
    let config_content = templates::get_template(format)?;

    fs::write(path, config_content).wrap_err_with(|| {
      format!("Failed to write default config to {}", path.display())
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }

  /// Site URL without a trailing slash.
  #[must_use]
  pub fn base_url(&self) -> &str {
    self.site_url.trim_end_matches('/')
  }

  /// Site-relative folder of a post, e.g. `blog/hello`.
  #[must_use]
  pub fn post_folder(&self, slug: &str) -> String {
    format!("{}/{slug}", self.blog_dir)
  }

  /// Canonical URL of a post.
  #[must_use]
  pub fn post_url(&self, slug: &str) -> String {
    format!("{}/{}", self.base_url(), self.post_folder(slug))
  }

  /// Canonical URL of the feed.
  #[must_use]
  pub fn feed_url(&self) -> String {
    format!("{}/{}", self.base_url(), self.feed_file)
  }

  /// Directory holding the post sources.
  #[must_use]
  pub fn posts_dir(&self) -> PathBuf {
    self.input_dir.join(&self.blog_dir)
  }
}

/// Whether `outer` is `inner` or one of its ancestors.
fn contains_path(outer: &Path, inner: &Path) -> bool {
  let resolve = |path: &Path| {
    fs::canonicalize(path).unwrap_or_else(|_| {
      std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
    })
  };
  resolve(inner).starts_with(resolve(outer))
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use std::fs;

  use clap::Parser;
  use tempfile::tempdir;

  use super::*;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.input_dir, PathBuf::from("src"));
    assert_eq!(config.output_dir, PathBuf::from("build"));
    assert_eq!(config.blog_dir, "blog");
    assert_eq!(config.feed_file, "rss.xml");
    assert_eq!(config.language, "en-us");
    assert_eq!(config.highlight_theme, DEFAULT_THEME);
  }

  #[test]
  fn test_toml_with_partial_keys() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("quire.toml");
    fs::write(
      &path,
      "site_url = \"https://example.org/\"\nsite_title = \"T\"\n\n[author]\nfirst_name = \"Ada\"\n",
    )
    .expect("write");

    let config = Config::from_file(&path).expect("load");
    assert_eq!(config.site_title, "T");
    assert_eq!(config.base_url(), "https://example.org");
    assert_eq!(config.author.full_name(), "Ada");
    assert_eq!(config.output_dir, PathBuf::from("build"));
    assert_eq!(config.post_url("hello"), "https://example.org/blog/hello");
    assert_eq!(config.feed_url(), "https://example.org/rss.xml");
  }

  #[test]
  fn test_json_config() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("quire.json");
    fs::write(&path, r#"{"jobs": 2, "keywords": ["a", "b"], "mystery": 1}"#)
      .expect("write");

    let config = Config::from_file(&path).expect("load");
    assert_eq!(config.jobs, Some(2));
    assert_eq!(config.keywords, vec!["a", "b"]);
    assert!(config.unknown.contains_key("mystery"));
  }

  #[test]
  fn test_unsupported_extension() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("quire.yaml");
    fs::write(&path, "site_title: x").expect("write");
    assert!(Config::from_file(&path).is_err());
  }

  #[test]
  fn test_cli_overrides_win() {
    let mut config = Config {
      site_url: "https://from-file.example".to_string(),
      jobs: Some(8),
      ..Config::default()
    };
    let cli = Cli::parse_from([
      "quire",
      "build",
      "--site-url",
      "https://from-cli.example",
      "-o",
      "public",
    ]);
    config.merge_with_cli(&cli);
    assert_eq!(config.site_url, "https://from-cli.example");
    assert_eq!(config.output_dir, PathBuf::from("public"));
    assert_eq!(config.jobs, Some(8));
  }

  #[test]
  fn test_validation_collects_errors() {
    let dir = tempdir().expect("tempdir");
    let config = Config {
      input_dir: dir.path().join("missing"),
      output_dir: dir.path().join("out"),
      site_url: "example.com".to_string(),
      jobs: Some(0),
      blog_dir: "a/b".to_string(),
      ..Config::default()
    };

    let message = config
      .validate_paths()
      .expect_err("validation should fail")
      .to_string();
    assert!(message.contains("Input directory does not exist"));
    assert!(message.contains("site_url"));
    assert!(message.contains("jobs"));
    assert!(message.contains("blog_dir"));
  }

  #[test]
  fn test_output_must_not_contain_input() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("site").join("src");
    fs::create_dir_all(&input).expect("mkdir");

    let config = Config {
      input_dir: input,
      output_dir: dir.path().join("site"),
      ..Config::default()
    };
    assert!(matches!(config.validate_paths(), Err(SiteError::Config(_))));
  }

  #[test]
  fn test_generate_default_configs_parse() {
    let dir = tempdir().expect("tempdir");
    for format in ["toml", "json"] {
      let path = dir.path().join(format!("quire.{format}"));
      Config::generate_default_config(format, &path).expect("generate");
      let config = Config::from_file(&path).expect("parse generated");
      assert_eq!(config.site_title, "My Blog");
      assert_eq!(config.author.full_name(), "Jane Doe");
      assert!(config.unknown.is_empty());
    }
    assert!(
      Config::generate_default_config("yaml", &dir.path().join("x")).is_err()
    );
  }
}
