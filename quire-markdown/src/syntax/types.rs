//! Core types and traits for syntax highlighting.

use std::collections::HashMap;

use super::error::{SyntaxError, SyntaxResult};

/// Trait for syntax highlighting backends.
///
/// Backends emit class-based markup: every token is a `<span>` whose classes
/// are resolved by a stylesheet produced from [`Self::stylesheet`], so the
/// page and the CSS must agree on a class prefix.
pub trait SyntaxHighlighter: Send + Sync {
  /// Get the name of this highlighter backend
  fn name(&self) -> &'static str;

  /// Get a list of supported languages
  fn supported_languages(&self) -> Vec<String>;

  /// Get a list of available themes
  fn available_themes(&self) -> Vec<String>;

  /// Check if a language is supported
  fn supports_language(&self, language: &str) -> bool {
    self
      .supported_languages()
      .iter()
      .any(|lang| lang.eq_ignore_ascii_case(language))
  }

  /// Check if a theme is available
  fn has_theme(&self, theme: &str) -> bool {
    self
      .available_themes()
      .iter()
      .any(|t| t.eq_ignore_ascii_case(theme))
  }

  /// Highlight `code` as `language`, returning the inner HTML of the
  /// `<code>` element.
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::UnsupportedLanguage`] when the backend has no
  /// grammar for `language`.
  fn highlight(&self, code: &str, language: &str) -> SyntaxResult<String>;

  /// CSS rules mapping the backend's token classes to colours of `theme`.
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::ThemeNotFound`] for unknown themes.
  fn stylesheet(&self, theme: &str) -> SyntaxResult<String>;
}

/// Configuration for syntax highlighting
#[derive(Debug, Clone)]
pub struct SyntaxConfig {
  /// Theme used for the generated stylesheet
  pub theme: String,

  /// Language aliases for mapping common names to supported languages
  pub language_aliases: HashMap<String, String>,
}

/// Theme used when the site configuration does not name one.
pub const DEFAULT_THEME: &str = "GruvboxDark";

impl Default for SyntaxConfig {
  fn default() -> Self {
    let language_aliases = [
      ("js", "javascript"),
      ("ts", "typescript"),
      ("py", "python"),
      ("rb", "ruby"),
      ("rs", "rust"),
      ("sh", "bash"),
      ("shell", "bash"),
      ("zsh", "bash"),
      ("yml", "yaml"),
      ("md", "markdown"),
      ("c++", "cpp"),
    ]
    .into_iter()
    .map(|(alias, name)| (alias.to_string(), name.to_string()))
    .collect();

    Self {
      theme: DEFAULT_THEME.to_string(),
      language_aliases,
    }
  }
}

/// High-level syntax highlighting manager.
///
/// Owns a backend plus the alias table and theme choice threaded in from
/// site configuration.
pub struct SyntaxManager {
  highlighter: Box<dyn SyntaxHighlighter>,
  config:      SyntaxConfig,
}

impl SyntaxManager {
  /// Create a new syntax manager with the given highlighter and config
  #[must_use]
  pub fn new(
    highlighter: Box<dyn SyntaxHighlighter>,
    config: SyntaxConfig,
  ) -> Self {
    Self {
      highlighter,
      config,
    }
  }

  /// Get the underlying highlighter
  #[must_use]
  pub fn highlighter(&self) -> &dyn SyntaxHighlighter {
    self.highlighter.as_ref()
  }

  /// Get the configuration
  #[must_use]
  pub const fn config(&self) -> &SyntaxConfig {
    &self.config
  }

  /// Resolve a language name using aliases
  #[must_use]
  pub fn resolve_language(&self, language: &str) -> String {
    let language = language.to_ascii_lowercase();
    self
      .config
      .language_aliases
      .get(&language)
      .cloned()
      .unwrap_or(language)
  }

  /// Highlight code after alias resolution. There is no plain-text fallback.
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::UnsupportedLanguage`] with the resolved name when
  /// the backend cannot highlight it.
  pub fn highlight_code(
    &self,
    code: &str,
    language: &str,
  ) -> SyntaxResult<String> {
    let resolved_language = self.resolve_language(language);

    if !self.highlighter.supports_language(&resolved_language) {
      return Err(SyntaxError::UnsupportedLanguage(resolved_language));
    }

    self.highlighter.highlight(code, &resolved_language)
  }

  /// Stylesheet for the configured theme.
  ///
  /// # Errors
  ///
  /// Propagates backend errors, such as an unknown theme.
  pub fn stylesheet(&self) -> SyntaxResult<String> {
    self.highlighter.stylesheet(&self.config.theme)
  }
}
