//! Trait-based syntax highlighting with a Syntect backend.
//!
//! The backend uses Sublime Text syntax definitions, with two-face added for
//! extended syntax definitions and themes.

pub mod error;
mod syntect;
pub mod types;

pub use error::{SyntaxError, SyntaxResult};
pub use self::syntect::{CLASS_PREFIX, SyntectHighlighter, create_syntect_manager};
pub use types::{DEFAULT_THEME, SyntaxConfig, SyntaxHighlighter, SyntaxManager};

/// Create the default syntax manager with the given theme.
///
/// # Errors
///
/// Returns [`SyntaxError::ThemeNotFound`] for an unknown theme.
pub fn create_default_manager(theme: Option<&str>) -> SyntaxResult<SyntaxManager> {
  let mut config = SyntaxConfig::default();
  if let Some(theme) = theme {
    config.theme = theme.to_string();
  }
  create_syntect_manager(config)
}
