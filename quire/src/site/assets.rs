use std::{fs, path::Path};

use color_eyre::eyre::{Context, Result, eyre};
use fs_extra::dir::CopyOptions;
use log::debug;
use quire_markdown::syntax::SyntaxManager;

use crate::{config::Config, error::SiteError};

/// Path of the generated highlighting stylesheet, relative to the output
/// directory. Pages link it as `/css/highlight.css`.
pub const HIGHLIGHT_CSS: &str = "css/highlight.css";

/// Remove any previous build and recreate an empty output directory.
///
/// # Errors
///
/// Returns an error if the directory cannot be removed or created.
pub fn prepare_output_dir(output_dir: &Path) -> Result<()> {
  if output_dir.exists() {
    fs::remove_dir_all(output_dir).wrap_err_with(|| {
      format!("Failed to clear output directory {}", output_dir.display())
    })?;
    debug!("Cleared {}", output_dir.display());
  }
  fs::create_dir_all(output_dir).wrap_err_with(|| {
    format!("Failed to create output directory {}", output_dir.display())
  })
}

/// Copy the contents of the configured assets directory into the output
/// directory.
///
/// # Errors
///
/// Returns an error if copying fails.
pub fn copy_assets(config: &Config) -> Result<()> {
  let Some(assets_dir) = &config.assets_dir else {
    return Ok(());
  };

  let options = CopyOptions::new().overwrite(true).content_only(true);
  fs_extra::dir::copy(assets_dir, &config.output_dir, &options)
    .map_err(SiteError::from)
    .wrap_err_with(|| {
      format!(
        "Failed to copy assets from {} to {}",
        assets_dir.display(),
        config.output_dir.display()
      )
    })?;

  debug!("Copied assets from {}", assets_dir.display());
  Ok(())
}

/// Write the stylesheet matching the highlighter's class names.
///
/// # Errors
///
/// Returns an error if the theme has no stylesheet or it cannot be written.
pub fn write_highlight_css(
  config: &Config,
  manager: Option<&SyntaxManager>,
) -> Result<()> {
  let manager = manager.ok_or_else(|| {
    eyre!(
      "Syntax highlighting is unavailable (theme '{}')",
      config.highlight_theme
    )
  })?;
  let css = manager
    .stylesheet()
    .wrap_err("Failed to generate highlighting stylesheet")?;

  let target = config.output_dir.join(HIGHLIGHT_CSS);
  if let Some(parent) = target.parent() {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory {}", parent.display())
    })?;
  }
  fs::write(&target, css)
    .wrap_err_with(|| format!("Failed to write {}", target.display()))?;

  debug!("Wrote {}", target.display());
  Ok(())
}
