use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for quire
#[derive(Parser, Debug)]
#[command(author, version, about = "quire: a small static blog generator")]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`]). Defaults to `build`.
  #[command(subcommand)]
  pub command: Option<Commands>,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to a configuration file (TOML or JSON)
  #[arg(short = 'c', long = "config-file", global = true)]
  pub config_file: Option<PathBuf>,
}

/// All supported subcommands for the quire CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Initialize a new quire configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "quire.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Render the site: posts, homepage, assets and the RSS feed.
  Build {
    /// Directory containing `index.md` and the posts directory.
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// Output directory for the generated site. It is cleared first.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Number of threads to use for rendering posts.
    #[arg(short = 'p', long = "jobs")]
    jobs: Option<usize>,

    /// Absolute base URL of the site, used for canonical links and the feed.
    #[arg(short = 'u', long)]
    site_url: Option<String>,

    /// Path to a custom page template.
    #[arg(short, long)]
    template: Option<PathBuf>,
  },
}

impl Cli {
  /// Parse command line arguments.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
