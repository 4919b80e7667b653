use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use scoped_autolink::AutolinkConfig;

/// Resolve scoped resource paths and serve stylesheets with rewritten `url(...)` references.
#[derive(Debug, Parser)]
#[command(name = "scoped-autolink", version, about)]
struct Cli {
  /// Configuration file; defaults to `autolink.config.json` in the working directory.
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Print the URL a prefixed path resolves to.
  Resolve {
    /// Path such as `cp:/icons/logo.png` or `ctx:/res/site.css`.
    path: String,
    /// Resolve as a stylesheet whose references are rewritten when served.
    #[arg(long)]
    css: bool,
  },
  /// Print the body served for a prefixed path, rewriting stylesheets.
  Serve {
    /// Path such as `myscope:/css/site.css`.
    path: String,
  },
}

fn init_logging() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .with_target(false)
    .init();
}

fn main() -> Result<()> {
  init_logging();
  let cli = Cli::parse();

  let config = match &cli.config {
    Some(path) => AutolinkConfig::from_path(path)?,
    None => {
      let cwd = std::env::current_dir().context("failed to determine working directory")?;
      AutolinkConfig::discover(&cwd)
    }
  };
  let autolinker = config
    .into_autolinker()
    .context("failed to configure scopes")?;

  match cli.command {
    Command::Resolve { path, css } => {
      let locator = if css {
        autolinker.resolve_for_css(&path)?
      } else {
        autolinker.resolve(&path)?
      }
      .ok_or_else(|| anyhow!("no registered scope prefix matches `{path}`"))?;
      println!("{}", autolinker.url_for(&locator)?);
    }
    Command::Serve { path } => {
      let is_stylesheet = path
        .split('?')
        .next()
        .is_some_and(|value| value.to_ascii_lowercase().ends_with(".css"));
      let locator = if is_stylesheet {
        autolinker.resolve_for_css(&path)?
      } else {
        autolinker.resolve(&path)?
      }
      .ok_or_else(|| anyhow!("no registered scope prefix matches `{path}`"))?;

      let body = autolinker
        .load(&locator)
        .with_context(|| format!("failed to serve `{path}`"))?;
      io::stdout()
        .write_all(&body)
        .context("failed to write response body")?;
    }
  }

  Ok(())
}
