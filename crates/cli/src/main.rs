mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{PlanOptions, cmd_plan, cmd_validate};

/// regctl - keep generated catalog resources up to date
#[derive(Parser)]
#[command(name = "regctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging (overrides RUST_LOG)
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the commands that refresh stale or create missing resources
  Plan {
    /// Path to the manifest file
    manifest: PathBuf,

    /// Catalog snapshot to list resources from (YAML or JSON)
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Print actions as JSON
    #[arg(long)]
    json: bool,

    /// Evaluate every entry even if some fail
    #[arg(short, long)]
    keep_going: bool,
  },

  /// Check a manifest for problems without listing the catalog
  Validate {
    /// Path to the manifest file
    manifest: PathBuf,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Plan {
      manifest,
      catalog,
      json,
      keep_going,
    } => cmd_plan(&PlanOptions {
      manifest,
      catalog,
      json,
      keep_going,
      verbose: cli.verbose,
    }),
    Commands::Validate { manifest } => cmd_validate(&manifest),
  }
}
