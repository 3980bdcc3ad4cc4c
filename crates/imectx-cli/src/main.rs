#![deny(unsafe_code)]

//! imectx CLI: classify caret positions and resolve input methods.

mod commands;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use imectx_config::AppConfig;
use imectx_core::{TraceCollector, TraceReader};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

/// imectx: decide which input method fits the caret's position in a file.
#[derive(Parser)]
#[command(name = "imectx", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "imectx.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// A caret position in a file on disk.
#[derive(Args)]
pub(crate) struct CaretArgs {
    /// File to inspect.
    pub file: PathBuf,

    /// Caret offset in characters from the start of the file.
    #[arg(short, long, allow_negative_numbers = true)]
    pub offset: i64,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify the lexical context at the caret.
    Classify {
        #[command(flatten)]
        caret: CaretArgs,

        /// Treat the file as a Git commit message regardless of its name.
        #[arg(long)]
        git_commit: bool,

        /// Also print the classifier's decision trace.
        #[arg(long)]
        explain: bool,
    },

    /// Resolve the input method to switch to at the caret.
    Decide {
        #[command(flatten)]
        caret: CaretArgs,
    },

    /// Validate and display configuration.
    Config {
        /// Show the resolved configuration.
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, found) = load_config(&cli.config).await?;
    let trace = init_tracing(cli.verbose, &config.logging.level);
    if !found {
        info!(path = %cli.config.display(), "Config file not found, using defaults");
    }

    let output = match cli.command {
        Commands::Classify {
            caret,
            git_commit,
            explain,
        } => {
            let mut out = commands::classify(&config, &caret, git_commit).await?;
            if explain {
                out.push_str(&commands::render_trace(&trace.entries()));
            }
            out
        }
        Commands::Decide { caret } => commands::decide(&config, &caret).await?,
        Commands::Config { show } => commands::show_config(&config, &cli.config, show)?,
    };
    print!("{output}");

    Ok(())
}

/// Install the stderr formatter plus a collector for `--explain`.
fn init_tracing(verbose: u8, config_level: &str) -> TraceReader {
    let filter = match verbose {
        0 => config_level,
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let collector = TraceCollector::new(512);
    let reader = collector.reader();
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(env_filter),
        )
        .with(collector)
        .init();
    reader
}

async fn load_config(path: &Path) -> Result<(AppConfig, bool)> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        let config = AppConfig::load(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?;
        Ok((config, true))
    } else {
        Ok((AppConfig::default(), false))
    }
}
