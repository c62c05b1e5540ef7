//! # Storecast CLI
//!
//! The `storecast` binary drives the forecasting pipeline: training, data
//! inspection, batch prediction, and model export.
//!
//! ## Usage
//!
//! ```bash
//! storecast --config ./config/storecast.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `storecast train` | Fit the regression model and save it |
//! | `storecast describe` | Show head rows and column summaries |
//! | `storecast predict` | Sample, transform, and predict in chunks |
//! | `storecast export` | Build the deployment artifact with metadata |

mod config;
mod dataset;
mod error;
mod export;
mod forecast;
mod model;
mod models;
mod predict;
mod progress;
mod sample;
mod stats;
mod train;
mod transform;
mod view;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::forecast::PredictOptions;
use crate::progress::ProgressMode;

/// Storecast, a sales forecasting pipeline for retail data.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/storecast.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "storecast",
    about = "Storecast: feature engineering, batched prediction, and model export for retail sales data",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/storecast.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Fit the regression model on the labeled training CSV.
    ///
    /// Splits the data, sweeps the configured ridge-penalty grid, reports
    /// holdout RMSE per candidate, and saves the best model under the
    /// explicit JSON model schema.
    Train {
        /// Maximum number of training rows to load.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show head rows and per-column summaries of the serving dataset.
    Describe {
        /// Number of head rows to show (default from config).
        #[arg(long)]
        head: Option<usize>,

        /// Show every row instead of just the head (slow on large files).
        #[arg(long)]
        all: bool,
    },

    /// Predict sales for a bounded sample of the serving dataset.
    ///
    /// Selects up to `--rows` rows (deterministic thinning, or uniform
    /// random with `--random`), engineers features, and predicts in
    /// contiguous chunks, reporting progress on stderr between chunks.
    Predict {
        /// Number of rows to process (default from config).
        #[arg(long)]
        rows: Option<usize>,

        /// Select rows uniformly at random instead of thinning the tail.
        #[arg(long)]
        random: bool,

        /// Rows per model invocation. Defaults to roughly total/100 so any
        /// input yields about 100 progress updates.
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Progress output on stderr: auto, off, human, or json.
        #[arg(long, default_value = "auto")]
        progress: String,

        /// Print chart points (day_of_week, customers, sales, promo) as
        /// JSON instead of the text table.
        #[arg(long)]
        json: bool,

        /// Write the predicted rows to this CSV file.
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Export the saved model as a deployment artifact with metadata.
    Export {
        /// Write the artifact here instead of stdout.
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

fn parse_progress_mode(s: &str) -> anyhow::Result<ProgressMode> {
    match s {
        "auto" => Ok(ProgressMode::default_for_tty()),
        "off" => Ok(ProgressMode::Off),
        "human" => Ok(ProgressMode::Human),
        "json" => Ok(ProgressMode::Json),
        other => anyhow::bail!("unknown progress mode '{}'; use auto, off, human, or json", other),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Train { limit } => {
            train::run_train(&cfg, limit)?;
        }
        Commands::Describe { head, all } => {
            stats::run_describe(&cfg, head, all)?;
        }
        Commands::Predict {
            rows,
            random,
            chunk_size,
            progress,
            json,
            output,
        } => {
            let opts = PredictOptions {
                rows,
                random,
                chunk_size,
                progress: parse_progress_mode(&progress)?,
                json,
                output,
            };
            forecast::run_predict(&cfg, &opts)?;
        }
        Commands::Export { output } => {
            export::run_export(&cfg, output.as_deref())?;
        }
    }

    Ok(())
}
