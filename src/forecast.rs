//! The serving flow: select rows, engineer features, predict in chunks.
//!
//! Glues the sampler, transformer, and batched predictor together for the
//! `predict` command, then hands the result to the presentation views.

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::dataset;
use crate::model;
use crate::predict::predict_batched;
use crate::progress::ProgressMode;
use crate::sample::sample;
use crate::transform::transform;
use crate::view::PredictionView;

/// Options for one `predict` invocation.
#[derive(Debug, Clone)]
pub struct PredictOptions {
    /// Row cap; falls back to `predict.default_rows` from config.
    pub rows: Option<usize>,
    /// Random selection instead of deterministic thinning.
    pub random: bool,
    /// Rows per model call; falls back to config, then to ceil(total/100).
    pub chunk_size: Option<usize>,
    /// Where progress goes (stderr human/JSON, or off).
    pub progress: ProgressMode,
    /// Emit chart points as JSON instead of the text table.
    pub json: bool,
    /// Optional CSV destination for the predicted rows.
    pub output: Option<std::path::PathBuf>,
}

/// Run the `predict` command end to end.
pub fn run_predict(config: &Config, opts: &PredictOptions) -> Result<()> {
    let model_path: &Path = &config.training.model_path;
    let model = model::load(model_path)
        .with_context(|| format!("no usable model at {}", model_path.display()))?
        .into_model()?;

    let records = dataset::load_records(&config.data.serve_path, config.data.max_rows)?;
    let target_count = opts.rows.unwrap_or(config.predict.default_rows);
    let selected = sample(&records, target_count, opts.random)?;

    let engineered = transform(&selected)?;

    let reporter = opts.progress.reporter();
    let chunk_size = opts.chunk_size.or(config.predict.chunk_size);
    let predictions = predict_batched(&engineered, model.as_ref(), chunk_size, |processed, total| {
        reporter.report(processed, total)
    })?;

    if let Some(ref path) = opts.output {
        dataset::write_predictions(path, &selected, &predictions)?;
        eprintln!("predictions written to {}", path.display());
    }

    let view = PredictionView::new(selected, predictions);
    if opts.json {
        println!("{}", serde_json::to_string_pretty(&view.chart_points())?);
    } else {
        print!("{}", view.render());
    }

    Ok(())
}
