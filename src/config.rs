use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub data: DataConfig,
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub predict: PredictConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// Labeled CSV used by `storecast train`.
    pub train_path: PathBuf,
    /// Unlabeled CSV used by `storecast predict` and `storecast describe`.
    pub serve_path: PathBuf,
    /// Optional row cap applied when loading either file.
    #[serde(default)]
    pub max_rows: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TrainingConfig {
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Ridge penalties searched exhaustively; best holdout RMSE wins.
    #[serde(default = "default_lambda_grid")]
    pub lambda_grid: Vec<f64>,
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_fraction: default_test_fraction(),
            seed: default_seed(),
            lambda_grid: default_lambda_grid(),
            model_path: default_model_path(),
        }
    }
}

fn default_test_fraction() -> f64 {
    0.25
}
fn default_seed() -> u64 {
    42
}
fn default_lambda_grid() -> Vec<f64> {
    vec![0.1, 1.0, 10.0]
}
fn default_model_path() -> PathBuf {
    PathBuf::from("model/storecast.json")
}

#[derive(Debug, Deserialize, Clone)]
pub struct PredictConfig {
    /// Rows per model invocation; defaults to ceil(total / 100) when unset.
    #[serde(default)]
    pub chunk_size: Option<usize>,
    /// Row cap applied when `predict --rows` is not given.
    #[serde(default = "default_rows")]
    pub default_rows: usize,
    /// Head size for `storecast describe`.
    #[serde(default = "default_head_rows")]
    pub head_rows: usize,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            chunk_size: None,
            default_rows: default_rows(),
            head_rows: default_head_rows(),
        }
    }
}

fn default_rows() -> usize {
    1000
}
fn default_head_rows() -> usize {
    15
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    #[serde(default = "default_author")]
    pub author: String,
    #[serde(default = "default_license")]
    pub license: String,
    #[serde(default = "default_description")]
    pub description: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            author: default_author(),
            license: default_license(),
            description: default_description(),
        }
    }
}

fn default_author() -> String {
    "storecast".to_string()
}
fn default_license() -> String {
    "MIT".to_string()
}
fn default_description() -> String {
    "Predicts the sales amount in specific stores.".to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate training
    if !(0.0..1.0).contains(&config.training.test_fraction) || config.training.test_fraction == 0.0
    {
        anyhow::bail!("training.test_fraction must be in (0.0, 1.0)");
    }
    if config.training.lambda_grid.is_empty() {
        anyhow::bail!("training.lambda_grid must not be empty");
    }
    if config.training.lambda_grid.iter().any(|l| *l <= 0.0) {
        anyhow::bail!("training.lambda_grid entries must be > 0");
    }

    // Validate predict
    if config.predict.default_rows == 0 {
        anyhow::bail!("predict.default_rows must be >= 1");
    }
    if config.predict.chunk_size == Some(0) {
        anyhow::bail!("predict.chunk_size must be >= 1 when set");
    }
    if config.predict.head_rows == 0 {
        anyhow::bail!("predict.head_rows must be >= 1");
    }

    Ok(config)
}
