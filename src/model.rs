//! Model boundary: the predictor trait, bundled regressors, and persistence.
//!
//! The pipeline treats models as opaque: anything implementing [`SalesModel`]
//! can serve predictions. Two regressors ship with the crate: a mean
//! baseline and a ridge linear model. Saved models use an explicit JSON
//! schema that names the algorithm and its fitted parameters. There is no
//! whole-object pickling: a model file that does not declare a known
//! algorithm fails to load.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::models::{EngineeredRow, FEATURE_NAMES};

/// Current model file format version.
pub const FORMAT_VERSION: u32 = 1;

/// A trained regression model over engineered rows.
///
/// `predict` returns one value per input row, in input order. Models are
/// immutable once constructed; a serving session loads a model read-only.
pub trait SalesModel {
    /// Algorithm identifier recorded in the model file (e.g. `"ridge"`).
    fn algorithm(&self) -> &str;

    /// Predict one value per row, in input order.
    fn predict(&self, rows: &[EngineeredRow]) -> PipelineResult<Vec<f64>>;
}

// ============ Mean baseline ============

/// Predicts the training-set mean for every row. Useful as a sanity
/// baseline and in tests.
#[derive(Debug, Clone, PartialEq)]
pub struct MeanModel {
    pub mean: f64,
}

impl SalesModel for MeanModel {
    fn algorithm(&self) -> &str {
        "mean"
    }

    fn predict(&self, rows: &[EngineeredRow]) -> PipelineResult<Vec<f64>> {
        Ok(vec![self.mean; rows.len()])
    }
}

// ============ Ridge regression ============

/// Linear model with L2 penalty, fitted on standardized features.
///
/// Inputs are standardized with the stored per-feature means and standard
/// deviations before the dot product; a feature that was constant at fit
/// time (std == 0) contributes nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct RidgeModel {
    pub lambda: f64,
    pub intercept: f64,
    pub weights: Vec<f64>,
    pub feature_means: Vec<f64>,
    pub feature_stds: Vec<f64>,
}

impl SalesModel for RidgeModel {
    fn algorithm(&self) -> &str {
        "ridge"
    }

    fn predict(&self, rows: &[EngineeredRow]) -> PipelineResult<Vec<f64>> {
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let features = row.to_features();
            if features.len() != self.weights.len() {
                return Err(PipelineError::Prediction(format!(
                    "feature count mismatch: model has {} weights, row has {} features",
                    self.weights.len(),
                    features.len()
                )));
            }
            let mut y = self.intercept;
            for (i, x) in features.iter().enumerate() {
                let std = self.feature_stds[i];
                if std > 0.0 {
                    y += self.weights[i] * (x - self.feature_means[i]) / std;
                }
            }
            out.push(y);
        }
        Ok(out)
    }
}

// ============ Persistence ============

/// Fitted parameters, tagged by algorithm identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum SavedModel {
    Mean {
        mean: f64,
    },
    Ridge {
        lambda: f64,
        intercept: f64,
        weights: Vec<f64>,
        feature_means: Vec<f64>,
        feature_stds: Vec<f64>,
    },
}

/// On-disk model file: schema header plus the algorithm parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelFile {
    pub format_version: u32,
    pub target: String,
    pub feature_names: Vec<String>,
    pub model: SavedModel,
}

impl ModelFile {
    /// Wrap a trained model for saving under the current schema.
    pub fn new(model: SavedModel, target: &str) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            target: target.to_string(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            model,
        }
    }

    /// Reconstruct a predictor from the saved parameters.
    pub fn into_model(self) -> PipelineResult<Box<dyn SalesModel>> {
        match self.model {
            SavedModel::Mean { mean } => Ok(Box::new(MeanModel { mean })),
            SavedModel::Ridge {
                lambda,
                intercept,
                weights,
                feature_means,
                feature_stds,
            } => {
                if weights.len() != self.feature_names.len()
                    || feature_means.len() != weights.len()
                    || feature_stds.len() != weights.len()
                {
                    return Err(PipelineError::Serialization(format!(
                        "ridge parameter lengths disagree with {} feature names",
                        self.feature_names.len()
                    )));
                }
                Ok(Box::new(RidgeModel {
                    lambda,
                    intercept,
                    weights,
                    feature_means,
                    feature_stds,
                }))
            }
        }
    }
}

/// Save a model file as pretty JSON.
pub fn save(file: &ModelFile, path: &Path) -> PipelineResult<()> {
    let json = serde_json::to_string_pretty(file)
        .map_err(|e| PipelineError::Serialization(e.to_string()))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| PipelineError::Serialization(e.to_string()))?;
    }
    std::fs::write(path, json).map_err(|e| PipelineError::Serialization(e.to_string()))
}

/// Load a model file, validating format version and schema.
pub fn load(path: &Path) -> PipelineResult<ModelFile> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        PipelineError::Serialization(format!("cannot read {}: {}", path.display(), e))
    })?;
    let file: ModelFile = serde_json::from_str(&content)
        .map_err(|e| PipelineError::Serialization(e.to_string()))?;
    if file.format_version != FORMAT_VERSION {
        return Err(PipelineError::Serialization(format!(
            "unsupported model format version {} (expected {})",
            file.format_version, FORMAT_VERSION
        )));
    }
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engineered(customers: i64) -> EngineeredRow {
        EngineeredRow {
            store_code: 0,
            day_of_week: 1,
            customers,
            open: 1,
            promo: 0,
            state_holiday_code: 0,
            school_holiday: 0,
            rows_sharing_date: 1,
            customers_sharing_date: customers,
            month: 1,
            day: 1,
            year: 2015,
            customers_per_store_month: customers,
            rows_per_store_month: 1,
        }
    }

    #[test]
    fn test_mean_model_predicts_constant() {
        let model = MeanModel { mean: 42.5 };
        let preds = model.predict(&[engineered(1), engineered(2)]).unwrap();
        assert_eq!(preds, vec![42.5, 42.5]);
    }

    #[test]
    fn test_ridge_ignores_constant_features() {
        let n = FEATURE_NAMES.len();
        let model = RidgeModel {
            lambda: 1.0,
            intercept: 10.0,
            weights: vec![1.0; n],
            feature_means: vec![0.0; n],
            feature_stds: vec![0.0; n],
        };
        // All stds are zero, so only the intercept remains.
        let preds = model.predict(&[engineered(500)]).unwrap();
        assert_eq!(preds, vec![10.0]);
    }

    #[test]
    fn test_model_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model/storecast.json");
        let n = FEATURE_NAMES.len();
        let file = ModelFile::new(
            SavedModel::Ridge {
                lambda: 0.5,
                intercept: 3.0,
                weights: vec![0.25; n],
                feature_means: vec![1.0; n],
                feature_stds: vec![2.0; n],
            },
            "Sales",
        );
        save(&file, &path).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, file);
        let model = loaded.into_model().unwrap();
        assert_eq!(model.algorithm(), "ridge");
    }

    #[test]
    fn test_saved_json_declares_algorithm() {
        let file = ModelFile::new(SavedModel::Mean { mean: 1.0 }, "Sales");
        let json = serde_json::to_string(&file).unwrap();
        assert!(json.contains("\"algorithm\":\"mean\""));
        assert!(json.contains("\"format_version\":1"));
    }

    #[test]
    fn test_unknown_algorithm_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"format_version":1,"target":"Sales","feature_names":[],"model":{"algorithm":"gbm"}}"#,
        )
        .unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(err, PipelineError::Serialization(_)));
    }

    #[test]
    fn test_wrong_format_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("v9.json");
        std::fs::write(
            &path,
            r#"{"format_version":9,"target":"Sales","feature_names":[],"model":{"algorithm":"mean","mean":1.0}}"#,
        )
        .unwrap();
        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("format version"));
    }

    #[test]
    fn test_mismatched_parameter_lengths_rejected() {
        let file = ModelFile {
            format_version: FORMAT_VERSION,
            target: "Sales".to_string(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            model: SavedModel::Ridge {
                lambda: 1.0,
                intercept: 0.0,
                weights: vec![1.0; 3],
                feature_means: vec![0.0; 3],
                feature_stds: vec![1.0; 3],
            },
        };
        assert!(file.into_model().is_err());
    }
}
