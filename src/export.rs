//! Export a saved model as a self-describing deployment artifact.
//!
//! Produces a JSON document bundling the model's algorithm identity and
//! fitted parameters with human-readable metadata: author, license,
//! description, a per-input description, and an output description. A
//! downstream converter (e.g. a mobile ML toolchain) consumes this artifact;
//! the conversion itself is out of scope here.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::config::Config;
use crate::model::{self, SavedModel};
use crate::train::TARGET_NAME;

/// The exported artifact, written as pretty JSON.
#[derive(Debug, Serialize)]
pub struct ExportedArtifact {
    pub format: &'static str,
    pub format_version: u32,
    pub author: String,
    pub license: String,
    pub description: String,
    pub target: String,
    pub feature_names: Vec<String>,
    pub input_description: BTreeMap<String, String>,
    pub output_description: String,
    pub model: SavedModel,
}

/// Human-readable description for each engineered input.
fn describe_input(name: &str) -> String {
    match name {
        "store_code" => "Store ID (batch-local category code)",
        "day_of_week" => "Day of the sale",
        "customers" => "Number of customers in the store",
        "open" => "Store open flag",
        "promo" => "Promo applies that date",
        "state_holiday_code" => "State holiday (batch-local category code)",
        "school_holiday" => "School holiday flag",
        "rows_sharing_date" => "Rows sharing the sale date in the batch",
        "customers_sharing_date" => "Total customers across the sale date",
        "month" => "Month of the sale",
        "day" => "Day of month of the sale",
        "year" => "Year of the sale",
        "customers_per_store_month" => "Customers for this store and month",
        "rows_per_store_month" => "Rows for this store and month",
        other => other,
    }
    .to_string()
}

/// Build the artifact from a saved model file plus config metadata.
pub fn build_artifact(config: &Config, file: model::ModelFile) -> ExportedArtifact {
    let input_description = file
        .feature_names
        .iter()
        .map(|name| (name.clone(), describe_input(name)))
        .collect();

    ExportedArtifact {
        format: "storecast-export",
        format_version: file.format_version,
        author: config.export.author.clone(),
        license: config.export.license.clone(),
        description: config.export.description.clone(),
        target: file.target.clone(),
        feature_names: file.feature_names.clone(),
        input_description,
        output_description: "Predicted sales amount".to_string(),
        model: file.model,
    }
}

/// Run the `export` command.
///
/// If `output` is `Some`, writes the artifact to that file path. Otherwise
/// writes to stdout for piping.
pub fn run_export(config: &Config, output: Option<&Path>) -> Result<()> {
    let file = model::load(&config.training.model_path)?;
    let algorithm = match &file.model {
        SavedModel::Mean { .. } => "mean",
        SavedModel::Ridge { .. } => "ridge",
    };
    let feature_count = file.feature_names.len();

    let artifact = build_artifact(config, file);
    let json = serde_json::to_string_pretty(&artifact)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &json)?;
            eprintln!(
                "Exported {} model ({} inputs, target {}) to {}",
                algorithm,
                feature_count,
                TARGET_NAME,
                path.display()
            );
        }
        None => {
            println!("{}", json);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelFile;

    fn test_config() -> Config {
        let toml = r#"
[data]
train_path = "train.csv"
serve_path = "test.csv"

[export]
author = "acme"
license = "BSD"
description = "store sales model"
"#;
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn test_artifact_carries_metadata_and_schema() {
        let config = test_config();
        let file = ModelFile::new(SavedModel::Mean { mean: 12.0 }, TARGET_NAME);
        let artifact = build_artifact(&config, file);

        assert_eq!(artifact.author, "acme");
        assert_eq!(artifact.license, "BSD");
        assert_eq!(artifact.target, "Sales");
        assert_eq!(
            artifact.input_description.len(),
            artifact.feature_names.len()
        );
        assert_eq!(
            artifact.input_description["customers"],
            "Number of customers in the store"
        );

        let json = serde_json::to_string(&artifact).unwrap();
        assert!(json.contains("\"algorithm\":\"mean\""));
        assert!(json.contains("\"output_description\":\"Predicted sales amount\""));
    }
}
