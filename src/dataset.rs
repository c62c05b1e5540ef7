//! CSV loading and writing for sales records.

use std::path::Path;

use anyhow::{Context, Result};

use crate::models::SalesRecord;

/// Load sales records from a CSV file, optionally capped at `max_rows`.
///
/// The cap mirrors the training pipeline's habit of working on a bounded
/// slice of the full dataset; rows past the cap are never read.
pub fn load_records(path: &Path, max_rows: Option<usize>) -> Result<Vec<SalesRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open CSV file: {}", path.display()))?;

    let cap = max_rows.unwrap_or(usize::MAX);
    let mut records = Vec::new();
    for result in reader.deserialize() {
        if records.len() >= cap {
            break;
        }
        let record: SalesRecord =
            result.with_context(|| format!("malformed row in {}", path.display()))?;
        records.push(record);
    }

    Ok(records)
}

/// Write records alongside their predicted sales as CSV.
///
/// Row `i` of `predictions` fills the `Sales` column of row `i` of `rows`;
/// the two must be the same length.
pub fn write_predictions(
    path: &Path,
    rows: &[SalesRecord],
    predictions: &[f64],
) -> Result<()> {
    anyhow::ensure!(
        rows.len() == predictions.len(),
        "row/prediction count mismatch: {} vs {}",
        rows.len(),
        predictions.len()
    );

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create CSV file: {}", path.display()))?;
    for (row, pred) in rows.iter().zip(predictions.iter()) {
        let mut out = row.clone();
        out.sales = Some(*pred);
        writer.serialize(&out)?;
    }
    writer.flush()?;

    Ok(())
}
