//! Model training: split, grid search over the ridge penalty, fit, save.
//!
//! The trainer is a collaborator of the serving pipeline, not part of its
//! core contract: it consumes engineered features plus the `Sales` target
//! and produces anything satisfying [`crate::model::SalesModel`]. The search
//! here is deliberately small, an exhaustive sweep of the configured ridge
//! penalties, scored by holdout RMSE against a mean baseline.

use anyhow::{bail, Context, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::Config;
use crate::dataset;
use crate::model::{self, MeanModel, ModelFile, RidgeModel, SalesModel, SavedModel};
use crate::models::{EngineeredRow, SalesRecord, FEATURE_NAMES};
use crate::transform::transform;

/// Target column name recorded in the model file.
pub const TARGET_NAME: &str = "Sales";

/// One grid candidate with its holdout score.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub lambda: f64,
    pub rmse: f64,
}

/// Outcome of a training run.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub rows_used: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub candidates: Vec<Candidate>,
    pub best_lambda: f64,
    pub best_rmse: f64,
    pub baseline_rmse: f64,
}

/// Shuffle-split row indices into train and test sets.
///
/// The split is seeded so a training run is reproducible end to end.
pub fn train_test_split(
    n_rows: usize,
    test_fraction: f64,
    seed: u64,
) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_size = (n_rows as f64 * test_fraction).round() as usize;
    let test = indices[..test_size].to_vec();
    let train = indices[test_size..].to_vec();
    (train, test)
}

/// Fit a ridge regressor on standardized features via the normal equations.
pub fn fit_ridge(rows: &[EngineeredRow], targets: &[f64], lambda: f64) -> Result<RidgeModel> {
    if rows.is_empty() {
        bail!("cannot fit on an empty training set");
    }
    if rows.len() != targets.len() {
        bail!(
            "feature/target count mismatch: {} vs {}",
            rows.len(),
            targets.len()
        );
    }
    if lambda <= 0.0 {
        bail!("ridge penalty must be > 0, got {lambda}");
    }

    let n = rows.len();
    let d = FEATURE_NAMES.len();
    let raw: Vec<Vec<f64>> = rows.iter().map(|r| r.to_features()).collect();

    // Standardize each column; constant columns keep std 0 and are zeroed.
    let mut means = vec![0.0; d];
    let mut stds = vec![0.0; d];
    for j in 0..d {
        let sum: f64 = raw.iter().map(|x| x[j]).sum();
        means[j] = sum / n as f64;
        let var: f64 = raw.iter().map(|x| (x[j] - means[j]).powi(2)).sum::<f64>() / n as f64;
        stds[j] = var.sqrt();
    }
    let standardized: Vec<Vec<f64>> = raw
        .iter()
        .map(|x| {
            (0..d)
                .map(|j| {
                    if stds[j] > 0.0 {
                        (x[j] - means[j]) / stds[j]
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect();

    // Centering the target lets the intercept be the target mean.
    let y_mean: f64 = targets.iter().sum::<f64>() / n as f64;

    // Normal equations: (Z^T Z + lambda I) w = Z^T (y - y_mean).
    let mut gram = vec![vec![0.0; d]; d];
    let mut moment = vec![0.0; d];
    for (z, y) in standardized.iter().zip(targets.iter()) {
        for j in 0..d {
            moment[j] += z[j] * (y - y_mean);
            for k in j..d {
                gram[j][k] += z[j] * z[k];
            }
        }
    }
    for j in 0..d {
        for k in 0..j {
            gram[j][k] = gram[k][j];
        }
        gram[j][j] += lambda;
    }

    let weights = solve(gram, moment).context("normal equations are singular")?;

    Ok(RidgeModel {
        lambda,
        intercept: y_mean,
        weights,
        feature_means: means,
        feature_stds: stds,
    })
}

/// Solve `a * x = b` by Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| {
            a[i][col]
                .abs()
                .partial_cmp(&a[j][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut acc = b[row];
        for k in (row + 1)..n {
            acc -= a[row][k] * x[k];
        }
        x[row] = acc / a[row][row];
    }
    Some(x)
}

/// Root mean squared error of predictions against targets.
pub fn rmse(predictions: &[f64], targets: &[f64]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let sum: f64 = predictions
        .iter()
        .zip(targets.iter())
        .map(|(p, t)| (p - t).powi(2))
        .sum();
    (sum / predictions.len() as f64).sqrt()
}

/// Search the ridge grid and return the best model with its report.
pub fn grid_search(
    engineered: &[EngineeredRow],
    targets: &[f64],
    lambda_grid: &[f64],
    test_fraction: f64,
    seed: u64,
) -> Result<(RidgeModel, TrainReport)> {
    let (train_idx, test_idx) = train_test_split(engineered.len(), test_fraction, seed);
    if train_idx.is_empty() || test_idx.is_empty() {
        bail!(
            "split produced an empty set ({} train / {} test rows); need more data",
            train_idx.len(),
            test_idx.len()
        );
    }

    let take = |idx: &[usize]| -> (Vec<EngineeredRow>, Vec<f64>) {
        (
            idx.iter().map(|&i| engineered[i].clone()).collect(),
            idx.iter().map(|&i| targets[i]).collect(),
        )
    };
    let (x_train, y_train) = take(&train_idx);
    let (x_test, y_test) = take(&test_idx);

    let baseline = MeanModel {
        mean: y_train.iter().sum::<f64>() / y_train.len() as f64,
    };
    let baseline_rmse = rmse(&baseline.predict(&x_test)?, &y_test);

    let mut candidates = Vec::with_capacity(lambda_grid.len());
    let mut best: Option<(RidgeModel, f64)> = None;
    for &lambda in lambda_grid {
        let model = fit_ridge(&x_train, &y_train, lambda)?;
        let score = rmse(&model.predict(&x_test)?, &y_test);
        candidates.push(Candidate {
            lambda,
            rmse: score,
        });
        if best.as_ref().map_or(true, |(_, s)| score < *s) {
            best = Some((model, score));
        }
    }
    let (best_model, best_rmse) = best.expect("lambda grid validated non-empty");

    let report = TrainReport {
        rows_used: engineered.len(),
        train_rows: train_idx.len(),
        test_rows: test_idx.len(),
        candidates,
        best_lambda: best_model.lambda,
        best_rmse,
        baseline_rmse,
    };
    Ok((best_model, report))
}

/// Extract targets, failing on any unlabeled row.
fn targets_of(rows: &[SalesRecord]) -> Result<Vec<f64>> {
    rows.iter()
        .enumerate()
        .map(|(i, r)| {
            r.sales
                .with_context(|| format!("row {i} has no Sales value; training data must be labeled"))
        })
        .collect()
}

/// Run the `train` command: load, transform, search, save.
pub fn run_train(config: &Config, limit: Option<usize>) -> Result<()> {
    let max_rows = limit.or(config.data.max_rows);
    let records = dataset::load_records(&config.data.train_path, max_rows)?;
    if records.is_empty() {
        bail!(
            "no training rows in {}",
            config.data.train_path.display()
        );
    }

    let targets = targets_of(&records)?;
    let engineered = transform(&records)?;

    let (best_model, report) = grid_search(
        &engineered,
        &targets,
        &config.training.lambda_grid,
        config.training.test_fraction,
        config.training.seed,
    )?;

    let file = ModelFile::new(
        SavedModel::Ridge {
            lambda: best_model.lambda,
            intercept: best_model.intercept,
            weights: best_model.weights.clone(),
            feature_means: best_model.feature_means.clone(),
            feature_stds: best_model.feature_stds.clone(),
        },
        TARGET_NAME,
    );
    model::save(&file, &config.training.model_path)?;

    println!("train");
    println!("  rows used: {}", report.rows_used);
    println!(
        "  split: {} train / {} test",
        report.train_rows, report.test_rows
    );
    for c in &report.candidates {
        println!("  lambda {:>8.3}  rmse {:.3}", c.lambda, c.rmse);
    }
    println!("  baseline (mean) rmse {:.3}", report.baseline_rmse);
    println!(
        "  best: lambda {:.3}, rmse {:.3}",
        report.best_lambda, report.best_rmse
    );
    println!("  model written to {}", config.training.model_path.display());
    println!("ok");

    Ok(())
}
