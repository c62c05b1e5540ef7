//! Chunked batch prediction.
//!
//! Splits an engineered batch into contiguous fixed-size chunks, invokes the
//! model once per chunk, and concatenates the per-chunk outputs in input row
//! order. The chunking exists purely to emit progress between otherwise
//! blocking model calls. It is a responsiveness mechanism, not concurrency.
//! A cooperative cancellation check between chunks would slot in here if it
//! is ever needed; none is performed today.

use crate::error::{PipelineError, PipelineResult};
use crate::model::SalesModel;
use crate::models::EngineeredRow;

/// Resolve the effective chunk size: the caller's value (validated >= 1) or
/// `ceil(total / 100)` clamped to at least 1, which yields roughly 100
/// progress updates for any input size.
pub fn effective_chunk_size(total: usize, chunk_size: Option<usize>) -> PipelineResult<usize> {
    match chunk_size {
        Some(0) => Err(PipelineError::invalid("chunk_size", "must be >= 1")),
        Some(n) => Ok(n),
        None => Ok((total.div_ceil(100)).max(1)),
    }
}

/// Predict one value per row, reporting progress after every chunk.
///
/// `on_progress` receives `(rows_processed_so_far, total_rows)` after each
/// model invocation; the final call reports exactly `(total, total)`.
///
/// The call is atomic: if the model fails on any chunk, or returns a number
/// of outputs different from the chunk length, the whole operation fails
/// with [`PipelineError::Prediction`] and no partial result is returned.
/// Retry is the caller's responsibility.
pub fn predict_batched<F>(
    rows: &[EngineeredRow],
    model: &dyn SalesModel,
    chunk_size: Option<usize>,
    mut on_progress: F,
) -> PipelineResult<Vec<f64>>
where
    F: FnMut(usize, usize),
{
    let total = rows.len();
    let chunk_size = effective_chunk_size(total, chunk_size)?;

    let mut predictions: Vec<f64> = Vec::with_capacity(total);
    for chunk in rows.chunks(chunk_size) {
        let mut output = model.predict(chunk)?;
        if output.len() != chunk.len() {
            return Err(PipelineError::Prediction(format!(
                "model returned {} values for a chunk of {} rows",
                output.len(),
                chunk.len()
            )));
        }
        predictions.append(&mut output);
        on_progress(predictions.len(), total);
    }

    Ok(predictions)
}
