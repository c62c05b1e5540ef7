//! Bounded-size row selection for serving.
//!
//! Reduces a large record batch to at most `target_count` rows before
//! prediction, either by deterministic thinning (evenly spaced drop indices
//! between `target_count` and the last index) or by uniform random drops
//! without replacement. Retained rows keep their original relative order.

use rand::rngs::StdRng;
use rand::{seq::index, thread_rng, Rng, SeedableRng};

use crate::error::{PipelineError, PipelineResult};
use crate::models::SalesRecord;

/// Reduce `rows` to at most `target_count` entries.
///
/// With `random == false` the drop indices are evenly spaced over
/// `[target_count, len - 1]`; with `random == true` they are drawn uniformly
/// without replacement from `[0, len - 1)`; the final row is never dropped
/// at random. Batches already within the bound are returned unchanged.
///
/// Fails with [`PipelineError::InvalidParameter`] when `target_count == 0`.
pub fn sample(
    rows: &[SalesRecord],
    target_count: usize,
    random: bool,
) -> PipelineResult<Vec<SalesRecord>> {
    sample_with_rng(rows, target_count, random, &mut thread_rng())
}

/// [`sample`] with a caller-supplied RNG, used to pin down random selection
/// in tests (seeded [`StdRng`]).
pub fn sample_with_rng<R: Rng>(
    rows: &[SalesRecord],
    target_count: usize,
    random: bool,
    rng: &mut R,
) -> PipelineResult<Vec<SalesRecord>> {
    if target_count == 0 {
        return Err(PipelineError::invalid("target_count", "must be >= 1"));
    }

    let total = rows.len();
    if total <= target_count {
        return Ok(rows.to_vec());
    }

    let drop_count = total - target_count;
    let mut dropped = vec![false; total];

    if random {
        // Without replacement from [0, total - 1): the last row survives.
        for idx in index::sample(rng, total - 1, drop_count) {
            dropped[idx] = true;
        }
    } else {
        for idx in evenly_spaced(target_count, total - 1, drop_count) {
            dropped[idx] = true;
        }
    }

    Ok(rows
        .iter()
        .zip(dropped.iter())
        .filter(|(_, drop)| !**drop)
        .map(|(row, _)| row.clone())
        .collect())
}

/// `count` integer indices evenly spaced over `[start, stop]` inclusive,
/// truncated toward zero.
fn evenly_spaced(start: usize, stop: usize, count: usize) -> Vec<usize> {
    if count == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![start];
    }
    let step = (stop - start) as f64 / (count - 1) as f64;
    (0..count)
        .map(|k| (start as f64 + step * k as f64) as usize)
        .collect()
}

/// Deterministic seeded RNG for reproducible random sampling.
#[allow(dead_code)]
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<SalesRecord> {
        (0..n)
            .map(|i| SalesRecord {
                store: i as i64,
                day_of_week: 1,
                date: "2015-01-01".to_string(),
                customers: 10,
                open: 1,
                promo: 0,
                state_holiday: "0".to_string(),
                school_holiday: 0,
                sales: None,
            })
            .collect()
    }

    #[test]
    fn test_zero_target_rejected() {
        let err = sample(&records(5), 0, false).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidParameter { .. }));
    }

    #[test]
    fn test_small_batch_unchanged() {
        let rows = records(3);
        let out = sample(&rows, 10, false).unwrap();
        assert_eq!(out.len(), 3);
        let stores: Vec<i64> = out.iter().map(|r| r.store).collect();
        assert_eq!(stores, vec![0, 1, 2]);
    }

    #[test]
    fn test_deterministic_thinning_drops_the_tail() {
        // drop_count equals the size of [target, len-1], so the evenly
        // spaced indices cover the whole tail.
        let rows = records(10);
        let out = sample(&rows, 4, false).unwrap();
        let stores: Vec<i64> = out.iter().map(|r| r.store).collect();
        assert_eq!(stores, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_size_bound_holds_for_all_targets() {
        let rows = records(20);
        for target in 1..=25 {
            for random in [false, true] {
                let mut rng = seeded_rng(7);
                let out = sample_with_rng(&rows, target, random, &mut rng).unwrap();
                assert_eq!(out.len(), target.min(rows.len()), "target={target}");
            }
        }
    }

    #[test]
    fn test_random_preserves_relative_order() {
        let rows = records(50);
        let mut rng = seeded_rng(42);
        let out = sample_with_rng(&rows, 20, true, &mut rng).unwrap();
        let stores: Vec<i64> = out.iter().map(|r| r.store).collect();
        let mut sorted = stores.clone();
        sorted.sort_unstable();
        assert_eq!(stores, sorted);
    }

    #[test]
    fn test_random_never_drops_last_row() {
        let rows = records(12);
        for seed in 0..20 {
            let mut rng = seeded_rng(seed);
            let out = sample_with_rng(&rows, 2, true, &mut rng).unwrap();
            assert_eq!(out.last().unwrap().store, 11);
        }
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let rows = records(30);
        let a = sample_with_rng(&rows, 10, true, &mut seeded_rng(99)).unwrap();
        let b = sample_with_rng(&rows, 10, true, &mut seeded_rng(99)).unwrap();
        let stores_a: Vec<i64> = a.iter().map(|r| r.store).collect();
        let stores_b: Vec<i64> = b.iter().map(|r| r.store).collect();
        assert_eq!(stores_a, stores_b);
    }

    #[test]
    fn test_evenly_spaced_endpoints() {
        assert_eq!(evenly_spaced(4, 9, 6), vec![4, 5, 6, 7, 8, 9]);
        assert_eq!(evenly_spaced(5, 5, 1), vec![5]);
        assert!(evenly_spaced(0, 9, 0).is_empty());
    }
}
