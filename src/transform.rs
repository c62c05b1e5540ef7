//! Feature engineering over a batch of sales records.
//!
//! [`transform`] is a pure function of its input batch: per-date aggregates,
//! date part extraction, per-(store, month, year) aggregates, and batch-local
//! category codes, producing [`EngineeredRow`]s in the fixed feature order
//! documented in [`crate::models::FEATURE_NAMES`]. The raw date text is
//! consumed during the transform and does not appear in the output.
//!
//! Aggregates are batch-relative statistics: `rows_sharing_date` counts rows
//! within the batch passed in, not globally. Category codes are assigned by
//! ascending sort of the distinct values observed in the batch, zero-indexed;
//! codes are therefore deterministic within a call but not stable across
//! calls over different batches. That limitation is inherited from the
//! trained model's own preprocessing and must not be fixed here unilaterally,
//! or serving inputs would stop matching what the model saw at fit time.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};

use crate::error::{PipelineError, PipelineResult};
use crate::models::{EngineeredRow, SalesRecord};

/// Date formats tried in order. Year-first forms take priority.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y"];

/// Stateless feature transformer.
///
/// `fit` is a no-op today: every statistic the transform needs is computed
/// from the batch being transformed. The method exists so that train-time
/// statistics (e.g. a fitted category vocabulary) can be added later without
/// changing call sites.
#[derive(Debug, Default, Clone, Copy)]
#[allow(dead_code)]
pub struct FeatureTransform;

#[allow(dead_code)]
impl FeatureTransform {
    pub fn new() -> Self {
        Self
    }

    /// Reserved extension point; stores no state today.
    pub fn fit(&mut self, _rows: &[SalesRecord]) {}

    /// See the free function [`transform`].
    pub fn transform(&self, rows: &[SalesRecord]) -> PipelineResult<Vec<EngineeredRow>> {
        transform(rows)
    }
}

/// Derive engineered features for a batch of records.
///
/// Fails with [`PipelineError::MalformedInput`] on the first record whose
/// date cannot be parsed; no partial output is produced.
pub fn transform(rows: &[SalesRecord]) -> PipelineResult<Vec<EngineeredRow>> {
    let dates = rows
        .iter()
        .map(|r| parse_date(&r.date))
        .collect::<PipelineResult<Vec<NaiveDate>>>()?;

    // Per-date aggregates: row count and customer sum.
    let mut by_date: HashMap<NaiveDate, (i64, i64)> = HashMap::new();
    for (row, date) in rows.iter().zip(dates.iter()) {
        let entry = by_date.entry(*date).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += row.customers;
    }

    // Per-(store, month, year) aggregates.
    let mut by_store_month: HashMap<(i64, u32, i32), (i64, i64)> = HashMap::new();
    for (row, date) in rows.iter().zip(dates.iter()) {
        let key = (row.store, date.month(), date.year());
        let entry = by_store_month.entry(key).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += row.customers;
    }

    let store_codes = category_codes(rows.iter().map(|r| r.store));
    let holiday_codes = category_codes(rows.iter().map(|r| r.state_holiday.clone()));

    let engineered = rows
        .iter()
        .zip(dates.iter())
        .map(|(row, date)| {
            let (date_rows, date_customers) = by_date[date];
            let (month_rows, month_customers) =
                by_store_month[&(row.store, date.month(), date.year())];
            EngineeredRow {
                store_code: store_codes[&row.store],
                day_of_week: row.day_of_week,
                customers: row.customers,
                open: row.open,
                promo: row.promo,
                state_holiday_code: holiday_codes[&row.state_holiday],
                school_holiday: row.school_holiday,
                rows_sharing_date: date_rows,
                customers_sharing_date: date_customers,
                month: date.month() as i64,
                day: date.day() as i64,
                year: date.year() as i64,
                customers_per_store_month: month_customers,
                rows_per_store_month: month_rows,
            }
        })
        .collect();

    Ok(engineered)
}

/// Parse a date from text, trying year-first formats before day-first ones.
fn parse_date(text: &str) -> PipelineResult<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PipelineError::malformed("Date", text));
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }
    Err(PipelineError::malformed("Date", text))
}

/// Assign zero-indexed codes to distinct values by ascending sort order.
fn category_codes<T: Ord>(values: impl Iterator<Item = T>) -> BTreeMap<T, i64> {
    let distinct: BTreeMap<T, i64> = values.map(|v| (v, 0)).collect();
    distinct
        .into_iter()
        .enumerate()
        .map(|(code, (value, _))| (value, code as i64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(store: i64, date: &str, customers: i64, holiday: &str) -> SalesRecord {
        SalesRecord {
            store,
            day_of_week: 3,
            date: date.to_string(),
            customers,
            open: 1,
            promo: 0,
            state_holiday: holiday.to_string(),
            school_holiday: 0,
            sales: None,
        }
    }

    #[test]
    fn test_date_aggregates_shared_across_rows() {
        let rows = vec![
            record(1, "2015-01-01", 10, "0"),
            record(2, "2015-01-01", 20, "0"),
        ];
        let out = transform(&rows).unwrap();
        assert_eq!(out.len(), 2);
        for row in &out {
            assert_eq!(row.rows_sharing_date, 2);
            assert_eq!(row.customers_sharing_date, 30);
        }
    }

    #[test]
    fn test_store_month_aggregates() {
        let rows = vec![
            record(1, "2015-01-01", 10, "0"),
            record(1, "2015-01-15", 5, "0"),
            record(1, "2015-02-01", 7, "0"),
            record(2, "2015-01-01", 100, "0"),
        ];
        let out = transform(&rows).unwrap();
        // Store 1, January: two rows, 15 customers.
        assert_eq!(out[0].rows_per_store_month, 2);
        assert_eq!(out[0].customers_per_store_month, 15);
        assert_eq!(out[1].rows_per_store_month, 2);
        // Store 1, February: one row.
        assert_eq!(out[2].rows_per_store_month, 1);
        assert_eq!(out[2].customers_per_store_month, 7);
        // Store 2, January: one row.
        assert_eq!(out[3].customers_per_store_month, 100);
    }

    #[test]
    fn test_date_parts_extracted_and_date_dropped() {
        let rows = vec![record(1, "2015-07-31", 10, "0")];
        let out = transform(&rows).unwrap();
        assert_eq!(out[0].month, 7);
        assert_eq!(out[0].day, 31);
        assert_eq!(out[0].year, 2015);
        assert_eq!(out[0].to_features().len(), crate::models::FEATURE_NAMES.len());
    }

    #[test]
    fn test_category_codes_sorted_ascending() {
        let rows = vec![
            record(30, "2015-01-01", 1, "b"),
            record(10, "2015-01-02", 1, "0"),
            record(20, "2015-01-03", 1, "a"),
        ];
        let out = transform(&rows).unwrap();
        // Stores 10 < 20 < 30 get codes 0, 1, 2.
        assert_eq!(out[0].store_code, 2);
        assert_eq!(out[1].store_code, 0);
        assert_eq!(out[2].store_code, 1);
        // Holidays "0" < "a" < "b".
        assert_eq!(out[0].state_holiday_code, 2);
        assert_eq!(out[1].state_holiday_code, 0);
        assert_eq!(out[2].state_holiday_code, 1);
    }

    #[test]
    fn test_transform_is_deterministic() {
        let rows = vec![
            record(3, "2015-03-01", 12, "a"),
            record(1, "2015-03-01", 8, "0"),
            record(3, "2015-03-02", 4, "0"),
        ];
        let first = transform(&rows).unwrap();
        let second = transform(&rows).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_day_first_fallback() {
        let rows = vec![record(1, "31-07-2015", 10, "0")];
        let out = transform(&rows).unwrap();
        assert_eq!(out[0].year, 2015);
        assert_eq!(out[0].month, 7);
        assert_eq!(out[0].day, 31);
    }

    #[test]
    fn test_malformed_date_fails_with_no_output() {
        let rows = vec![
            record(1, "2015-01-01", 10, "0"),
            record(2, "not-a-date", 20, "0"),
        ];
        let err = transform(&rows).unwrap_err();
        match err {
            PipelineError::MalformedInput { field, value } => {
                assert_eq!(field, "Date");
                assert_eq!(value, "not-a-date");
            }
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_batch() {
        let out = transform(&[]).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_fit_is_a_noop() {
        let mut ft = FeatureTransform::new();
        let rows = vec![record(1, "2015-01-01", 10, "0")];
        ft.fit(&rows);
        let out = ft.transform(&rows).unwrap();
        assert_eq!(out.len(), 1);
    }
}
