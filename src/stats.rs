//! Column summary statistics over a record batch.
//!
//! Powers the data-detail view: per-column count, mean, standard deviation,
//! min, and max for the numeric columns, so a user can eyeball a dataset
//! before predicting against it.

use anyhow::Result;
use serde::Serialize;

use crate::config::Config;
use crate::dataset;
use crate::models::SalesRecord;
use crate::view::DataDetailView;

/// Summary of one numeric column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Summarize the numeric columns of a batch, in a fixed column order.
///
/// The `Sales` column appears only when at least one row carries a value.
pub fn describe(rows: &[SalesRecord]) -> Vec<ColumnSummary> {
    let mut summaries = vec![
        summarize("Store", rows.iter().map(|r| r.store as f64).collect()),
        summarize(
            "DayOfWeek",
            rows.iter().map(|r| r.day_of_week as f64).collect(),
        ),
        summarize(
            "Customers",
            rows.iter().map(|r| r.customers as f64).collect(),
        ),
        summarize("Open", rows.iter().map(|r| r.open as f64).collect()),
        summarize("Promo", rows.iter().map(|r| r.promo as f64).collect()),
        summarize(
            "SchoolHoliday",
            rows.iter().map(|r| r.school_holiday as f64).collect(),
        ),
    ];

    let sales: Vec<f64> = rows.iter().filter_map(|r| r.sales).collect();
    if !sales.is_empty() {
        summaries.push(summarize("Sales", sales));
    }

    summaries
}

fn summarize(column: &str, values: Vec<f64>) -> ColumnSummary {
    let count = values.len();
    if count == 0 {
        return ColumnSummary {
            column: column.to_string(),
            count: 0,
            mean: 0.0,
            std: 0.0,
            min: 0.0,
            max: 0.0,
        };
    }

    let mean = values.iter().sum::<f64>() / count as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    ColumnSummary {
        column: column.to_string(),
        count,
        mean,
        std: var.sqrt(),
        min,
        max,
    }
}

/// Run the `describe` command: print the data-detail view of the serving
/// dataset (or the whole file with `--all`).
pub fn run_describe(config: &Config, head: Option<usize>, all: bool) -> Result<()> {
    let rows = dataset::load_records(&config.data.serve_path, config.data.max_rows)?;
    let head_rows = if all {
        rows.len()
    } else {
        head.unwrap_or(config.predict.head_rows)
    };
    let view = DataDetailView::new(&rows, head_rows, describe(&rows));
    print!("{}", view.render());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(store: i64, customers: i64, sales: Option<f64>) -> SalesRecord {
        SalesRecord {
            store,
            day_of_week: 1,
            date: "2015-01-01".to_string(),
            customers,
            open: 1,
            promo: 0,
            state_holiday: "0".to_string(),
            school_holiday: 0,
            sales,
        }
    }

    #[test]
    fn test_describe_basic_stats() {
        let rows = vec![record(1, 10, None), record(2, 20, None), record(3, 30, None)];
        let summaries = describe(&rows);
        let customers = summaries.iter().find(|s| s.column == "Customers").unwrap();
        assert_eq!(customers.count, 3);
        assert_eq!(customers.mean, 20.0);
        assert_eq!(customers.min, 10.0);
        assert_eq!(customers.max, 30.0);
        assert!((customers.std - (200.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_sales_column_omitted_when_unlabeled() {
        let rows = vec![record(1, 10, None)];
        assert!(describe(&rows).iter().all(|s| s.column != "Sales"));

        let rows = vec![record(1, 10, Some(100.0)), record(2, 20, None)];
        let summaries = describe(&rows);
        let sales = summaries.iter().find(|s| s.column == "Sales").unwrap();
        assert_eq!(sales.count, 1);
        assert_eq!(sales.mean, 100.0);
    }

    #[test]
    fn test_empty_batch() {
        let summaries = describe(&[]);
        assert!(summaries.iter().all(|s| s.count == 0));
        assert!(summaries.iter().all(|s| s.column != "Sales"));
    }
}
