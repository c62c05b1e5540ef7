//! Presentation view-models and text rendering.
//!
//! The dashboard surface is deliberately thin: each view is an explicit
//! value built from pipeline outputs, and rendering is a pure function from
//! view to text (or JSON for the chart subset). One view is built per user
//! interaction; no rendering state lives at module level.

use serde::Serialize;

use crate::models::SalesRecord;
use crate::stats::ColumnSummary;

/// Fixed column subset feeding the scatter-matrix chart.
#[allow(dead_code)]
pub const CHART_COLUMNS: [&str; 4] = ["DayOfWeek", "Customers", "Sales", "Promo"];

/// Data-detail view: header rows plus per-column summaries.
#[derive(Debug, Clone)]
pub struct DataDetailView {
    pub total_rows: usize,
    pub head: Vec<SalesRecord>,
    pub summary: Vec<ColumnSummary>,
}

impl DataDetailView {
    /// Build the view from a full batch, keeping the first `head_rows` rows.
    pub fn new(rows: &[SalesRecord], head_rows: usize, summary: Vec<ColumnSummary>) -> Self {
        Self {
            total_rows: rows.len(),
            head: rows.iter().take(head_rows).cloned().collect(),
            summary,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "sales data detail ({} rows, showing {})\n",
            self.total_rows,
            self.head.len()
        ));
        out.push_str(&format!(
            "{:<8} {:<10} {:<12} {:<10} {:<6} {:<6} {:<14} {:<14}\n",
            "STORE", "DAYOFWEEK", "DATE", "CUSTOMERS", "OPEN", "PROMO", "STATEHOLIDAY",
            "SCHOOLHOLIDAY"
        ));
        for row in &self.head {
            out.push_str(&format!(
                "{:<8} {:<10} {:<12} {:<10} {:<6} {:<6} {:<14} {:<14}\n",
                row.store,
                row.day_of_week,
                row.date,
                row.customers,
                row.open,
                row.promo,
                row.state_holiday,
                row.school_holiday
            ));
        }
        out.push('\n');
        out.push_str(&format!(
            "{:<14} {:>8} {:>12} {:>12} {:>12} {:>12}\n",
            "COLUMN", "COUNT", "MEAN", "STD", "MIN", "MAX"
        ));
        for s in &self.summary {
            out.push_str(&format!(
                "{:<14} {:>8} {:>12.2} {:>12.2} {:>12.2} {:>12.2}\n",
                s.column, s.count, s.mean, s.std, s.min, s.max
            ));
        }
        out
    }
}

/// Prediction view: the selected rows with predicted sales and an
/// above/below-average marker per row.
#[derive(Debug, Clone)]
pub struct PredictionView {
    pub rows: Vec<SalesRecord>,
    pub predictions: Vec<f64>,
    /// Mean of the predictions; rows compare against this.
    pub mean_prediction: f64,
}

impl PredictionView {
    /// Build the view; `rows` and `predictions` must be the same length.
    pub fn new(rows: Vec<SalesRecord>, predictions: Vec<f64>) -> Self {
        let mean_prediction = if predictions.is_empty() {
            0.0
        } else {
            predictions.iter().sum::<f64>() / predictions.len() as f64
        };
        Self {
            rows,
            predictions,
            mean_prediction,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "sales prediction detail ({} rows, mean {:.2})\n",
            self.rows.len(),
            self.mean_prediction
        ));
        out.push_str(&format!(
            "{:<8} {:<10} {:<12} {:<10} {:<6} {:>12}  {}\n",
            "STORE", "DAYOFWEEK", "DATE", "CUSTOMERS", "PROMO", "SALES", "VS MEAN"
        ));
        for (row, pred) in self.rows.iter().zip(self.predictions.iter()) {
            let marker = if *pred > self.mean_prediction {
                "above"
            } else {
                "below"
            };
            out.push_str(&format!(
                "{:<8} {:<10} {:<12} {:<10} {:<6} {:>12.2}  {}\n",
                row.store, row.day_of_week, row.date, row.customers, row.promo, pred, marker
            ));
        }
        out
    }

    /// Chart points over the fixed column subset, in row order.
    pub fn chart_points(&self) -> Vec<ChartPoint> {
        self.rows
            .iter()
            .zip(self.predictions.iter())
            .map(|(row, pred)| ChartPoint {
                day_of_week: row.day_of_week,
                customers: row.customers,
                sales: *pred,
                promo: row.promo,
            })
            .collect()
    }
}

/// One point of the scatter-matrix data, serialized for external charting.
#[derive(Debug, Clone, Serialize)]
pub struct ChartPoint {
    pub day_of_week: i64,
    pub customers: i64,
    pub sales: f64,
    pub promo: i64,
}
