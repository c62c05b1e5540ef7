//! Core data models used throughout Storecast.
//!
//! These types represent the sales records and engineered feature rows that
//! flow through the transform and prediction pipeline.

use serde::{Deserialize, Serialize};

/// One raw sales record as it appears in the source CSV.
///
/// Field names are serde-mapped to the original dataset headers
/// (`Store`, `DayOfWeek`, `Date`, ...). `sales` is present only in
/// labeled (training) data and deserializes as `None` when the column
/// is absent or empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesRecord {
    #[serde(rename = "Store")]
    pub store: i64,
    #[serde(rename = "DayOfWeek")]
    pub day_of_week: i64,
    /// Raw date text; parsed (year-first) during transform and consumed there.
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Customers")]
    pub customers: i64,
    #[serde(rename = "Open")]
    pub open: i64,
    #[serde(rename = "Promo")]
    pub promo: i64,
    #[serde(rename = "StateHoliday")]
    pub state_holiday: String,
    #[serde(rename = "SchoolHoliday")]
    pub school_holiday: i64,
    #[serde(rename = "Sales", default, skip_serializing_if = "Option::is_none")]
    pub sales: Option<f64>,
}

/// A sales record after feature engineering.
///
/// Carries the 14 numeric model inputs in the fixed order given by
/// [`FEATURE_NAMES`]. The raw date does not survive the transform;
/// only its derived parts (`month`, `day`, `year`) do. `store_code`
/// and `state_holiday_code` are batch-local category codes; the same
/// raw value always maps to the same code within one transform call,
/// but codes are not stable across calls over different batches.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineeredRow {
    pub store_code: i64,
    pub day_of_week: i64,
    pub customers: i64,
    pub open: i64,
    pub promo: i64,
    pub state_holiday_code: i64,
    pub school_holiday: i64,
    /// Count of rows sharing this row's date within the transformed batch.
    pub rows_sharing_date: i64,
    /// Sum of `customers` over rows sharing this row's date.
    pub customers_sharing_date: i64,
    pub month: i64,
    pub day: i64,
    pub year: i64,
    /// Sum of `customers` over rows with the same (store, month, year).
    pub customers_per_store_month: i64,
    /// Count of rows with the same (store, month, year).
    pub rows_per_store_month: i64,
}

/// Feature names in the exact order produced by [`EngineeredRow::to_features`].
pub const FEATURE_NAMES: [&str; 14] = [
    "store_code",
    "day_of_week",
    "customers",
    "open",
    "promo",
    "state_holiday_code",
    "school_holiday",
    "rows_sharing_date",
    "customers_sharing_date",
    "month",
    "day",
    "year",
    "customers_per_store_month",
    "rows_per_store_month",
];

impl EngineeredRow {
    /// Flatten into the model input vector, ordered as [`FEATURE_NAMES`].
    pub fn to_features(&self) -> Vec<f64> {
        vec![
            self.store_code as f64,
            self.day_of_week as f64,
            self.customers as f64,
            self.open as f64,
            self.promo as f64,
            self.state_holiday_code as f64,
            self.school_holiday as f64,
            self.rows_sharing_date as f64,
            self.customers_sharing_date as f64,
            self.month as f64,
            self.day as f64,
            self.year as f64,
            self.customers_per_store_month as f64,
            self.rows_per_store_month as f64,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_vector_matches_name_order() {
        let row = EngineeredRow {
            store_code: 1,
            day_of_week: 2,
            customers: 3,
            open: 4,
            promo: 5,
            state_holiday_code: 6,
            school_holiday: 7,
            rows_sharing_date: 8,
            customers_sharing_date: 9,
            month: 10,
            day: 11,
            year: 12,
            customers_per_store_month: 13,
            rows_per_store_month: 14,
        };
        let features = row.to_features();
        assert_eq!(features.len(), FEATURE_NAMES.len());
        // Values equal their 1-based position.
        for (i, v) in features.iter().enumerate() {
            assert_eq!(*v, (i + 1) as f64);
        }
    }

    #[test]
    fn test_sales_column_optional_in_csv() {
        let csv = "Store,DayOfWeek,Date,Customers,Open,Promo,StateHoliday,SchoolHoliday\n\
                   1,5,2015-07-31,555,1,1,0,1\n";
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let record: SalesRecord = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(record.store, 1);
        assert_eq!(record.sales, None);
    }

    #[test]
    fn test_sales_column_present_in_csv() {
        let csv = "Store,DayOfWeek,Date,Customers,Open,Promo,StateHoliday,SchoolHoliday,Sales\n\
                   1,5,2015-07-31,555,1,1,a,1,5263\n";
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let record: SalesRecord = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(record.sales, Some(5263.0));
        assert_eq!(record.state_holiday, "a");
    }
}
