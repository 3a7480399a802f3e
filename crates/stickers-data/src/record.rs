//! Daily sales records.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Which side of the train/forecast split a record belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    /// Quantity is known (training data)
    #[display("historical")]
    Historical,
    /// Quantity is to be forecast (test data)
    #[display("forecast")]
    Forecast,
}

impl Partition {
    /// Returns true for the historical partition.
    pub const fn is_historical(&self) -> bool {
        matches!(self, Self::Historical)
    }

    /// String label used in exports and frames.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Historical => "historical",
            Self::Forecast => "forecast",
        }
    }
}

/// One daily sales observation for a (country, store, product) series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Record identifier
    pub id: u64,
    /// Calendar date of the observation
    pub date: NaiveDate,
    /// Country label
    pub country: String,
    /// Store label
    pub store: String,
    /// Product label
    pub product: String,
    /// Units sold; `None` for forecast rows and unrecorded history
    pub quantity: Option<f64>,
    /// Partition tag
    pub partition: Partition,
}

impl SalesRecord {
    /// Create a historical record.
    pub fn historical(
        id: u64,
        date: NaiveDate,
        country: impl Into<String>,
        store: impl Into<String>,
        product: impl Into<String>,
        quantity: Option<f64>,
    ) -> Self {
        Self {
            id,
            date,
            country: country.into(),
            store: store.into(),
            product: product.into(),
            quantity,
            partition: Partition::Historical,
        }
    }

    /// Create a forecast record (quantity unknown).
    pub fn forecast(
        id: u64,
        date: NaiveDate,
        country: impl Into<String>,
        store: impl Into<String>,
        product: impl Into<String>,
    ) -> Self {
        Self {
            id,
            date,
            country: country.into(),
            store: store.into(),
            product: product.into(),
            quantity: None,
            partition: Partition::Forecast,
        }
    }

    /// Calendar year of the record.
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// The (country, store, product) series this record belongs to.
    pub fn series(&self) -> (&str, &str, &str) {
        (&self.country, &self.store, &self.product)
    }
}
