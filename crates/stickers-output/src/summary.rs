//! Sales summaries
//!
//! Aggregations over the frame produced by [`features_to_frame`](crate::features_to_frame):
//! yearly totals per country, store or product and total quantity per day.
//! Only historical rows carry quantities, so forecast rows are filtered out
//! first. Also a count of missing derived values per feature set.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use stickers_data::Partition;
use stickers_features::FeatureSet;

/// Grouping dimension for yearly totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum SummaryDimension {
    /// Group by country
    #[display("country")]
    Country,
    /// Group by store
    #[display("store")]
    Store,
    /// Group by product
    #[display("product")]
    Product,
}

impl SummaryDimension {
    /// All dimensions.
    pub const ALL: [Self; 3] = [Self::Country, Self::Store, Self::Product];

    /// Column name in the feature frame.
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Store => "store",
            Self::Product => "product",
        }
    }
}

fn historical_rows(frame: &DataFrame) -> LazyFrame {
    frame
        .clone()
        .lazy()
        .filter(col("partition").eq(lit(Partition::Historical.as_str())))
}

/// Total historical quantity per year and value of `dimension`.
///
/// Returns a DataFrame with columns: [year, <dimension>, total_quantity, rows]
/// sorted by year, then dimension value.
pub fn yearly_totals(frame: &DataFrame, dimension: SummaryDimension) -> PolarsResult<DataFrame> {
    let key = dimension.column();
    historical_rows(frame)
        .group_by([col("year"), col(key)])
        .agg([
            col("quantity").sum().alias("total_quantity"),
            col("quantity").count().alias("rows"),
        ])
        .sort(["year", key], SortMultipleOptions::default())
        .collect()
}

/// Total historical quantity per day across all series.
///
/// Returns a DataFrame with columns: [date, total_quantity] sorted by date.
pub fn daily_totals(frame: &DataFrame) -> PolarsResult<DataFrame> {
    historical_rows(frame)
        .group_by([col("date")])
        .agg([col("quantity").sum().alias("total_quantity")])
        .sort(["date"], SortMultipleOptions::default())
        .collect()
}

/// Counts of missing values in a feature set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingnessReport {
    /// Total rows
    pub rows: usize,
    /// Historical rows
    pub historical_rows: usize,
    /// Historical rows with no recorded quantity
    pub missing_quantity: usize,
    /// Rows without harmonic features
    pub missing_harmonics: usize,
    /// Rows without an economic indicator
    pub missing_indicator: usize,
    /// Rows without a store factor
    pub missing_store_factor: usize,
    /// Rows without a product factor
    pub missing_product_factor: usize,
}

impl MissingnessReport {
    /// Count missing values over every row of `set`.
    pub fn from_feature_set(set: &FeatureSet) -> Self {
        let mut report = Self {
            rows: set.len(),
            ..Self::default()
        };
        for row in &set.rows {
            if row.is_historical() {
                report.historical_rows += 1;
                if row.quantity.is_none() {
                    report.missing_quantity += 1;
                }
            }
            report.missing_harmonics += usize::from(row.harmonics.is_none());
            report.missing_indicator += usize::from(row.economic_indicator.is_none());
            report.missing_store_factor += usize::from(row.store_factor.is_none());
            report.missing_product_factor += usize::from(row.product_factor.is_none());
        }
        report
    }

    /// Returns true if no derived value is missing.
    pub const fn is_complete(&self) -> bool {
        self.missing_harmonics == 0
            && self.missing_indicator == 0
            && self.missing_store_factor == 0
            && self.missing_product_factor == 0
    }
}

impl fmt::Display for MissingnessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "rows: {} ({} historical)",
            self.rows, self.historical_rows
        )?;
        writeln!(f, "missing quantity:       {}", self.missing_quantity)?;
        writeln!(f, "missing harmonics:      {}", self.missing_harmonics)?;
        writeln!(f, "missing indicator:      {}", self.missing_indicator)?;
        writeln!(f, "missing store factor:   {}", self.missing_store_factor)?;
        write!(f, "missing product factor: {}", self.missing_product_factor)
    }
}
