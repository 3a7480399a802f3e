//! Category factors
//!
//! A category factor is the mean historical quantity for one value of a
//! categorical field (store or product). Factors are estimated only from
//! historical rows that have a recorded quantity and a defined economic
//! indicator; rows of a (country, year) without economic context are left
//! out so incomplete external data cannot bias the factors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use stickers_data::SalesRecord;

/// Categorical field a factor is estimated for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum CategoryField {
    /// Store label
    #[display("store")]
    Store,
    /// Product label
    #[display("product")]
    Product,
}

impl CategoryField {
    /// All fields, in estimation order.
    pub const ALL: [Self; 2] = [Self::Store, Self::Product];

    /// The record's value for this field.
    pub fn value<'r>(&self, record: &'r SalesRecord) -> &'r str {
        match self {
            Self::Store => &record.store,
            Self::Product => &record.product,
        }
    }
}

/// Factors for every observed value of one category field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryFactors {
    field: CategoryField,
    factors: BTreeMap<String, f64>,
    observations: BTreeMap<String, usize>,
}

impl CategoryFactors {
    /// An empty mapping for `field`.
    pub const fn empty(field: CategoryField) -> Self {
        Self {
            field,
            factors: BTreeMap::new(),
            observations: BTreeMap::new(),
        }
    }

    /// Field the factors belong to.
    pub const fn field(&self) -> CategoryField {
        self.field
    }

    /// Factor for a category value; `None` if it was never observed.
    pub fn get(&self, category: &str) -> Option<f64> {
        self.factors.get(category).copied()
    }

    /// Number of rows the factor for `category` was estimated from.
    pub fn observations(&self, category: &str) -> usize {
        self.observations.get(category).copied().unwrap_or(0)
    }

    /// Iterate over (category, factor) in category order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.factors.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Number of categories with a factor.
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// Returns true if no category has a factor.
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

/// Mean-quantity estimator for category factors.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryFactorEstimator;

impl CategoryFactorEstimator {
    /// Whether a record may contribute to factor estimation, given its
    /// economic indicator.
    pub fn qualifies(record: &SalesRecord, indicator: Option<f64>) -> bool {
        record.partition.is_historical() && usable(record.quantity).is_some() && indicator.is_some()
    }

    /// Records that qualify for estimation; `indicators` is aligned with
    /// `records`.
    pub fn qualifying<'r>(
        records: &'r [SalesRecord],
        indicators: &[Option<f64>],
    ) -> Vec<&'r SalesRecord> {
        records
            .iter()
            .zip(indicators)
            .filter(|(record, indicator)| Self::qualifies(record, **indicator))
            .map(|(record, _)| record)
            .collect()
    }

    /// Mean quantity per value of `field` over `rows`.
    ///
    /// Rows are expected to be pre-filtered with [`qualifying`](Self::qualifying);
    /// forecast rows and rows without a quantity are ignored regardless. The
    /// result does not depend on row order: each category's quantities are
    /// sorted before summation.
    pub fn estimate<'r, I>(rows: I, field: CategoryField) -> CategoryFactors
    where
        I: IntoIterator<Item = &'r SalesRecord>,
    {
        let mut groups: BTreeMap<&'r str, Vec<f64>> = BTreeMap::new();
        for record in rows {
            if !record.partition.is_historical() {
                continue;
            }
            if let Some(quantity) = usable(record.quantity) {
                groups.entry(field.value(record)).or_default().push(quantity);
            }
        }

        let mut factors = CategoryFactors::empty(field);
        for (category, mut quantities) in groups {
            quantities.sort_by(f64::total_cmp);
            let mean = quantities.iter().sum::<f64>() / quantities.len() as f64;
            factors.factors.insert(category.to_string(), mean);
            factors
                .observations
                .insert(category.to_string(), quantities.len());
        }
        factors
    }
}

fn usable(quantity: Option<f64>) -> Option<f64> {
    quantity.filter(|q| !q.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2015, 3, 1).unwrap()
    }

    fn row(id: u64, store: &str, product: &str, quantity: f64) -> SalesRecord {
        SalesRecord::historical(id, date(), "Finland", store, product, Some(quantity))
    }

    #[test]
    fn test_mean_per_category() {
        let rows = vec![
            row(0, "S1", "Kaggle", 100.0),
            row(1, "S1", "Kerneler", 200.0),
            row(2, "S2", "Kaggle", 30.0),
        ];
        let stores = CategoryFactorEstimator::estimate(&rows, CategoryField::Store);
        assert_eq!(stores.field(), CategoryField::Store);
        assert_relative_eq!(stores.get("S1").unwrap(), 150.0);
        assert_relative_eq!(stores.get("S2").unwrap(), 30.0);
        assert_eq!(stores.observations("S1"), 2);
        assert_eq!(stores.get("S3"), None);
        assert_eq!(stores.observations("S3"), 0);

        let products = CategoryFactorEstimator::estimate(&rows, CategoryField::Product);
        assert_relative_eq!(products.get("Kaggle").unwrap(), 65.0);
        assert_relative_eq!(products.get("Kerneler").unwrap(), 200.0);
    }

    #[test]
    fn test_ignores_forecast_and_missing_quantities() {
        let rows = vec![
            row(0, "S1", "P", 10.0),
            SalesRecord::historical(1, date(), "Finland", "S1", "P", None),
            SalesRecord::historical(2, date(), "Finland", "S1", "P", Some(f64::NAN)),
            SalesRecord::forecast(3, date(), "Finland", "S2", "P"),
        ];
        let stores = CategoryFactorEstimator::estimate(&rows, CategoryField::Store);
        assert_eq!(stores.len(), 1);
        assert_relative_eq!(stores.get("S1").unwrap(), 10.0);
        assert_eq!(stores.get("S2"), None);
    }

    #[test]
    fn test_qualifying_requires_indicator() {
        let rows = vec![row(0, "S1", "P", 10.0), row(1, "S1", "P", 90.0)];
        let kept = CategoryFactorEstimator::qualifying(&rows, &[Some(1.0), None]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 0);

        let stores = CategoryFactorEstimator::estimate(kept, CategoryField::Store);
        assert_relative_eq!(stores.get("S1").unwrap(), 10.0);
    }

    #[test]
    fn test_permutation_invariance() {
        let mut rows: Vec<SalesRecord> = (0..500)
            .map(|i| {
                let store = ["S1", "S2", "S3"][i % 3];
                let product = ["A", "B", "C", "D"][i % 4];
                // Values with very different magnitudes make summation order visible.
                let quantity = 10f64.powi((i % 9) as i32) + 0.1 * i as f64;
                row(i as u64, store, product, quantity)
            })
            .collect();

        let baseline_store = CategoryFactorEstimator::estimate(&rows, CategoryField::Store);
        let baseline_product = CategoryFactorEstimator::estimate(&rows, CategoryField::Product);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            rows.shuffle(&mut rng);
            assert_eq!(
                CategoryFactorEstimator::estimate(&rows, CategoryField::Store),
                baseline_store
            );
            assert_eq!(
                CategoryFactorEstimator::estimate(&rows, CategoryField::Product),
                baseline_product
            );
        }
    }

    #[test]
    fn test_empty_rows() {
        let rows: Vec<SalesRecord> = Vec::new();
        let factors = CategoryFactorEstimator::estimate(&rows, CategoryField::Product);
        assert!(factors.is_empty());
        assert_eq!(factors.iter().count(), 0);
    }

    #[test]
    fn test_field_labels() {
        assert_eq!(CategoryField::Store.to_string(), "store");
        assert_eq!(CategoryField::ALL, [CategoryField::Store, CategoryField::Product]);
    }
}
