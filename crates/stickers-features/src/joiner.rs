//! Economic indicator join

use std::collections::BTreeSet;
use stickers_data::{IndicatorSource, SalesRecord};
use tracing::warn;

/// Attaches the (country, year) economic indicator to records.
#[derive(Debug)]
pub struct EconomicJoiner<'a, S: ?Sized> {
    source: &'a S,
}

impl<'a, S: IndicatorSource + ?Sized> EconomicJoiner<'a, S> {
    /// Create a joiner over an indicator source.
    pub const fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Indicator for one (country, year); `None` on a miss.
    pub fn lookup(&self, country: &str, year: i32) -> Option<f64> {
        self.source.indicator(country, year)
    }

    /// Indicator for each record, in input order.
    ///
    /// Misses are returned as `None` and reported once per distinct
    /// (country, year).
    pub fn join(&self, records: &[SalesRecord]) -> Vec<Option<f64>> {
        let mut misses = BTreeSet::new();
        let joined = records
            .iter()
            .map(|record| {
                let value = self.lookup(&record.country, record.year());
                if value.is_none() {
                    misses.insert((record.country.as_str(), record.year()));
                }
                value
            })
            .collect();

        if !misses.is_empty() {
            warn!(
                pairs = misses.len(),
                first = ?misses.first(),
                "no economic indicator for some (country, year) pairs"
            );
        }
        joined
    }
}
