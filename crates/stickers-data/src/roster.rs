//! Country, store, product and year rosters.
//!
//! The roster is the fixed set of labels a dataset is allowed to contain. It
//! can be supplied as configuration (JSON) or inferred from the records, and
//! is used to validate both the sales rows and the economic table. Years
//! describe the economic table's columns only; records may fall in later
//! years, which simply have no indicator.

use crate::error::{DataError, Result};
use crate::record::SalesRecord;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Field of a sales record that is checked against the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RosterField {
    /// Country label
    #[display("country")]
    Country,
    /// Store label
    #[display("store")]
    Store,
    /// Product label
    #[display("product")]
    Product,
}

/// Explicit roster of labels for a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    /// Countries, in economic-table row order
    pub countries: Vec<String>,
    /// Stores
    pub stores: Vec<String>,
    /// Products
    pub products: Vec<String>,
    /// Economic-table year columns, in column order (may be empty)
    #[serde(default)]
    pub years: Vec<i32>,
}

impl Roster {
    /// Create a roster without years.
    pub fn new<C, S, P>(countries: C, stores: S, products: P) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            countries: countries.into_iter().map(Into::into).collect(),
            stores: stores.into_iter().map(Into::into).collect(),
            products: products.into_iter().map(Into::into).collect(),
            years: Vec::new(),
        }
    }

    /// Set the economic-table year columns.
    pub fn with_years(mut self, years: impl IntoIterator<Item = i32>) -> Self {
        self.years = years.into_iter().collect();
        self
    }

    /// Infer a roster from records.
    ///
    /// Labels keep their first-seen order. Years are left empty; they come
    /// from the economic table's columns.
    pub fn infer(records: &[SalesRecord]) -> Self {
        let mut roster = Self::default();
        for record in records {
            push_unique(&mut roster.countries, &record.country);
            push_unique(&mut roster.stores, &record.store);
            push_unique(&mut roster.products, &record.product);
        }
        roster
    }

    /// Load a roster from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Number of (country, store, product) series the roster describes.
    pub fn series_count(&self) -> usize {
        self.countries.len() * self.stores.len() * self.products.len()
    }

    /// Check whether a country is in the roster.
    pub fn contains_country(&self, country: &str) -> bool {
        self.countries.iter().any(|c| c == country)
    }

    /// Check whether a year is in the roster.
    pub fn contains_year(&self, year: i32) -> bool {
        self.years.contains(&year)
    }

    /// Validate that every record's country, store and product belong to
    /// the roster. Record years are not checked.
    pub fn validate_records(&self, records: &[SalesRecord]) -> Result<()> {
        for record in records {
            let checks = [
                (RosterField::Country, &self.countries, &record.country),
                (RosterField::Store, &self.stores, &record.store),
                (RosterField::Product, &self.products, &record.product),
            ];
            for (field, allowed, value) in checks {
                if !allowed.iter().any(|a| a == value) {
                    return Err(DataError::NotInRoster {
                        id: record.id,
                        field,
                        value: value.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn push_unique(labels: &mut Vec<String>, value: &str) {
    if !labels.iter().any(|l| l == value) {
        labels.push(value.to_string());
    }
}
