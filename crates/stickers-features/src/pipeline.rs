//! Feature pipeline
//!
//! Runs the calendar, harmonic and factor stages over one immutable record
//! set. Each stage completes over every row before the next starts: the
//! harmonic stage needs the per-year density (a global aggregate) and the
//! factor stage needs the partition of every row.

use crate::calendar::{CalendarAttributes, CalendarStage, YearDensity, distinct_series};
use crate::category::{CategoryFactorEstimator, CategoryFactors, CategoryField};
use crate::error::Result;
use crate::harmonic::{HarmonicEncoder, HarmonicFeatures, Position};
use crate::joiner::EconomicJoiner;
use crate::registry::model_input_names;
use chrono::NaiveDate;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use stickers_data::{IndicatorSource, Partition, Roster, SalesRecord};
use tracing::{debug, warn};

/// Pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// When set, records are validated against the roster before the run
    /// and the roster's series count is used for day density. Otherwise the
    /// number of distinct series in the records is used.
    #[serde(default)]
    pub roster: Option<Roster>,
}

/// One derived feature row per input record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedFeatureRow {
    /// Source record id
    pub id: u64,
    /// Source record date
    pub date: NaiveDate,
    /// Country label
    pub country: String,
    /// Store label
    pub store: String,
    /// Product label
    pub product: String,
    /// Quantity (historical rows only)
    pub quantity: Option<f64>,
    /// Partition tag
    pub partition: Partition,
    /// Calendar attributes
    pub calendar: CalendarAttributes,
    /// Day density of the record's year
    pub day_density: Option<f64>,
    /// Position in the seasonal cycles; `None` for a degenerate year
    pub position: Option<Position>,
    /// Harmonic pairs; `None` whenever `position` is `None`
    pub harmonics: Option<HarmonicFeatures>,
    /// Economic indicator for (country, year)
    pub economic_indicator: Option<f64>,
    /// Store factor; `None` for stores without qualifying history
    pub store_factor: Option<f64>,
    /// Product factor; `None` for products without qualifying history
    pub product_factor: Option<f64>,
}

impl DerivedFeatureRow {
    /// Values of the model input columns, missing values as NaN.
    ///
    /// Order matches [`model_input_names`].
    pub fn model_inputs(&self) -> Vec<f64> {
        let harmonics = self
            .harmonics
            .map_or([f64::NAN; 10], |h| h.values());
        harmonics
            .into_iter()
            .chain([
                self.economic_indicator.unwrap_or(f64::NAN),
                self.store_factor.unwrap_or(f64::NAN),
                self.product_factor.unwrap_or(f64::NAN),
            ])
            .collect()
    }

    /// Returns true for historical rows.
    pub const fn is_historical(&self) -> bool {
        self.partition.is_historical()
    }
}

/// Output of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Derived rows, in input order
    pub rows: Vec<DerivedFeatureRow>,
    /// Store factors
    pub store_factors: CategoryFactors,
    /// Product factors
    pub product_factors: CategoryFactors,
    /// Per-year day density
    pub densities: YearDensity,
    /// Earliest date across both partitions
    pub epoch: Option<NaiveDate>,
}

impl FeatureSet {
    /// A feature set with no rows.
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            store_factors: CategoryFactors::empty(CategoryField::Store),
            product_factors: CategoryFactors::empty(CategoryField::Product),
            densities: YearDensity::default(),
            epoch: None,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Historical rows.
    pub fn historical(&self) -> impl Iterator<Item = &DerivedFeatureRow> {
        self.rows.iter().filter(|r| r.is_historical())
    }

    /// Forecast rows.
    pub fn forecast(&self) -> impl Iterator<Item = &DerivedFeatureRow> {
        self.rows.iter().filter(|r| !r.is_historical())
    }

    /// Factors for one category field.
    pub const fn factors(&self, field: CategoryField) -> &CategoryFactors {
        match field {
            CategoryField::Store => &self.store_factors,
            CategoryField::Product => &self.product_factors,
        }
    }

    /// Model inputs as a rows x columns matrix with missing values as NaN.
    pub fn design_matrix(&self) -> DesignMatrix {
        let columns = model_input_names();
        let mut values = Array2::from_elem((self.rows.len(), columns.len()), f64::NAN);
        for (mut target, row) in values.rows_mut().into_iter().zip(&self.rows) {
            for (cell, value) in target.iter_mut().zip(row.model_inputs()) {
                *cell = value;
            }
        }
        DesignMatrix { columns, values }
    }
}

/// Model input matrix with its column names.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    /// Column names
    pub columns: Vec<&'static str>,
    /// Values, one row per derived row
    pub values: Array2<f64>,
}

impl DesignMatrix {
    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| *c == name)
    }
}

/// Three-stage feature pipeline.
///
/// Stateless between runs: the output is a pure function of the records,
/// the indicator source and the configuration.
#[derive(Debug, Clone, Default)]
pub struct FeaturePipeline {
    config: PipelineConfig,
}

impl FeaturePipeline {
    /// Pipeline without a roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline with the given configuration.
    pub const fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Pipeline that validates against `roster`.
    pub fn with_roster(roster: Roster) -> Self {
        Self::with_config(PipelineConfig {
            roster: Some(roster),
        })
    }

    /// Current configuration.
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run over historical and forecast partitions supplied separately.
    pub fn run_partitions<S: IndicatorSource + ?Sized>(
        &self,
        historical: &[SalesRecord],
        forecast: &[SalesRecord],
        economic: &S,
    ) -> Result<FeatureSet> {
        let records: Vec<SalesRecord> = historical.iter().chain(forecast).cloned().collect();
        self.run(&records, economic)
    }

    /// Run all three stages over the combined record set.
    ///
    /// Empty input produces an empty feature set. The only error is a roster
    /// violation when a roster is configured.
    pub fn run<S: IndicatorSource + ?Sized>(
        &self,
        records: &[SalesRecord],
        economic: &S,
    ) -> Result<FeatureSet> {
        if let Some(roster) = &self.config.roster {
            roster.validate_records(records)?;
        }
        if records.is_empty() {
            debug!("empty record set, nothing to derive");
            return Ok(FeatureSet::empty());
        }

        let series = self
            .config
            .roster
            .as_ref()
            .map_or_else(|| distinct_series(records), Roster::series_count);

        // Stage 1: calendar
        let calendar = CalendarStage::run(records, series);
        debug!(
            rows = records.len(),
            series,
            years = calendar.density.len(),
            "calendar stage complete"
        );

        // Stage 2: harmonics
        let positions: Vec<Option<Position>> = calendar
            .attributes
            .iter()
            .map(|attrs| {
                calendar
                    .density
                    .get(attrs.year)
                    .and_then(|density| Position::fold(attrs.day_of_year, attrs.year, density))
            })
            .collect();
        let harmonics: Vec<Option<HarmonicFeatures>> = positions
            .iter()
            .map(|p| p.map(HarmonicEncoder::encode))
            .collect();
        let undefined = positions.iter().filter(|p| p.is_none()).count();
        if undefined > 0 {
            warn!(rows = undefined, "harmonic features undefined for degenerate years");
        }
        debug!("harmonic stage complete");

        // Stage 3: economic join and category factors
        let indicators = EconomicJoiner::new(economic).join(records);
        let qualifying = CategoryFactorEstimator::qualifying(records, &indicators);
        let store_factors =
            CategoryFactorEstimator::estimate(qualifying.iter().copied(), CategoryField::Store);
        let product_factors =
            CategoryFactorEstimator::estimate(qualifying.iter().copied(), CategoryField::Product);
        debug!(
            qualifying = qualifying.len(),
            stores = store_factors.len(),
            products = product_factors.len(),
            "factor stage complete"
        );

        let rows: Vec<DerivedFeatureRow> = records
            .iter()
            .zip(calendar.attributes)
            .zip(positions)
            .zip(harmonics)
            .zip(indicators)
            .map(
                |((((record, calendar_attrs), position), harmonics), indicator)| DerivedFeatureRow {
                    id: record.id,
                    date: record.date,
                    country: record.country.clone(),
                    store: record.store.clone(),
                    product: record.product.clone(),
                    quantity: record.quantity,
                    partition: record.partition,
                    calendar: calendar_attrs,
                    day_density: calendar.density.get(calendar_attrs.year),
                    position,
                    harmonics,
                    economic_indicator: indicator,
                    store_factor: store_factors.get(&record.store),
                    product_factor: product_factors.get(&record.product),
                },
            )
            .collect();

        let unfactored = rows
            .iter()
            .filter(|r| r.store_factor.is_none() || r.product_factor.is_none())
            .count();
        if unfactored > 0 {
            warn!(rows = unfactored, "rows without a store or product factor");
        }

        Ok(FeatureSet {
            rows,
            store_factors,
            product_factors,
            densities: calendar.density,
            epoch: calendar.epoch,
        })
    }
}
