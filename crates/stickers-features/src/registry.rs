//! Feature Registry
//!
//! Central list of every derived feature column. Exports, data frames and
//! the design matrix take their column names and order from here.

use std::collections::HashMap;

/// Feature groups, one per pipeline concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureGroup {
    /// Calendar attributes (year, month, weekday, indices)
    Calendar,
    /// Normalized position within the seasonal cycles
    Position,
    /// Sine/cosine seasonality pairs
    Harmonic,
    /// External economic indicator
    Economic,
    /// Multiplicative category factors
    Category,
}

/// Feature metadata
#[derive(Debug, Clone)]
pub struct FeatureInfo {
    /// Column name (unique identifier)
    pub name: &'static str,
    /// Feature group
    pub group: FeatureGroup,
    /// Brief description of the column
    pub description: &'static str,
    /// Whether the column is an input to the multiplicative model
    pub model_input: bool,
}

const fn feature(
    name: &'static str,
    group: FeatureGroup,
    description: &'static str,
    model_input: bool,
) -> FeatureInfo {
    FeatureInfo {
        name,
        group,
        description,
        model_input,
    }
}

/// Get all derived features, in column order
pub fn available_features() -> Vec<FeatureInfo> {
    use FeatureGroup::*;

    vec![
        feature("year", Calendar, "Calendar year", false),
        feature("month", Calendar, "Month of year (1-12)", false),
        feature("weekday", Calendar, "Day of week, Monday = 0", false),
        feature("day_of_year", Calendar, "Day of year (1-based)", false),
        feature("day_index", Calendar, "Days since the earliest date in the dataset", false),
        feature("week_index", Calendar, "day_index div 7", false),
        feature("day_density", Calendar, "Rows per series in the record's year", false),
        feature("part_of_year", Position, "(day_of_year - 1) / day_density", false),
        feature("part_of_two_years", Position, "part_of_year + year mod 2", false),
        feature("sin_t", Harmonic, "Sine, period one year", true),
        feature("cos_t", Harmonic, "Cosine, period one year", true),
        feature("sin_2t", Harmonic, "Sine, period half a year", true),
        feature("cos_2t", Harmonic, "Cosine, period half a year", true),
        feature("sin_3t", Harmonic, "Sine, period a third of a year", true),
        feature("cos_3t", Harmonic, "Cosine, period a third of a year", true),
        feature("sin_4t", Harmonic, "Sine, period a quarter year", true),
        feature("cos_4t", Harmonic, "Cosine, period a quarter year", true),
        feature("sin_half_t", Harmonic, "Sine, period two years", true),
        feature("cos_half_t", Harmonic, "Cosine, period two years", true),
        feature("economic_indicator", Economic, "GDP per capita for (country, year)", true),
        feature("store_factor", Category, "Mean historical quantity of the store", true),
        feature("product_factor", Category, "Mean historical quantity of the product", true),
    ]
}

/// Get features by group
pub fn features_by_group(group: FeatureGroup) -> Vec<FeatureInfo> {
    available_features()
        .into_iter()
        .filter(|f| f.group == group)
        .collect()
}

/// Get feature info by name
pub fn get_feature_info(name: &str) -> Option<FeatureInfo> {
    available_features().into_iter().find(|f| f.name == name)
}

/// List all feature names
pub fn list_feature_names() -> Vec<&'static str> {
    available_features().into_iter().map(|f| f.name).collect()
}

/// Names of the model input columns, in design-matrix order
pub fn model_input_names() -> Vec<&'static str> {
    available_features()
        .into_iter()
        .filter(|f| f.model_input)
        .map(|f| f.name)
        .collect()
}

/// Count features by group
pub fn count_by_group() -> HashMap<FeatureGroup, usize> {
    let mut counts = HashMap::new();
    for feature in available_features() {
        *counts.entry(feature.group).or_insert(0) += 1;
    }
    counts
}
