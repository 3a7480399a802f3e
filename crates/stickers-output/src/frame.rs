//! Polars views of pipeline output.
//!
//! Column names follow the feature registry, preceded by the record's
//! identity columns (`id`, `date`, `country`, `store`, `product`,
//! `quantity`, `partition`). Missing values are nulls.

use polars::prelude::*;
use stickers_features::{CategoryFactors, DerivedFeatureRow, FeatureSet, HarmonicFeatures};

/// Identity columns that precede the derived features.
pub const IDENTITY_COLUMNS: [&str; 7] = [
    "id",
    "date",
    "country",
    "store",
    "product",
    "quantity",
    "partition",
];

fn float_column<F>(name: &str, rows: &[DerivedFeatureRow], f: F) -> Column
where
    F: Fn(&DerivedFeatureRow) -> Option<f64>,
{
    let values: Vec<Option<f64>> = rows.iter().map(f).collect();
    Column::new(name.into(), values)
}

/// Convert the derived rows of a feature set into a DataFrame.
pub fn features_to_frame(set: &FeatureSet) -> PolarsResult<DataFrame> {
    let rows = &set.rows;

    let mut columns = vec![
        Column::new("id".into(), rows.iter().map(|r| r.id).collect::<Vec<u64>>()),
        Column::new(
            "date".into(),
            rows.iter().map(|r| r.date).collect::<Vec<_>>(),
        ),
        Column::new(
            "country".into(),
            rows.iter().map(|r| r.country.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "store".into(),
            rows.iter().map(|r| r.store.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "product".into(),
            rows.iter().map(|r| r.product.as_str()).collect::<Vec<_>>(),
        ),
        float_column("quantity", rows, |r| r.quantity),
        Column::new(
            "partition".into(),
            rows.iter()
                .map(|r| r.partition.as_str())
                .collect::<Vec<_>>(),
        ),
        Column::new(
            "year".into(),
            rows.iter().map(|r| r.calendar.year).collect::<Vec<i32>>(),
        ),
        Column::new(
            "month".into(),
            rows.iter().map(|r| r.calendar.month).collect::<Vec<u32>>(),
        ),
        Column::new(
            "weekday".into(),
            rows.iter().map(|r| r.calendar.weekday).collect::<Vec<u32>>(),
        ),
        Column::new(
            "day_of_year".into(),
            rows.iter()
                .map(|r| r.calendar.day_of_year)
                .collect::<Vec<u32>>(),
        ),
        Column::new(
            "day_index".into(),
            rows.iter()
                .map(|r| r.calendar.day_index)
                .collect::<Vec<i64>>(),
        ),
        Column::new(
            "week_index".into(),
            rows.iter()
                .map(|r| r.calendar.week_index)
                .collect::<Vec<i64>>(),
        ),
        float_column("day_density", rows, |r| r.day_density),
        float_column("part_of_year", rows, |r| {
            r.position.map(|p| p.part_of_year)
        }),
        float_column("part_of_two_years", rows, |r| {
            r.position.map(|p| p.part_of_two_years)
        }),
    ];

    for (index, name) in HarmonicFeatures::COLUMNS.iter().enumerate() {
        columns.push(float_column(name, rows, |r| {
            r.harmonics.map(|h| h.values()[index])
        }));
    }

    columns.push(float_column("economic_indicator", rows, |r| {
        r.economic_indicator
    }));
    columns.push(float_column("store_factor", rows, |r| r.store_factor));
    columns.push(float_column("product_factor", rows, |r| r.product_factor));

    DataFrame::new(columns)
}

/// Convert one category factor mapping into a DataFrame with columns
/// `[<field>, factor, observations]`.
pub fn factors_to_frame(factors: &CategoryFactors) -> PolarsResult<DataFrame> {
    let field = factors.field().to_string();
    let categories: Vec<&str> = factors.iter().map(|(c, _)| c).collect();
    let values: Vec<f64> = factors.iter().map(|(_, v)| v).collect();
    let observations: Vec<u64> = categories
        .iter()
        .map(|c| factors.observations(c) as u64)
        .collect();

    DataFrame::new(vec![
        Column::new(field.as_str().into(), categories),
        Column::new("factor".into(), values),
        Column::new("observations".into(), observations),
    ])
}
