//! End-to-end tests for the feature pipeline.

use approx::assert_relative_eq;
use chrono::{Days, NaiveDate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use stickers_data::{EconomicTable, Partition, SalesRecord};
use stickers_features::{CategoryField, FeaturePipeline, FeatureSet};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const COUNTRIES: [&str; 2] = ["Finland", "Kenya"];
const STORES: [&str; 2] = ["Discount Stickers", "Premium Sticker Mart"];
const PRODUCTS: [&str; 2] = ["Kaggle", "Holographic Goose"];

/// Every series on every day from `start` for `days` days.
fn daily_records(start: NaiveDate, days: u64, partition: Partition, first_id: u64) -> Vec<SalesRecord> {
    let mut records = Vec::new();
    let mut id = first_id;
    for offset in 0..days {
        let d = start + Days::new(offset);
        for country in COUNTRIES {
            for store in STORES {
                for product in PRODUCTS {
                    let record = match partition {
                        Partition::Historical => {
                            let quantity = 10.0 + (id % 17) as f64;
                            SalesRecord::historical(id, d, country, store, product, Some(quantity))
                        }
                        Partition::Forecast => SalesRecord::forecast(id, d, country, store, product),
                    };
                    records.push(record);
                    id += 1;
                }
            }
        }
    }
    records
}

fn economic() -> EconomicTable {
    EconomicTable::from_entries([
        ("Finland", 2015, 42_784.0),
        ("Finland", 2016, 43_784.0),
        ("Finland", 2017, 46_412.0),
        ("Kenya", 2015, 1_464.0),
        ("Kenya", 2016, 1_525.0),
        ("Kenya", 2017, 1_594.0),
    ])
    .unwrap()
}

fn run(historical: &[SalesRecord], forecast: &[SalesRecord], table: &EconomicTable) -> FeatureSet {
    FeaturePipeline::new()
        .run_partitions(historical, forecast, table)
        .unwrap()
}

#[test]
fn test_day_index_spans_both_partitions() {
    let historical = daily_records(date(2015, 12, 1), 45, Partition::Historical, 0);
    let forecast = daily_records(date(2016, 1, 15), 30, Partition::Forecast, 10_000);
    let set = run(&historical, &forecast, &economic());

    assert_eq!(set.epoch, Some(date(2015, 12, 1)));
    assert_eq!(set.len(), historical.len() + forecast.len());

    let mut by_date: Vec<(NaiveDate, i64)> =
        set.rows.iter().map(|r| (r.date, r.calendar.day_index)).collect();
    by_date.sort();
    assert_eq!(by_date[0].1, 0);
    assert!(by_date.windows(2).all(|w| w[0].1 <= w[1].1));

    // The axis is continuous: the first forecast day follows the last historical day.
    let last_historical = set.historical().map(|r| r.calendar.day_index).max().unwrap();
    let first_forecast = set.forecast().map(|r| r.calendar.day_index).min().unwrap();
    assert_eq!(first_forecast, last_historical + 1);
    assert!(
        set.rows
            .iter()
            .all(|r| r.calendar.week_index == r.calendar.day_index / 7)
    );
}

#[test]
fn test_epoch_independent_of_input_order() {
    // Forecast rows listed first still measure from the earliest date.
    let historical = daily_records(date(2015, 6, 1), 5, Partition::Historical, 0);
    let forecast = daily_records(date(2015, 6, 6), 5, Partition::Forecast, 100);
    let set = FeaturePipeline::new()
        .run_partitions(&forecast, &historical, &economic())
        .unwrap();
    assert_eq!(set.epoch, Some(date(2015, 6, 1)));
    let first = set.rows.iter().find(|r| r.date == date(2015, 6, 1)).unwrap();
    assert_eq!(first.calendar.day_index, 0);
}

#[test]
fn test_density_per_year() {
    let historical = daily_records(date(2015, 12, 22), 10, Partition::Historical, 0);
    let forecast = daily_records(date(2016, 1, 1), 4, Partition::Forecast, 1_000);
    let set = run(&historical, &forecast, &economic());

    let mut counts: HashMap<i32, usize> = HashMap::new();
    for row in &set.rows {
        *counts.entry(row.calendar.year).or_insert(0) += 1;
    }
    let series = (COUNTRIES.len() * STORES.len() * PRODUCTS.len()) as f64;

    for row in &set.rows {
        let expected = counts[&row.calendar.year] as f64 / series;
        assert_relative_eq!(row.day_density.unwrap(), expected);
        assert_eq!(row.day_density, set.densities.get(row.calendar.year));
    }
    assert_eq!(set.densities.get(2015), Some(10.0));
    assert_eq!(set.densities.get(2016), Some(4.0));
}

#[test]
fn test_partial_year_positions_fold_into_unit_interval() {
    let historical = daily_records(date(2016, 1, 1), 20, Partition::Historical, 0);
    let set = run(&historical, &[], &economic());

    for row in &set.rows {
        let position = row.position.unwrap();
        assert!((0.0..1.0).contains(&position.part_of_year));
        // 2016 is even, so the two-year fold equals the single-year fold.
        assert_relative_eq!(position.part_of_two_years, position.part_of_year);
        let t = row.harmonics.unwrap().t;
        assert_relative_eq!(t.sin.powi(2) + t.cos.powi(2), 1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_odd_year_offsets_two_year_fold() {
    let historical = daily_records(date(2017, 3, 1), 3, Partition::Historical, 0);
    let set = run(&historical, &[], &economic());
    for row in &set.rows {
        let position = row.position.unwrap();
        assert_relative_eq!(position.part_of_two_years, position.part_of_year + 1.0);
    }
}

#[test]
fn test_store_factor_is_mean_quantity() {
    let d = date(2015, 5, 1);
    let records = vec![
        SalesRecord::historical(0, d, "A", "S1", "P", Some(100.0)),
        SalesRecord::historical(1, d, "A", "S1", "P", Some(200.0)),
    ];
    let table = EconomicTable::from_entries([("A", 2015, 1.0)]).unwrap();
    let set = FeaturePipeline::new().run(&records, &table).unwrap();

    assert_relative_eq!(set.store_factors.get("S1").unwrap(), 150.0);
    assert_relative_eq!(set.product_factors.get("P").unwrap(), 150.0);
    assert!(set.rows.iter().all(|r| r.store_factor == Some(150.0)));
}

#[test]
fn test_country_without_indicator_is_excluded_from_factors() {
    let d = date(2015, 5, 1);
    let records = vec![
        SalesRecord::historical(0, d, "A", "S1", "P", Some(100.0)),
        SalesRecord::historical(1, d, "A", "S1", "P", Some(200.0)),
        SalesRecord::historical(2, d, "B", "S1", "P", Some(10_000.0)),
    ];
    let table = EconomicTable::from_entries([("A", 2015, 1.0)]).unwrap();
    let set = FeaturePipeline::new().run(&records, &table).unwrap();

    let b = set.rows.iter().find(|r| r.country == "B").unwrap();
    assert_eq!(b.economic_indicator, None);
    assert_relative_eq!(set.store_factors.get("S1").unwrap(), 150.0);
    assert_eq!(set.store_factors.observations("S1"), 2);
    // The excluded row still receives the factor of its store.
    assert_eq!(b.store_factor, Some(150.0));
}

#[test]
fn test_forecast_quantities_never_influence_factors() {
    let historical = daily_records(date(2015, 1, 1), 20, Partition::Historical, 0);
    let mut forecast = daily_records(date(2015, 1, 21), 10, Partition::Forecast, 1_000);
    for (i, record) in forecast.iter_mut().enumerate() {
        record.quantity = Some(1_000_000.0 * (i + 1) as f64);
    }
    let baseline = run(&historical, &forecast, &economic());

    let mut quantities: Vec<Option<f64>> = forecast.iter().map(|r| r.quantity).collect();
    quantities.rotate_left(1);
    for (record, quantity) in forecast.iter_mut().zip(quantities) {
        record.quantity = quantity;
    }
    let swapped = run(&historical, &forecast, &economic());

    assert_eq!(baseline.store_factors, swapped.store_factors);
    assert_eq!(baseline.product_factors, swapped.product_factors);
    for field in CategoryField::ALL {
        for (_, factor) in baseline.factors(field).iter() {
            assert!(factor < 100.0);
        }
    }
    // Forecast rows still receive harmonic and economic features.
    assert!(swapped.forecast().all(|r| r.harmonics.is_some()));
    assert!(swapped.forecast().all(|r| r.economic_indicator.is_some()));
    assert!(swapped.forecast().all(|r| r.store_factor.is_some()));
}

#[test]
fn test_unseen_category_gets_missing_factor() {
    let historical = daily_records(date(2015, 1, 1), 3, Partition::Historical, 0);
    let forecast = vec![SalesRecord::forecast(
        99,
        date(2015, 1, 4),
        "Finland",
        "Stickers for Less",
        "Kerneler",
    )];
    let set = run(&historical, &forecast, &economic());
    let row = set.rows.iter().find(|r| r.id == 99).unwrap();
    assert_eq!(row.store_factor, None);
    assert_eq!(row.product_factor, None);
    assert!(row.harmonics.is_some());
}

#[test]
fn test_future_year_has_missing_indicator() {
    let historical = daily_records(date(2017, 12, 30), 2, Partition::Historical, 0);
    let forecast = daily_records(date(2018, 1, 1), 2, Partition::Forecast, 100);
    let set = run(&historical, &forecast, &economic());
    assert!(set.historical().all(|r| r.economic_indicator.is_some()));
    assert!(set.forecast().all(|r| r.economic_indicator.is_none()));
}

#[test]
fn test_runs_are_deterministic_and_order_independent() {
    let historical = daily_records(date(2015, 11, 1), 90, Partition::Historical, 0);
    let forecast = daily_records(date(2016, 1, 30), 30, Partition::Forecast, 100_000);
    let first = run(&historical, &forecast, &economic());
    let second = run(&historical, &forecast, &economic());
    assert_eq!(first, second);

    let mut shuffled = historical.clone();
    shuffled.shuffle(&mut StdRng::seed_from_u64(42));
    let permuted = run(&shuffled, &forecast, &economic());
    assert_eq!(first.store_factors, permuted.store_factors);
    assert_eq!(first.product_factors, permuted.product_factors);
    assert_eq!(first.densities, permuted.densities);
    assert_eq!(first.epoch, permuted.epoch);
}

#[test]
fn test_rows_preserve_input_order_and_identity() {
    let historical = daily_records(date(2016, 2, 1), 2, Partition::Historical, 0);
    let forecast = daily_records(date(2016, 2, 3), 2, Partition::Forecast, 50);
    let set = run(&historical, &forecast, &economic());
    let ids: Vec<u64> = set.rows.iter().map(|r| r.id).collect();
    let expected: Vec<u64> = historical.iter().chain(&forecast).map(|r| r.id).collect();
    assert_eq!(ids, expected);
    assert_eq!(set.historical().count(), historical.len());
    assert_eq!(set.forecast().count(), forecast.len());
}
