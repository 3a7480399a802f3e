//! Integration tests for dataset loading and the reload-on-change cache.

use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, SystemTime};
use stickers_data::{DataError, DatasetHandle, Partition, SourcePaths};
use tempfile::TempDir;

const TRAIN: &str = "id,date,country,store,product,num_sold\n\
    0,2015-01-01,Finland,Discount Stickers,Kaggle,100\n\
    1,2015-01-01,Kenya,Discount Stickers,Kaggle,\n";

const TEST: &str = "id,date,country,store,product\n\
    2,2016-01-01,Finland,Discount Stickers,Kaggle\n\
    3,2016-01-01,Kenya,Discount Stickers,Kaggle\n";

const GDP: &str = "country,2015,2016\nFinland,42784.0,43784.0\nKenya,1464.0,1525.0\n";

fn write(path: &Path, contents: &str) {
    fs::write(path, contents).unwrap();
}

fn fixture() -> (TempDir, SourcePaths) {
    let dir = TempDir::new().unwrap();
    let paths = SourcePaths::new(
        dir.path().join("train.csv"),
        dir.path().join("test.csv"),
        dir.path().join("gdp.csv"),
    );
    write(&paths.historical, TRAIN);
    write(&paths.forecast, TEST);
    write(&paths.economic, GDP);
    (dir, paths)
}

fn touch_later(path: &Path) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(60))
        .unwrap();
}

#[test]
fn test_load_dataset() {
    let (_dir, paths) = fixture();
    let mut handle = DatasetHandle::open(paths).unwrap();
    let dataset = handle.get().unwrap();

    assert_eq!(dataset.records.len(), 4);
    assert_eq!(dataset.historical().count(), 2);
    assert_eq!(dataset.forecast().count(), 2);
    assert!(dataset
        .forecast()
        .all(|r| r.partition == Partition::Forecast && r.quantity.is_none()));
    assert_eq!(dataset.roster.countries, vec!["Finland", "Kenya"]);
    assert_eq!(dataset.roster.years, vec![2015, 2016]);
    assert_eq!(dataset.economic.lookup("Kenya", 2016), Some(1525.0));
    assert_eq!(handle.load_count(), 1);
}

#[test]
fn test_unchanged_files_are_not_reloaded() {
    let (_dir, paths) = fixture();
    let mut handle = DatasetHandle::open(paths).unwrap();
    assert!(!handle.is_stale().unwrap());
    handle.get().unwrap();
    handle.get().unwrap();
    assert_eq!(handle.load_count(), 1);
}

#[test]
fn test_changed_file_triggers_reload() {
    let (_dir, paths) = fixture();
    let mut handle = DatasetHandle::open(paths.clone()).unwrap();

    write(
        &paths.economic,
        "country,2015,2016\nFinland,1.0,2.0\nKenya,3.0,4.0\n",
    );
    touch_later(&paths.economic);

    assert!(handle.is_stale().unwrap());
    let dataset = handle.get().unwrap();
    assert_eq!(dataset.economic.lookup("Finland", 2015), Some(1.0));
    assert_eq!(handle.load_count(), 2);
    assert!(!handle.is_stale().unwrap());
}

#[test]
fn test_invalidate_forces_reload() {
    let (_dir, paths) = fixture();
    let mut handle = DatasetHandle::open(paths).unwrap();
    handle.invalidate();
    assert!(handle.is_stale().unwrap());
    handle.get().unwrap();
    assert_eq!(handle.load_count(), 2);
}

#[test]
fn test_failed_reload_keeps_previous_dataset() {
    let (_dir, paths) = fixture();
    let mut handle = DatasetHandle::open(paths.clone()).unwrap();

    write(&paths.economic, "country,2015,2016\nFinland,1.0,2.0\n");
    touch_later(&paths.economic);

    let err = handle.get().unwrap_err();
    assert!(matches!(err, DataError::TableShape { axis: "rows", .. }));
    assert!(handle.is_stale().unwrap());
    assert_eq!(handle.load_count(), 1);
}

#[test]
fn test_explicit_roster_rejects_unknown_country() {
    let (dir, paths) = fixture();
    let roster_path = dir.path().join("roster.json");
    write(
        &roster_path,
        r#"{"countries":["Finland"],"stores":["Discount Stickers"],"products":["Kaggle"]}"#,
    );

    let err = DatasetHandle::open(paths.with_roster(roster_path)).unwrap_err();
    assert!(matches!(err, DataError::NotInRoster { id: 1, .. }));
}

#[test]
fn test_missing_file_is_io_error() {
    let (_dir, mut paths) = fixture();
    paths.forecast = paths.forecast.with_file_name("absent.csv");
    assert!(matches!(
        DatasetHandle::open(paths),
        Err(DataError::Io(_))
    ));
}

#[test]
fn test_table_ending_before_forecast_years_loads() {
    let (_dir, paths) = fixture();
    write(&paths.economic, "country,2015\nFinland,42784.0\nKenya,1464.0\n");

    let mut handle = DatasetHandle::open(paths).unwrap();
    let dataset = handle.get().unwrap();
    assert_eq!(dataset.roster.years, vec![2015]);
    assert_eq!(dataset.forecast().count(), 2);
    assert!(
        dataset
            .forecast()
            .all(|r| dataset.economic.lookup(&r.country, r.year()).is_none())
    );
}

#[test]
fn test_explicit_roster_years_do_not_restrict_records() {
    let (dir, paths) = fixture();
    write(&paths.economic, "country,2015\nFinland,42784.0\nKenya,1464.0\n");
    let roster_path = dir.path().join("roster.json");
    write(
        &roster_path,
        r#"{"countries":["Finland","Kenya"],"stores":["Discount Stickers"],"products":["Kaggle"],"years":[2015]}"#,
    );

    let mut handle = DatasetHandle::open(paths.with_roster(roster_path)).unwrap();
    let dataset = handle.get().unwrap();
    assert_eq!(dataset.records.len(), 4);
    assert_eq!(dataset.economic.lookup("Kenya", 2016), None);
}

#[test]
fn test_repeated_country_row_is_rejected() {
    let (_dir, paths) = fixture();
    write(
        &paths.economic,
        "country,2015,2016\nKenya,1.0,2.0\nKenya,3.0,4.0\n",
    );
    assert!(matches!(
        DatasetHandle::open(paths),
        Err(DataError::DuplicateLabel { axis: "country", .. })
    ));
}
