//! End-to-end tests: CSV on disk -> dataset -> controller -> chart model.

use chrono::{Duration, NaiveDate};
use covid_temp_viz::config::Settings;
use covid_temp_viz::data::{extract_series, load_dataset};
use covid_temp_viz::ui::{AppController, DisplayState};
use covid_temp_viz::{DataError, CASES_THRESHOLD};
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SPAIN_DAYS: i64 = 60;
const FRANCE_DAYS: i64 = 45;

/// Write a two-country dataset and return its path
fn write_dataset(dir: &TempDir) -> PathBuf {
    let start = NaiveDate::from_ymd_opt(2020, 9, 1).unwrap();
    let mut csv = String::from(
        "date,country_name,new_confirmed,population,average_temperature_celsius\n",
    );
    for i in 0..SPAIN_DAYS {
        let date = start + Duration::days(i);
        // alternating spikes so the raw series is far from smooth
        let cases = if i % 2 == 0 { 20_000 } else { 2_000 };
        let temp = if i == 10 { String::new() } else { format!("{:.1}", 25.0 - i as f64 * 0.3) };
        writeln!(csv, "{},Spain,{},47000000,{}", date, cases, temp).unwrap();
    }
    for i in 0..FRANCE_DAYS {
        let date = start + Duration::days(i);
        writeln!(csv, "{},France,{},67000000,{:.1}", date, 100 + i, 15.0).unwrap();
    }
    let path = dir.path().join("covid_countries.csv");
    fs::write(&path, csv).unwrap();
    path
}

#[test]
fn test_spain_series_length_and_smoothing() {
    let dir = TempDir::new().unwrap();
    let dataset = load_dataset(&write_dataset(&dir)).unwrap();

    let series = extract_series(&dataset, "Spain", 2.0);
    assert_eq!(series.len() as i64, SPAIN_DAYS);
    assert_eq!(series.cases.len(), series.temperatures.len());

    let raw_even = 20_000.0 / 47_000_000.0;
    let interior = series.cases[30].unwrap();
    assert!((interior - raw_even).abs() > 1e-6);
    // the alternating pattern averages out to roughly the mean rate
    let mean = 11_000.0 / 47_000_000.0;
    assert!((interior - mean).abs() < 0.1 * mean);

    // the blank temperature cell was forward-filled, so nothing is missing
    assert!(series.temperatures.iter().all(Option::is_some));
}

#[test]
fn test_case_insensitive_selection() {
    let dir = TempDir::new().unwrap();
    let dataset = load_dataset(&write_dataset(&dir)).unwrap();

    let a = extract_series(&dataset, "SPAIN", 2.0);
    let b = extract_series(&dataset, "spain", 2.0);
    let c = extract_series(&dataset, "Spain", 2.0);
    assert_eq!(a, b);
    assert_eq!(b, c);
}

#[test]
fn test_rates_derived_exactly() {
    let dir = TempDir::new().unwrap();
    let dataset = load_dataset(&write_dataset(&dir)).unwrap();
    for row in &dataset.rows {
        let expected = row.new_confirmed.unwrap() / row.population.unwrap();
        assert_eq!(row.perc_new_confirmed, Some(expected));
    }
}

#[test]
fn test_narnia_then_france() {
    let dir = TempDir::new().unwrap();
    let dataset = load_dataset(&write_dataset(&dir)).unwrap();
    let mut controller = AppController::new(dataset, Settings::default());

    assert_eq!(
        controller.display_state(),
        DisplayState::Displaying {
            country: "Spain".to_string()
        }
    );
    let spain_chart = controller.chart().clone();
    assert_eq!(spain_chart.len() as i64, SPAIN_DAYS);
    assert!(spain_chart.mask.iter().any(|above| *above));

    assert!(controller.submit("Narnia").is_err());
    assert_eq!(controller.chart(), &spain_chart);
    assert_eq!(
        controller.error_message().as_deref(),
        Some("narnia is not a valid entry.")
    );

    controller.submit("France").unwrap();
    assert!(controller.error_message().is_none());
    let france = controller.chart();
    assert_eq!(france.country, "France");
    assert_eq!(france.len() as i64, FRANCE_DAYS);
    assert!(france.above_fills.is_empty());
    assert!(france.case_range.1 >= CASES_THRESHOLD);
    assert!(france.title.ends_with("in France"));
}

#[test]
fn test_missing_dataset_is_fatal() {
    let dir = TempDir::new().unwrap();
    let result = load_dataset(&dir.path().join("nope.csv"));
    assert!(matches!(result, Err(DataError::DatasetNotFound(_))));
}
