//! Per-country series extraction.
//!
//! Selects one country's rows, fills gaps forward in date order and smooths
//! the case-rate and temperature columns.

use crate::data::smoothing::gaussian_filter1d;
use crate::models::{CountrySeries, Dataset, Observation};

/// Replace each missing value with the closest earlier present value.
///
/// Leading missing values have nothing to copy from and stay missing.
pub fn forward_fill(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut last = None;
    values
        .iter()
        .map(|value| {
            if value.is_some() {
                last = *value;
            }
            last
        })
        .collect()
}

/// Rows for `country` (case-insensitive), stable-sorted by date.
pub fn country_rows<'a>(dataset: &'a Dataset, country: &str) -> Vec<&'a Observation> {
    let key = country.trim().to_lowercase();
    let mut rows: Vec<&Observation> = dataset
        .rows
        .iter()
        .filter(|row| row.country_name == key)
        .collect();
    rows.sort_by_key(|row| row.date);
    rows
}

/// Forward-filled copies of the numeric columns of `rows`.
///
/// The case rate is filled as its own column; it is not re-derived from the
/// filled counts.
pub fn fill_rows(rows: &[&Observation]) -> Vec<Observation> {
    let column = |get: fn(&Observation) -> Option<f64>| -> Vec<Option<f64>> {
        forward_fill(&rows.iter().map(|row| get(row)).collect::<Vec<_>>())
    };
    let new_confirmed = column(|r| r.new_confirmed);
    let population = column(|r| r.population);
    let temperatures = column(|r| r.average_temperature_celsius);
    let rates = column(|r| r.perc_new_confirmed);

    rows.iter()
        .enumerate()
        .map(|(i, row)| Observation {
            date: row.date,
            country_name: row.country_name.clone(),
            new_confirmed: new_confirmed[i],
            population: population[i],
            average_temperature_celsius: temperatures[i],
            perc_new_confirmed: rates[i],
        })
        .collect()
}

/// Dates plus smoothed case rates and temperatures for one country.
///
/// An unknown country yields an empty series.
pub fn extract_series(dataset: &Dataset, country: &str, sigma: f64) -> CountrySeries {
    let rows = country_rows(dataset, country);
    if rows.is_empty() {
        log::debug!("[Extract] No rows for '{}'", country);
        return CountrySeries::default();
    }
    let filled = fill_rows(&rows);

    let rates: Vec<Option<f64>> = filled.iter().map(|r| r.perc_new_confirmed).collect();
    let temperatures: Vec<Option<f64>> = filled
        .iter()
        .map(|r| r.average_temperature_celsius)
        .collect();

    let series = CountrySeries {
        dates: filled.iter().map(|r| r.date).collect(),
        cases: gaussian_filter1d(&rates, sigma),
        temperatures: gaussian_filter1d(&temperatures, sigma),
    };
    log::debug!(
        "[Extract] '{}': {} rows, sigma={}",
        country,
        series.len(),
        sigma
    );
    series
}
