//! Core data structures shared by the loader, extractor and chart builder.

use chrono::NaiveDate;
use std::collections::BTreeMap;

/// New cases as a fraction of population at which a day counts as "above".
pub const CASES_THRESHOLD: f64 = 0.0002;

/// Standard deviation, in time steps, of the smoothing kernel.
pub const DEFAULT_SMOOTHING_SIGMA: f64 = 2.0;

/// Country shown when the window first opens.
pub const DEFAULT_COUNTRY: &str = "Spain";

/// One dataset row: a single (country, date) observation.
///
/// Numeric fields are `None` when the source cell was empty or not a number.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    /// Lowercased country name
    pub country_name: String,
    pub new_confirmed: Option<f64>,
    pub population: Option<f64>,
    pub average_temperature_celsius: Option<f64>,
    /// Derived at load time from `new_confirmed / population`
    pub perc_new_confirmed: Option<f64>,
}

impl Observation {
    /// Build a row, deriving the case rate from the counts.
    pub fn new(
        date: NaiveDate,
        country_name: &str,
        new_confirmed: Option<f64>,
        population: Option<f64>,
        average_temperature_celsius: Option<f64>,
    ) -> Self {
        Observation {
            date,
            country_name: country_name.trim().to_lowercase(),
            new_confirmed,
            population,
            average_temperature_celsius,
            perc_new_confirmed: case_rate(new_confirmed, population),
        }
    }
}

/// `new_confirmed / population`, missing when either side is missing or the
/// population is zero.
pub fn case_rate(new_confirmed: Option<f64>, population: Option<f64>) -> Option<f64> {
    match (new_confirmed, population) {
        (Some(cases), Some(pop)) if pop != 0.0 => {
            let rate = cases / pop;
            rate.is_finite().then_some(rate)
        }
        _ => None,
    }
}

/// Known country names, keyed by their lowercase form.
///
/// The value is the spelling first seen in the file, used for titles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryRegistry {
    names: BTreeMap<String, String>,
}

impl CountryRegistry {
    /// Register a name; the first spelling seen wins.
    pub(crate) fn insert(&mut self, raw_name: &str) {
        let trimmed = raw_name.trim();
        if trimmed.is_empty() {
            return;
        }
        self.names
            .entry(trimmed.to_lowercase())
            .or_insert_with(|| trimmed.to_string());
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(&name.trim().to_lowercase())
    }

    /// Display spelling for a known country.
    pub fn display_name(&self, name: &str) -> Option<&str> {
        self.names
            .get(&name.trim().to_lowercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// The full table plus the registry derived from it.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub rows: Vec<Observation>,
    pub registry: CountryRegistry,
}

impl Dataset {
    /// Append a row in file order, registering `country` under the spelling
    /// given here.
    pub fn push(
        &mut self,
        date: NaiveDate,
        country: &str,
        new_confirmed: Option<f64>,
        population: Option<f64>,
        average_temperature_celsius: Option<f64>,
    ) {
        self.registry.insert(country);
        self.rows.push(Observation::new(
            date,
            country,
            new_confirmed,
            population,
            average_temperature_celsius,
        ));
    }

    /// Number of rows whose country matches `country` case-insensitively.
    pub fn row_count_for(&self, country: &str) -> usize {
        let key = country.trim().to_lowercase();
        self.rows.iter().filter(|r| r.country_name == key).count()
    }
}

/// Smoothed series for one country.
///
/// All three vectors always have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountrySeries {
    pub dates: Vec<NaiveDate>,
    pub cases: Vec<Option<f64>>,
    pub temperatures: Vec<Option<f64>>,
}

impl CountrySeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Which side of the threshold each case-rate point falls on.
///
/// At-or-above counts as above; missing points count as below.
pub fn threshold_mask(cases: &[Option<f64>], threshold: f64) -> Vec<bool> {
    cases
        .iter()
        .map(|value| matches!(value, Some(v) if *v >= threshold))
        .collect()
}
