//! Plot geometry for the two-panel chart.
//!
//! Everything here is plain data: the UI layer turns a [`ChartModel`] into
//! egui_plot items every frame. Building a new model for every country means
//! nothing from a previous rendering can leak into the next one.

use crate::models::{threshold_mask, CountrySeries, CASES_THRESHOLD};
use chrono::{Datelike, Duration, NaiveDate};

/// First day of the fixed x window.
pub fn window_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default()
}

/// Last day of the fixed x window.
pub fn window_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 12, 31).unwrap_or_default()
}

/// Padding, in degrees, above and below the temperature curve.
const TEMP_PADDING: f64 = 2.0;

/// Relative padding around the case-rate panel contents.
const CASE_MARGIN: f64 = 0.05;

/// Largest day offset converted back into a date
const MAX_DAYS: f64 = 1.0e6;

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

/// Plot x coordinate of a date: days since 1970-01-01.
pub fn date_to_x(date: NaiveDate) -> f64 {
    (date - epoch()).num_days() as f64
}

/// Date at plot x coordinate, when `x` sits on a whole day.
pub fn x_to_date(x: f64) -> Option<NaiveDate> {
    let rounded = x.round();
    if !rounded.is_finite() || rounded.abs() > MAX_DAYS || (x - rounded).abs() > 1e-6 {
        return None;
    }
    epoch().checked_add_signed(Duration::days(rounded as i64))
}

/// Tick positions: the 16th of every month inside `[min_x, max_x]`.
pub fn month_ticks(min_x: f64, max_x: f64) -> Vec<f64> {
    let (Some(first), Some(last)) = (x_to_date(min_x.floor()), x_to_date(max_x.ceil())) else {
        return Vec::new();
    };
    let mut ticks = Vec::new();
    let (mut year, mut month) = (first.year(), first.month());
    while let Some(tick) = NaiveDate::from_ymd_opt(year, month, 16) {
        if tick > last {
            break;
        }
        let x = date_to_x(tick);
        if x >= min_x {
            ticks.push(x);
        }
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    ticks
}

/// Month abbreviation for a tick, empty for anything else.
pub fn month_label(x: f64) -> String {
    match x_to_date(x) {
        Some(date) if date.day() == 16 => date.format("%b").to_string(),
        _ => String::new(),
    }
}

/// Year number under the July tick, empty for anything else.
pub fn year_label(x: f64) -> String {
    match x_to_date(x) {
        Some(date) if date.month() == 7 && date.day() == 16 => date.format("%Y").to_string(),
        _ => String::new(),
    }
}

/// A stretch of the temperature line drawn in one colour.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureRun {
    /// True when the case rate at the start of every segment is at or
    /// above the threshold
    pub above: bool,
    pub points: Vec<[f64; 2]>,
}

/// Quad between the case-rate curve and the threshold for one step.
pub type FillQuad = [[f64; 2]; 4];

#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub country: String,
    pub title: String,
    pub threshold: f64,
    /// Case-rate line, split wherever a value is missing
    pub case_runs: Vec<Vec<[f64; 2]>>,
    pub above_fills: Vec<FillQuad>,
    pub below_fills: Vec<FillQuad>,
    pub temperature_runs: Vec<TemperatureRun>,
    pub mask: Vec<bool>,
    pub x_range: (f64, f64),
    pub case_range: (f64, f64),
    pub temperature_range: (f64, f64),
}

impl ChartModel {
    /// Lay out `series` for display under `country`.
    pub fn build(country: &str, series: &CountrySeries) -> Self {
        let xs: Vec<f64> = series.dates.iter().map(|d| date_to_x(*d)).collect();
        let mask = threshold_mask(&series.cases, CASES_THRESHOLD);

        ChartModel {
            country: country.to_string(),
            title: chart_title(country),
            threshold: CASES_THRESHOLD,
            case_runs: present_runs(&xs, &series.cases),
            above_fills: fill_quads(&xs, &series.cases, &mask, true),
            below_fills: fill_quads(&xs, &series.cases, &mask, false),
            temperature_runs: temperature_runs(&xs, &series.temperatures, &mask),
            mask,
            x_range: (date_to_x(window_start()), date_to_x(window_end())),
            case_range: case_range(&series.cases),
            temperature_range: temperature_range(&series.temperatures),
        }
    }

    /// Number of plotted time points
    pub fn len(&self) -> usize {
        self.mask.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }
}

pub fn chart_title(country: &str) -> String {
    format!(
        "Correlation between Temperature and New Covid Cases in {}",
        country
    )
}

/// Consecutive present points, as separate polylines.
fn present_runs(xs: &[f64], ys: &[Option<f64>]) -> Vec<Vec<[f64; 2]>> {
    let mut runs = Vec::new();
    let mut current: Vec<[f64; 2]> = Vec::new();
    for (x, y) in xs.iter().zip(ys) {
        match y {
            Some(y) => current.push([*x, *y]),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Quads for every step whose two endpoints are present and both on the
/// requested side of the threshold.
fn fill_quads(xs: &[f64], cases: &[Option<f64>], mask: &[bool], above: bool) -> Vec<FillQuad> {
    let mut quads = Vec::new();
    for i in 1..xs.len() {
        if mask[i - 1] != above || mask[i] != above {
            continue;
        }
        if let (Some(y0), Some(y1)) = (cases[i - 1], cases[i]) {
            quads.push([
                [xs[i - 1], y0],
                [xs[i], y1],
                [xs[i], CASES_THRESHOLD],
                [xs[i - 1], CASES_THRESHOLD],
            ]);
        }
    }
    quads
}

/// Split the temperature line into single-colour runs.
///
/// Segment `i -> i+1` takes the colour of `mask[i]`, so the temperature is
/// coloured by the co-occurring case-rate regime, not by its own value.
fn temperature_runs(xs: &[f64], temps: &[Option<f64>], mask: &[bool]) -> Vec<TemperatureRun> {
    let mut runs: Vec<TemperatureRun> = Vec::new();
    // index of the last point of the open run, if any
    let mut open_end: Option<usize> = None;

    for i in 1..xs.len() {
        let (Some(t0), Some(t1)) = (temps[i - 1], temps[i]) else {
            open_end = None;
            continue;
        };
        let above = mask[i - 1];
        let continues = open_end == Some(i - 1) && runs.last().is_some_and(|r| r.above == above);
        if continues {
            if let Some(run) = runs.last_mut() {
                run.points.push([xs[i], t1]);
            }
        } else {
            runs.push(TemperatureRun {
                above,
                points: vec![[xs[i - 1], t0], [xs[i], t1]],
            });
        }
        open_end = Some(i);
    }
    runs
}

fn case_range(cases: &[Option<f64>]) -> (f64, f64) {
    let (lo, hi) = cases
        .iter()
        .flatten()
        .fold((CASES_THRESHOLD, CASES_THRESHOLD), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    let span = hi - lo;
    if span > 0.0 {
        (lo - span * CASE_MARGIN, hi + span * CASE_MARGIN)
    } else {
        (lo - CASES_THRESHOLD, hi + CASES_THRESHOLD)
    }
}

fn temperature_range(temps: &[Option<f64>]) -> (f64, f64) {
    let present = temps.iter().flatten();
    let lo = present.clone().cloned().fold(f64::INFINITY, f64::min);
    let hi = present.cloned().fold(f64::NEG_INFINITY, f64::max);
    if lo.is_finite() && hi.is_finite() {
        (lo - TEMP_PADDING, hi + TEMP_PADDING)
    } else {
        (-TEMP_PADDING, TEMP_PADDING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(cases: &[Option<f64>], temps: &[Option<f64>]) -> CountrySeries {
        let start = NaiveDate::from_ymd_opt(2020, 6, 1).unwrap();
        CountrySeries {
            dates: (0..cases.len())
                .map(|i| start + Duration::days(i as i64))
                .collect(),
            cases: cases.to_vec(),
            temperatures: temps.to_vec(),
        }
    }

    #[test]
    fn test_date_round_trip_on_epoch_days() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert_eq!(date_to_x(date), 18262.0);
        assert_eq!(x_to_date(18262.0), Some(date));
        assert_eq!(x_to_date(18262.5), None);
    }

    #[test]
    fn test_fixed_window() {
        let model = ChartModel::build("Spain", &CountrySeries::default());
        assert_eq!(model.x_range.0, date_to_x(window_start()));
        assert_eq!(model.x_range.1 - model.x_range.0, 730.0);
        assert!(model.is_empty());
    }

    #[test]
    fn test_title() {
        let model = ChartModel::build("France", &CountrySeries::default());
        assert_eq!(
            model.title,
            "Correlation between Temperature and New Covid Cases in France"
        );
    }

    #[test]
    fn test_month_ticks_cover_window() {
        let ticks = month_ticks(date_to_x(window_start()), date_to_x(window_end()));
        assert_eq!(ticks.len(), 24);
        assert_eq!(month_label(ticks[0]), "Jan");
        assert_eq!(month_label(ticks[11]), "Dec");
        assert_eq!(year_label(ticks[6]), "2020");
        assert_eq!(year_label(ticks[18]), "2021");
        assert_eq!(year_label(ticks[7]), "");
    }

    #[test]
    fn test_labels_ignore_other_days() {
        let x = date_to_x(NaiveDate::from_ymd_opt(2020, 7, 1).unwrap());
        assert_eq!(month_label(x), "");
        assert_eq!(year_label(x), "");
    }

    #[test]
    fn test_fills_follow_mask() {
        let cases = [Some(0.0001), Some(0.0003), Some(0.0004), Some(0.0001), Some(0.00005)];
        let temps = [Some(10.0); 5];
        let model = ChartModel::build("Spain", &series(&cases, &temps));
        assert_eq!(model.mask, vec![false, true, true, false, false]);
        // only 1->2 is above on both ends, only 3->4 below on both ends
        assert_eq!(model.above_fills.len(), 1);
        assert_eq!(model.below_fills.len(), 1);
        assert_eq!(model.above_fills[0][2][1], CASES_THRESHOLD);
    }

    #[test]
    fn test_temperature_coloured_by_case_regime() {
        let cases = [Some(0.0001), Some(0.0003), Some(0.0003), Some(0.0001)];
        let temps = [Some(30.0), Some(-5.0), Some(0.0), Some(12.0)];
        let model = ChartModel::build("Spain", &series(&cases, &temps));
        let colours: Vec<bool> = model.temperature_runs.iter().map(|r| r.above).collect();
        assert_eq!(colours, vec![false, true]);
        assert_eq!(model.temperature_runs[0].points.len(), 2);
        assert_eq!(model.temperature_runs[1].points.len(), 3);
        assert_eq!(model.temperature_range, (-7.0, 32.0));
    }

    #[test]
    fn test_missing_values_break_lines() {
        let cases = [Some(0.0001), None, Some(0.0001), Some(0.0001)];
        let temps = [Some(1.0), Some(2.0), None, Some(3.0)];
        let model = ChartModel::build("Spain", &series(&cases, &temps));
        assert_eq!(model.case_runs.len(), 2);
        assert_eq!(model.below_fills.len(), 1);
        assert_eq!(model.temperature_runs.len(), 1);
        assert_eq!(model.temperature_runs[0].points.len(), 2);
    }

    #[test]
    fn test_case_range_includes_threshold() {
        let cases = [Some(0.00001), Some(0.00005)];
        let model = ChartModel::build("Spain", &series(&cases, &[None, None]));
        assert!(model.case_range.0 < 0.00001);
        assert!(model.case_range.1 > CASES_THRESHOLD);
        assert_eq!(model.temperature_range, (-2.0, 2.0));
    }
}
