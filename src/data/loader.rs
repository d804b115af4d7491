//! CSV dataset loader.
//!
//! Reads the observation table, normalizes country names and numeric cells,
//! and derives the per-capita case rate for every row.

use crate::error::DataError;
use crate::models::Dataset;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const COL_DATE: &str = "date";
pub const COL_COUNTRY: &str = "country_name";
pub const COL_NEW_CONFIRMED: &str = "new_confirmed";
pub const COL_POPULATION: &str = "population";
pub const COL_TEMPERATURE: &str = "average_temperature_celsius";

const REQUIRED_COLUMNS: [&str; 5] = [
    COL_DATE,
    COL_COUNTRY,
    COL_NEW_CONFIRMED,
    COL_POPULATION,
    COL_TEMPERATURE,
];

/// Column positions resolved from the header row
struct Columns {
    date: usize,
    country: usize,
    new_confirmed: usize,
    population: usize,
    temperature: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, DataError> {
        let map: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (normalize_header_name(name), idx))
            .collect();

        if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !map.contains_key(**c)) {
            return Err(DataError::MissingColumn(missing.to_string()));
        }
        let at = |name: &str| map[name];
        Ok(Columns {
            date: at(COL_DATE),
            country: at(COL_COUNTRY),
            new_confirmed: at(COL_NEW_CONFIRMED),
            population: at(COL_POPULATION),
            temperature: at(COL_TEMPERATURE),
        })
    }
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a BOM
    name.trim().trim_start_matches('\u{feff}').to_lowercase()
}

/// Load the dataset at `path`.
///
/// A missing file, an unreadable file or a header without the required
/// columns is an error. Bad cells inside rows are not.
pub fn load_dataset(path: &Path) -> Result<Dataset, DataError> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DataError::DatasetNotFound(path.display().to_string())
        } else {
            DataError::IoError(e)
        }
    })?;
    log::info!("[Loader] Reading dataset from {}", path.display());
    parse_dataset(file)
}

/// Parse a dataset from any CSV source.
///
/// A read failure or invalid UTF-8 anywhere in the source fails the whole
/// load. Rows with a bad date are skipped.
pub fn parse_dataset<R: Read>(source: R) -> Result<Dataset, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let columns = Columns::resolve(&headers)?;

    let mut dataset = Dataset::default();
    let mut skipped = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header, lines are 1-based
        let line = idx + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) => match e.kind() {
                // the source itself failed, what was read so far is not the dataset
                csv::ErrorKind::Io(_) | csv::ErrorKind::Utf8 { .. } => {
                    log::error!("[Loader] Line {}: dataset unreadable: {}", line, e);
                    return Err(DataError::Csv(e));
                }
                _ => {
                    log::warn!("[Loader] Line {}: skipping unreadable record: {}", line, e);
                    skipped += 1;
                    continue;
                }
            },
        };

        let raw_date = record.get(columns.date).unwrap_or("");
        let Some(date) = parse_date(raw_date) else {
            log::warn!("[Loader] Line {}: skipping row with bad date '{}'", line, raw_date);
            skipped += 1;
            continue;
        };

        let country = record.get(columns.country).unwrap_or("");
        dataset.push(
            date,
            country,
            parse_number(record.get(columns.new_confirmed)),
            parse_number(record.get(columns.population)),
            parse_number(record.get(columns.temperature)),
        );
    }

    log::info!(
        "[Loader] Loaded {} rows for {} countries ({} skipped)",
        dataset.rows.len(),
        dataset.registry.len(),
        skipped
    );
    Ok(dataset)
}

/// Calendar date from a date or timestamp cell.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts.date());
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.date_naive())
}

/// Numeric cell, or `None` for empty and non-numeric cells.
pub fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const SAMPLE: &str = "\
date,country_name,new_confirmed,population,average_temperature_celsius,extra
2020-03-01,Spain,100,47000000,12.5,x
2020-03-02,Spain,n/a,47000000,13.0,y
2020-03-01,France,50,0,8.0,z
2020-03-02,France,60,,,
";

    #[test]
    fn test_parse_sample() {
        let dataset = parse_dataset(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dataset.rows.len(), 4);
        assert_eq!(dataset.registry.len(), 2);
        assert_eq!(dataset.registry.display_name("spain"), Some("Spain"));

        let first = &dataset.rows[0];
        assert_eq!(first.country_name, "spain");
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2020, 3, 1).unwrap());
        assert_eq!(first.perc_new_confirmed, Some(100.0 / 47_000_000.0));
    }

    #[test]
    fn test_non_numeric_becomes_missing() {
        let dataset = parse_dataset(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dataset.rows[1].new_confirmed, None);
        assert_eq!(dataset.rows[1].perc_new_confirmed, None);
    }

    #[test]
    fn test_zero_or_missing_population_gives_missing_rate() {
        let dataset = parse_dataset(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dataset.rows[2].perc_new_confirmed, None);
        assert_eq!(dataset.rows[3].population, None);
        assert_eq!(dataset.rows[3].perc_new_confirmed, None);
        assert_eq!(dataset.rows[3].average_temperature_celsius, None);
    }

    #[test]
    fn test_missing_column_is_error() {
        let csv = "date,country_name,new_confirmed,population\n2020-01-01,Spain,1,2\n";
        match parse_dataset(csv.as_bytes()) {
            Err(DataError::MissingColumn(col)) => assert_eq!(col, COL_TEMPERATURE),
            other => panic!("expected missing column, got {:?}", other.map(|d| d.rows.len())),
        }
    }

    #[test]
    fn test_bad_date_row_skipped() {
        let csv = "\
date,country_name,new_confirmed,population,average_temperature_celsius
not-a-date,Spain,1,2,3
2020-01-02,Spain,1,2,3
";
        let dataset = parse_dataset(csv.as_bytes()).unwrap();
        assert_eq!(dataset.rows.len(), 1);
    }

    /// Serves `data`, then fails every read after it.
    struct FailingReader {
        data: std::io::Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(std::io::Error::new(std::io::ErrorKind::Other, "EIO")),
                n => Ok(n),
            }
        }
    }

    #[test]
    fn test_read_error_after_header_is_fatal() {
        let source = FailingReader {
            data: std::io::Cursor::new(
                b"date,country_name,new_confirmed,population,average_temperature_celsius\n\
                  2020-01-01,Spain,1,2,3\n"
                    .to_vec(),
            ),
        };
        match parse_dataset(source) {
            Err(DataError::Csv(e)) => assert!(matches!(e.kind(), csv::ErrorKind::Io(_))),
            other => panic!("expected read error, got {:?}", other.map(|d| d.rows.len())),
        }
    }

    #[test]
    fn test_invalid_utf8_is_fatal() {
        let mut csv = b"date,country_name,new_confirmed,population,average_temperature_celsius\n".to_vec();
        csv.extend_from_slice(b"2020-01-01,Espa\xf1a,1,2,3\n");
        assert!(matches!(parse_dataset(csv.as_slice()), Err(DataError::Csv(_))));
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2021, 7, 4);
        assert_eq!(parse_date("2021-07-04"), expected);
        assert_eq!(parse_date("2021/07/04"), expected);
        assert_eq!(parse_date("2021-07-04 00:00:00"), expected);
        assert_eq!(parse_date("2021-07-04T10:00:00+02:00"), expected);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(Some(" 1.5 ")), Some(1.5));
        assert_eq!(parse_number(Some("1e3")), Some(1000.0));
        assert_eq!(parse_number(Some("abc")), None);
        assert_eq!(parse_number(Some("NaN")), None);
        assert_eq!(parse_number(None), None);
    }

    #[test]
    fn test_bom_header() {
        let csv = "\u{feff}date,country_name,new_confirmed,population,average_temperature_celsius\n2020-01-01,Spain,1,2,3\n";
        assert_eq!(parse_dataset(csv.as_bytes()).unwrap().rows.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("covid_countries.csv");
        assert!(matches!(load_dataset(&path), Err(DataError::DatasetNotFound(_))));
    }

    #[test]
    fn test_load_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("covid_countries.csv");
        let mut file = File::create(&path).unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        drop(file);

        let dataset = load_dataset(&path).unwrap();
        assert_eq!(dataset.rows.len(), 4);
    }
}
