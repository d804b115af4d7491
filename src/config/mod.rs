//! Configuration module for the viewer.
//!
//! # Module Structure
//!
//! - `loader`: reads `covid_viz.toml`, validates it and resolves paths
//!
//! # Settings Management
//!
//! `Settings` is read once at startup. Every field has a default, so a missing
//! file or a file naming only some keys is fine. The case-rate threshold is a
//! fixed policy constant and deliberately has no key here.

pub mod loader;

use crate::models::{DEFAULT_COUNTRY, DEFAULT_SMOOTHING_SIGMA};

pub use loader::{load_settings_from_file, resolve_dataset_path, SettingsManager};

/// Name of the optional settings file in the working directory
pub const SETTINGS_FILE: &str = "covid_viz.toml";

/// Application settings
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    /// CSV dataset; relative paths are looked up next to the executable first
    pub dataset_path: String,
    /// Country shown when the window opens
    pub default_country: String,
    /// Gaussian standard deviation in time steps
    pub smoothing_sigma: f64,

    // Logging
    pub log_dir: String,
    /// One of error, warn, info, debug, trace
    pub log_level: String,

    // Window
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            dataset_path: "covid_countries.csv".to_string(),
            default_country: DEFAULT_COUNTRY.to_string(),
            smoothing_sigma: DEFAULT_SMOOTHING_SIGMA,
            log_dir: "logs".to_string(),
            log_level: "info".to_string(),
            window_width: 1200.0,
            window_height: 800.0,
        }
    }
}

impl Settings {
    /// Parsed log level, `Info` for anything unrecognised
    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level
            .trim()
            .parse::<log::LevelFilter>()
            .unwrap_or(log::LevelFilter::Info)
    }
}
