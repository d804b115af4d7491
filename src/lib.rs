//! Temperature vs. new COVID-19 cases viewer
//!
//! Loads a per-country daily table of new cases, population and average
//! temperature, smooths one country's case rate and temperature with a
//! Gaussian filter and shows them as two stacked panels in an egui window.
//!
//! The system is organized into functional modules:
//! - **error**: Unified error type hierarchy
//! - **models**: Core data structures, fixed threshold and defaults
//! - **data**: CSV loading, per-country extraction, smoothing
//! - **chart**: Plot geometry (threshold fills, coloured runs, date ticks)
//! - **config**: Settings file loading
//! - **ui**: Controller and egui frontend
//! - **log_collector**: Background log writer wired into the `log` crate

// Core foundational modules
pub mod error;
pub mod models;

// Data pipeline
pub mod data;
pub mod chart;

pub mod config;

pub mod ui;

// Decoupled logging system
pub mod log_collector;

// Re-export the log crate for macro usage
pub use log;

pub use log_collector::{LogCollector, LogLine};

// ============================================================================
// PUBLIC RE-EXPORTS FOR CONVENIENCE
// ============================================================================

pub use error::{AppError, ConfigError, DataError, Result};

pub use models::{
    case_rate, threshold_mask, CountryRegistry, CountrySeries, Dataset, Observation,
    CASES_THRESHOLD, DEFAULT_COUNTRY, DEFAULT_SMOOTHING_SIGMA,
};

pub use data::{extract_series, forward_fill, gaussian_filter1d, load_dataset, parse_dataset};

pub use chart::ChartModel;

pub use config::{Settings, SettingsManager};

pub use ui::{AppController, AppUI, DisplayState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
