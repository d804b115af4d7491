//! Unified error type hierarchy for the viewer
//!
//! Provides structured error handling with DataError, ConfigError and AppError.

use std::io;
use thiserror::Error;

/// Dataset loading errors. All of these are fatal at startup.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Dataset file not found: {0}")]
    DatasetNotFound(String),

    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Malformed CSV in dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error while reading dataset: {0}")]
    IoError(#[from] io::Error),
}

/// Configuration file parsing and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid TOML in config: {0}")]
    InvalidToml(#[from] toml::de::Error),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("IO error during config operations: {0}")]
    IoError(#[from] io::Error),
}

/// Errors surfaced to the user inside the running window.
///
/// None of these stop the event loop; they end up in the banner above the
/// chart while the last valid rendering stays on screen.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Submitted text is not a country known to the dataset
    #[error("Unknown country: {0}")]
    UnknownCountry(String),
}

impl AppError {
    /// Get a user-facing error message suitable for UI display
    pub fn user_message(&self) -> String {
        match self {
            AppError::UnknownCountry(entry) => format!("{} is not a valid entry.", entry),
        }
    }
}

/// Top-level result type for operations that may fail.
/// Use this as the return type for startup code in `main`.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
