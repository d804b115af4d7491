//! Settings file loader and path resolution.

use crate::config::{Settings, SETTINGS_FILE};
use crate::error::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

/// Load settings from a TOML file.
pub fn load_settings_from_file(path: &Path) -> Result<Settings, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound(path.display().to_string())
        } else {
            ConfigError::IoError(e)
        }
    })?;

    let settings: Settings = toml::from_str(&content)?;
    validate_settings(&settings)?;
    Ok(settings)
}

/// Reject settings the pipeline cannot run with.
pub fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    if !(settings.smoothing_sigma.is_finite() && settings.smoothing_sigma > 0.0) {
        return Err(ConfigError::ValidationFailed(format!(
            "smoothing_sigma must be a positive number, got {}",
            settings.smoothing_sigma
        )));
    }
    if settings.dataset_path.trim().is_empty() {
        return Err(ConfigError::ValidationFailed(
            "dataset_path cannot be empty".to_string(),
        ));
    }
    if settings.default_country.trim().is_empty() {
        return Err(ConfigError::ValidationFailed(
            "default_country cannot be empty".to_string(),
        ));
    }
    if !(settings.window_width > 0.0 && settings.window_height > 0.0) {
        return Err(ConfigError::ValidationFailed(
            "window size must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Locate the dataset file.
///
/// Absolute paths are used as-is. Relative paths are tried next to the
/// running executable, then against the working directory; when neither
/// exists the working-directory form is returned so the error names it.
pub fn resolve_dataset_path(dataset_path: &str) -> PathBuf {
    let path = PathBuf::from(dataset_path);
    if path.is_absolute() {
        return path;
    }
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    resolve_relative(&path, exe_dir.as_deref())
}

fn resolve_relative(path: &Path, exe_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = exe_dir {
        let candidate = dir.join(path);
        if candidate.is_file() {
            return candidate;
        }
    }
    path.to_path_buf()
}

/// Settings loading with fallback to defaults
pub struct SettingsManager;

impl SettingsManager {
    /// Load `covid_viz.toml` from the working directory, or defaults.
    ///
    /// Runs before the logger exists, so problems go to stderr. A broken
    /// file never stops startup.
    pub fn load() -> Settings {
        Self::load_from(Path::new(SETTINGS_FILE))
    }

    pub fn load_from(path: &Path) -> Settings {
        match load_settings_from_file(path) {
            Ok(settings) => {
                eprintln!("[Config] Loaded settings from {}", path.display());
                settings
            }
            Err(ConfigError::FileNotFound(_)) => Settings::default(),
            Err(e) => {
                eprintln!(
                    "[Config] [WARNING] Failed to load {}, falling back to defaults: {}",
                    path.display(),
                    e
                );
                Settings::default()
            }
        }
    }
}
