//! AppController: owns the dataset and what the window currently shows.
//!
//! The controller has no egui types in it, so every state transition can be
//! driven from tests exactly as the text box drives it.

use crate::chart::ChartModel;
use crate::config::Settings;
use crate::data::extract_series;
use crate::error::AppError;
use crate::models::Dataset;

/// What the window is showing
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayState {
    /// Chart for `country`, no banner
    Displaying { country: String },
    /// Banner for `invalid`, chart still showing `last_valid`
    Error { invalid: String, last_valid: String },
}

pub struct AppController {
    dataset: Dataset,
    settings: Settings,
    chart: ChartModel,
    error: Option<AppError>,
}

impl AppController {
    /// Build the controller and render the configured default country.
    pub fn new(dataset: Dataset, settings: Settings) -> Self {
        let initial = settings.default_country.clone();
        let mut controller = AppController {
            chart: ChartModel::build(&initial, &Default::default()),
            dataset,
            settings,
            error: None,
        };
        if let Err(e) = controller.submit(&initial) {
            // keep the empty chart titled with the default so the banner has context
            log::warn!("[Controller] Default country unavailable: {}", e);
            controller.chart = ChartModel::build(&initial, &Default::default());
        }
        controller
    }

    /// Handle a text-box submission.
    ///
    /// A known country replaces the chart and clears the banner. Anything else
    /// sets the banner and leaves the chart untouched.
    pub fn submit(&mut self, text: &str) -> Result<(), AppError> {
        let entry = text.trim().to_lowercase();
        let Some(display_name) = self.dataset.registry.display_name(&entry) else {
            let err = AppError::UnknownCountry(entry);
            log::info!("[Controller] Rejected entry: {}", err.user_message());
            self.error = Some(err.clone());
            return Err(err);
        };
        let display_name = display_name.to_string();

        let series = extract_series(&self.dataset, &entry, self.settings.smoothing_sigma);
        self.chart = ChartModel::build(&display_name, &series);
        self.error = None;
        log::info!(
            "[Controller] Displaying {} ({} points)",
            display_name,
            self.chart.len()
        );
        Ok(())
    }

    pub fn chart(&self) -> &ChartModel {
        &self.chart
    }

    pub fn error(&self) -> Option<&AppError> {
        self.error.as_ref()
    }

    /// Banner text, if an entry was rejected
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(AppError::user_message)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn display_state(&self) -> DisplayState {
        match &self.error {
            None => DisplayState::Displaying {
                country: self.chart.country.clone(),
            },
            Some(AppError::UnknownCountry(invalid)) => DisplayState::Error {
                invalid: invalid.clone(),
                last_valid: self.chart.country.clone(),
            },
        }
    }
}
