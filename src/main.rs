use std::path::PathBuf;

use covid_temp_viz::config::{resolve_dataset_path, SettingsManager};
use covid_temp_viz::data::load_dataset;
use covid_temp_viz::ui::{AppController, AppUI};
use covid_temp_viz::LogCollector;

fn main() -> covid_temp_viz::Result<()> {
    // =========================================================================
    // SETTINGS - BEFORE LOGGING (log dir and level come from here)
    // =========================================================================
    let settings = SettingsManager::load();

    // =========================================================================
    // LOGGING INITIALIZATION
    // =========================================================================
    let log_collector = match LogCollector::new(
        PathBuf::from(&settings.log_dir),
        settings.log_level_filter(),
    ) {
        Ok(collector) => {
            eprintln!(
                "[Main] ✓ LogCollector writing to {}",
                collector.session_log_path().display()
            );
            Some(collector)
        }
        Err(e) => {
            eprintln!("[Main] WARNING: LogCollector initialization failed: {}", e);
            None
        }
    };
    if let Some(ref collector) = log_collector {
        if let Err(e) = collector.install() {
            eprintln!("[Main] WARNING: Failed to set LogCollector as global logger: {}", e);
        }
    }
    log::info!("covid_temp_viz {} starting", covid_temp_viz::VERSION);

    // =========================================================================
    // DATASET - FATAL IF MISSING
    // =========================================================================
    let dataset_path = resolve_dataset_path(&settings.dataset_path);
    let dataset = match load_dataset(&dataset_path) {
        Ok(dataset) => dataset,
        Err(e) => {
            log::error!("Cannot start: {}", e);
            if let Some(ref collector) = log_collector {
                let _ = collector.wait_for_empty();
            }
            return Err(e.into());
        }
    };

    // =========================================================================
    // LAUNCH EGUI
    // =========================================================================
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Temperature vs. New Covid Cases")
            .with_inner_size([settings.window_width, settings.window_height]),
        ..Default::default()
    };

    let controller = AppController::new(dataset, settings);
    let app_ui = AppUI::new(controller);

    let result = eframe::run_native(
        "Temperature vs. New Covid Cases",
        options,
        Box::new(move |_cc| Box::new(app_ui)),
    );

    // =========================================================================
    // SHUTDOWN
    // =========================================================================
    log::info!("Window closed, shutting down");
    if let Some(ref collector) = log_collector {
        if let Err(e) = collector.wait_for_empty() {
            eprintln!("[Main] WARNING: Failed to flush logs: {}", e);
        }
    }

    result.map_err(|e| e.into())
}
