/// Main App and UI State Management
///
/// This module provides the eframe::App implementation. It owns the
/// controller directly: the submit handler runs inside the frame that
/// received the input, so nothing here is shared across threads.

use eframe::egui;
use crate::ui::controller::AppController;

/// Transient UI state - state that doesn't persist across sessions
#[derive(Clone, Debug, Default)]
pub struct UIState {
    /// Contents of the "Country" text box
    pub country_input: String,

    /// Dirty flag: set when a submission changed what is displayed
    pub needs_repaint: bool,
}

/// Main Application UI Structure
pub struct AppUI {
    pub controller: AppController,
    pub ui_state: UIState,
}

impl AppUI {
    /// Create a new AppUI with the text box pre-filled with the default country
    pub fn new(controller: AppController) -> Self {
        let country_input = controller.settings().default_country.clone();
        Self {
            controller,
            ui_state: UIState {
                country_input,
                needs_repaint: true,
            },
        }
    }

    /// Pass a submission to the controller.
    ///
    /// Rejections are already reflected in the controller's banner, so the
    /// error is only logged here.
    pub fn handle_submit(&mut self, text: &str) {
        if let Err(e) = self.controller.submit(text) {
            log::debug!("[UI] Submission not applied: {}", e);
        }
        self.ui_state.needs_repaint = true;
    }

    /// Render the top bar: country input plus title/error banner
    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            if let Some(text) =
                super::widgets::country_box(ui, &mut self.ui_state.country_input)
            {
                self.handle_submit(&text);
            }
            let error = self.controller.error_message();
            super::widgets::banner(ui, &self.controller.chart().title, error.as_deref());
            ui.add_space(4.0);
        });
    }

    /// Render both chart panels
    fn render_content(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            super::charts::render_panels(ui, self.controller.chart());
        });
    }
}

impl eframe::App for AppUI {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.render_top_bar(ctx);
        self.render_content(ctx);

        if self.ui_state.needs_repaint {
            ctx.request_repaint();
            self.ui_state.needs_repaint = false;
        }
    }
}
