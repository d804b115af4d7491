/// Custom egui widgets
///
/// - country_box: labelled single-line input that reports a submission
/// - banner: title line that doubles as the red error message

use eframe::egui;
use egui::{Color32, RichText};

/// Red used for rejected entries
pub const ERROR_RED: Color32 = Color32::from_rgb(255, 100, 100);

/// Labelled "Country" text field.
///
/// Returns the submitted text when the user presses Enter inside the field
/// or clicks "Show".
pub fn country_box(ui: &mut egui::Ui, text: &mut String) -> Option<String> {
    ui.horizontal(|ui| {
        ui.label("Country");
        let response = ui.add(
            egui::TextEdit::singleline(text)
                .desired_width(180.0)
                .hint_text("e.g. Spain"),
        );
        let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        let clicked = ui.button("Show").clicked();
        (entered || clicked).then(|| text.clone())
    })
    .inner
}

/// Centered chart title with an optional error line beneath it.
pub fn banner(ui: &mut egui::Ui, title: &str, error: Option<&str>) {
    ui.vertical_centered(|ui| {
        ui.heading(title);
        if let Some(msg) = error {
            ui.label(RichText::new(msg).color(ERROR_RED).strong());
        }
    });
}
