//! Two stacked, x-synchronized panels drawn with egui_plot.
//!
//! Temperature on top, case rate below. Both panels are pinned to the same
//! fixed x window every frame and cannot be panned or zoomed, which is what
//! keeps them aligned.

use crate::chart::{month_label, month_ticks, year_label, ChartModel};
use eframe::egui;
use egui::{Color32, Stroke};
use egui_plot::{
    AxisHints, Corner, GridInput, GridMark, HLine, Legend, Line, Plot, PlotBounds, PlotPoints,
    Polygon,
};

pub const FIREBRICK: Color32 = Color32::from_rgb(178, 34, 34);
pub const CORNFLOWER_BLUE: Color32 = Color32::from_rgb(100, 149, 237);
pub const DARK_GREEN: Color32 = Color32::from_rgb(0, 100, 0);
pub const THRESHOLD_GREY: Color32 = Color32::from_rgb(128, 128, 128);

/// 0.35 opacity, as used for the threshold fills
const FILL_ALPHA: u8 = 89;

pub const LEGEND_ABOVE: &str = "New cases above threshold";
pub const LEGEND_BELOW: &str = "New cases below threshold";

/// Spacing handed to the grid for the monthly ticks, in days
const MONTH_STEP: f64 = 30.0;

fn translucent(color: Color32) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), FILL_ALPHA)
}

fn monthly_grid(input: GridInput) -> Vec<GridMark> {
    month_ticks(input.bounds.0, input.bounds.1)
        .into_iter()
        .map(|value| GridMark {
            value,
            step_size: MONTH_STEP,
        })
        .collect()
}

/// Month row above year row, both driven by the same monthly ticks
fn date_axes() -> Vec<AxisHints> {
    vec![
        AxisHints::new_x().formatter(|mark, _max_chars, _range| month_label(mark.value)),
        AxisHints::new_x().formatter(|mark, _max_chars, _range| year_label(mark.value)),
    ]
}

/// Draw both panels into the remaining space of `ui`.
pub fn render_panels(ui: &mut egui::Ui, chart: &ChartModel) {
    let panel_height = (ui.available_height() / 2.0).max(120.0);
    ui.spacing_mut().item_spacing.y = 0.0;

    render_temperature_panel(ui, chart, panel_height);
    render_case_panel(ui, chart, panel_height);
}

fn render_temperature_panel(ui: &mut egui::Ui, chart: &ChartModel, height: f32) {
    let (x_min, x_max) = chart.x_range;
    let (y_min, y_max) = chart.temperature_range;

    Plot::new("temperature_panel")
        .height(height)
        .legend(Legend::default().position(Corner::LeftTop))
        .y_axis_label("Avg. Temperature [Celsius]")
        .x_grid_spacer(monthly_grid)
        .show_axes([false, true])
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max([x_min, y_min], [x_max, y_max]));

            for run in &chart.temperature_runs {
                let (color, name) = if run.above {
                    (FIREBRICK, LEGEND_ABOVE)
                } else {
                    (CORNFLOWER_BLUE, LEGEND_BELOW)
                };
                plot_ui.line(
                    Line::new(PlotPoints::from(run.points.clone()))
                        .color(color)
                        .width(1.5)
                        .name(name),
                );
            }

            // Both legend entries stay visible even when one regime never occurs
            plot_ui.line(Line::new(PlotPoints::new(Vec::new())).color(FIREBRICK).name(LEGEND_ABOVE));
            plot_ui.line(Line::new(PlotPoints::new(Vec::new())).color(CORNFLOWER_BLUE).name(LEGEND_BELOW));
        });
}

fn render_case_panel(ui: &mut egui::Ui, chart: &ChartModel, height: f32) {
    let (x_min, x_max) = chart.x_range;
    let (y_min, y_max) = chart.case_range;

    Plot::new("case_rate_panel")
        .height(height)
        .y_axis_label("New cases as % of Population")
        .x_grid_spacer(monthly_grid)
        .custom_x_axes(date_axes())
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max([x_min, y_min], [x_max, y_max]));

            for quad in &chart.above_fills {
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(quad.to_vec()))
                        .fill_color(translucent(FIREBRICK))
                        .stroke(Stroke::NONE),
                );
            }
            for quad in &chart.below_fills {
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(quad.to_vec()))
                        .fill_color(translucent(CORNFLOWER_BLUE))
                        .stroke(Stroke::NONE),
                );
            }

            plot_ui.hline(HLine::new(chart.threshold).color(THRESHOLD_GREY));

            for run in &chart.case_runs {
                plot_ui.line(
                    Line::new(PlotPoints::from(run.clone()))
                        .color(DARK_GREEN)
                        .width(1.5),
                );
            }
        });
}
