use crate::domain::history::{PriceHistory, PricePoint};
use crate::interfaces::design_system::DesignSystem;
use chrono::{Datelike, NaiveDate};
use eframe::egui;
use egui_plot::{Legend, Line, MarkerShape, Plot, Points};

/// Plot x coordinate for a calendar day
pub fn date_to_x(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

fn format_x(value: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(value.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Historical closes as a line, the latest prediction as a single marker.
pub fn render_price_chart(ui: &mut egui::Ui, history: &PriceHistory, prediction: Option<&PricePoint>) {
    let height = ui.available_height() - 20.0;
    Plot::new("close_price_chart")
        .height(height.max(300.0))
        .show_grid([true, true])
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label("Close Price")
        .x_axis_formatter(|mark, _range| format_x(mark.value))
        .show(ui, |plot_ui| {
            let actual: Vec<[f64; 2]> = history
                .points()
                .iter()
                .map(|p| [date_to_x(p.date), p.close])
                .collect();

            if !actual.is_empty() {
                plot_ui.line(
                    Line::new("Actual Close Price", actual).color(DesignSystem::SERIES_ACTUAL),
                );
            }

            if let Some(p) = prediction {
                plot_ui.points(
                    Points::new("New Prediction", vec![[date_to_x(p.date), p.close]])
                        .color(DesignSystem::SERIES_PREDICTION)
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(6.0),
                );
            }
        });
}
