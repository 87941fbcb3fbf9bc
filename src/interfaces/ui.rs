use crate::application::predictor_session::PredictorSession;
use crate::interfaces::components::price_chart::render_price_chart;
use crate::interfaces::design_system::DesignSystem;
use eframe::egui;

impl eframe::App for PredictorSession {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(DesignSystem::theme());

        // --- 1. Drain logs ---
        self.drain_logs();

        // --- 2. Top bar: title and model status ---
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Stock Price Predictor");
                ui.separator();
                ui.label(
                    egui::RichText::new(format!("Endpoint: {}", self.service.endpoint()))
                        .color(DesignSystem::TEXT_SECONDARY),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match self.service.model_name() {
                        Some(name) => ui.label(
                            egui::RichText::new(format!("● MODEL READY ({})", name))
                                .color(DesignSystem::SUCCESS)
                                .small(),
                        ),
                        None => ui.label(
                            egui::RichText::new("● MODEL NOT LOADED")
                                .color(DesignSystem::DANGER)
                                .small(),
                        ),
                    };
                });
            });
        });

        // --- 3. Bottom strip: logs ---
        egui::TopBottomPanel::bottom("log_panel")
            .resizable(true)
            .default_height(120.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for line in &self.log_lines {
                            ui.label(
                                egui::RichText::new(line)
                                    .monospace()
                                    .small()
                                    .color(DesignSystem::log_color(line)),
                            );
                        }
                    });
            });

        // --- 4. Left panel: form ---
        egui::SidePanel::left("form_panel")
            .default_width(320.0)
            .resizable(false)
            .show(ctx, |ui| {
                ui.add_space(DesignSystem::SPACING_MEDIUM);
                DesignSystem::card_frame().show(ui, |ui| {
                    render_form(self, ui);
                });
            });

        // --- 5. Central panel: chart ---
        egui::CentralPanel::default()
            .frame(DesignSystem::main_frame())
            .show(ctx, |ui| {
                ui.heading("Actual Close Price Over Time");
                if let Some(notice) = &self.chart_notice {
                    ui.label(egui::RichText::new(notice).color(DesignSystem::WARNING));
                }
                ui.add_space(DesignSystem::SPACING_SMALL);
                render_price_chart(ui, &self.history, self.last_prediction.as_ref());
            });
    }
}

fn render_form(session: &mut PredictorSession, ui: &mut egui::Ui) {
    let date_hint = session.date_placeholder();

    labeled_field(
        ui,
        &format!("Enter Date ({}):", date_hint),
        &mut session.form.date,
        &date_hint,
    );
    labeled_field(ui, "Enter Open Price:", &mut session.form.open, "0.00");
    labeled_field(ui, "Enter High Price:", &mut session.form.high, "0.00");
    labeled_field(ui, "Enter Low Price:", &mut session.form.low, "0.00");

    ui.add_space(DesignSystem::SPACING_SMALL);

    let button = egui::Button::new(egui::RichText::new("Predict Close Price").strong())
        .min_size(egui::vec2(200.0, 32.0));
    let response = ui
        .add_enabled(session.can_predict(), button)
        .on_disabled_hover_text("Model is not loaded. Check the model artifact path.");
    if response.clicked() {
        session.submit();
    }

    ui.add_space(DesignSystem::SPACING_MEDIUM);

    if !session.result_text.is_empty() {
        ui.label(
            egui::RichText::new(&session.result_text)
                .size(DesignSystem::FONT_RESULT)
                .strong()
                .color(DesignSystem::TEXT_PRIMARY),
        );
    }
    if let Some(error) = &session.error {
        ui.label(egui::RichText::new(error).color(DesignSystem::DANGER));
    }
    if let Some(reason) = session.service.unavailable_reason() {
        ui.label(
            egui::RichText::new(reason)
                .small()
                .color(DesignSystem::TEXT_MUTED),
        );
    }
}

fn labeled_field(ui: &mut egui::Ui, label: &str, value: &mut String, hint: &str) {
    ui.label(
        egui::RichText::new(label)
            .size(DesignSystem::FONT_FIELD)
            .color(DesignSystem::TEXT_SECONDARY),
    );
    ui.add(
        egui::TextEdit::singleline(value)
            .hint_text(hint)
            .font(egui::FontId::proportional(DesignSystem::FONT_FIELD))
            .desired_width(f32::INFINITY),
    );
    ui.add_space(DesignSystem::SPACING_SMALL);
}
