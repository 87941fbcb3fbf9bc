use crate::application::prediction_service::PredictionService;
use crate::domain::history::{PriceHistory, PricePoint};
use crate::domain::prediction::PredictionInput;
use crossbeam_channel::Receiver;
use std::collections::VecDeque;
use tracing::warn;

const MAX_LOG_LINES: usize = 200;

/// Text currently typed into the desktop form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionForm {
    pub date: String,
    pub open: String,
    pub high: String,
    pub low: String,
}

impl PredictionForm {
    pub fn to_input(&self) -> PredictionInput {
        PredictionInput::new(
            self.date.as_str(),
            self.open.as_str(),
            self.high.as_str(),
            self.low.as_str(),
        )
    }
}

/// State behind the desktop predictor window.
pub struct PredictorSession {
    pub service: PredictionService,
    pub history: PriceHistory,
    pub form: PredictionForm,

    // Results
    pub result_text: String,
    pub last_prediction: Option<PricePoint>,
    pub error: Option<String>,
    pub chart_notice: Option<String>,

    // Log strip
    log_rx: Option<Receiver<String>>,
    pub log_lines: VecDeque<String>,
}

impl PredictorSession {
    pub fn new(service: PredictionService, history: PriceHistory) -> Self {
        let chart_notice = history
            .is_empty()
            .then(|| "No data available to display actual close prices.".to_string());
        Self {
            service,
            history,
            form: PredictionForm::default(),
            result_text: String::new(),
            last_prediction: None,
            error: None,
            chart_notice,
            log_rx: None,
            log_lines: VecDeque::new(),
        }
    }

    pub fn with_log_channel(mut self, log_rx: Receiver<String>) -> Self {
        self.log_rx = Some(log_rx);
        self
    }

    /// Records why the history could not be loaded; the chart stays empty.
    pub fn with_history_error(mut self, message: impl Into<String>) -> Self {
        self.chart_notice = Some(format!("Failed to load CSV: {}", message.into()));
        self
    }

    /// The Predict control is only enabled when a model is loaded
    pub fn can_predict(&self) -> bool {
        self.service.is_available()
    }

    pub fn date_placeholder(&self) -> String {
        self.service.date_format().placeholder()
    }

    /// Handles a click on Predict.
    pub fn submit(&mut self) {
        if !self.can_predict() {
            self.error = Some(format!(
                "Model is not loaded: {}",
                self.service.unavailable_reason().unwrap_or("unknown reason")
            ));
            return;
        }

        match self.service.predict(&self.form.to_input()) {
            Ok(prediction) => {
                self.result_text = format!("Predicted Close Price: {:.2}", prediction.close);
                self.last_prediction = Some(PricePoint {
                    date: prediction.request.date,
                    close: prediction.close,
                });
                self.error = None;
            }
            Err(e) => {
                warn!("Prediction failed: {}", e);
                self.error = Some(format!("An error occurred: {}", e));
            }
        }
    }

    /// Drains pending log lines from the tracing channel
    pub fn drain_logs(&mut self) {
        let Some(rx) = &self.log_rx else {
            return;
        };
        while let Ok(msg) = rx.try_recv() {
            self.log_lines.push_back(msg.trim_end().to_string());
        }
        while self.log_lines.len() > MAX_LOG_LINES {
            self.log_lines.pop_front();
        }
    }
}
