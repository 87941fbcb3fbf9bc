use mlstockprice::application::prediction_service::PredictionService;
use mlstockprice::application::predictor_session::PredictorSession;
use mlstockprice::config::Config;
use mlstockprice::domain::history::PriceHistory;
use mlstockprice::infrastructure::load_price_history;

use tracing::{Level, error, info};
use tracing_subscriber::prelude::*;

// A writer that sends logs to the UI via a crossbeam channel
struct ChannelWriter {
    sender: crossbeam_channel::Sender<String>,
}

impl std::io::Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let msg = String::from_utf8_lossy(buf).to_string();
        let _ = self.sender.try_send(msg);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

// Cloneable wrapper for MakeWriter
#[derive(Clone)]
struct ChannelWriterFactory {
    sender: crossbeam_channel::Sender<String>,
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for ChannelWriterFactory {
    type Writer = ChannelWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ChannelWriter {
            sender: self.sender.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    // 0. Load Env (before starting anything)
    dotenvy::dotenv().ok();

    // 1. Create Log Channel
    let (log_tx, log_rx) = crossbeam_channel::unbounded();

    // 2. Setup Logging (Stdout + UI)
    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    let ui_layer = tracing_subscriber::fmt::layer()
        .with_writer(ChannelWriterFactory { sender: log_tx })
        .with_ansi(false) // No color codes for UI text
        .with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .with(ui_layer)
        .init();

    info!("Starting Stock Price Predictor {}", env!("CARGO_PKG_VERSION"));

    // 3. Config and model (a missing model disables Predict, it does not abort)
    let config = Config::from_env()?;
    let endpoint = config.desktop_endpoint()?;
    let service = PredictionService::from_config(&endpoint);

    // 4. Historical closes for chart context
    let (history, history_error) = match load_price_history(&config.history_path) {
        Ok(history) => (history, None),
        Err(e) => {
            error!("Failed to load CSV {:?}: {}", config.history_path, e);
            (PriceHistory::default(), Some(e.to_string()))
        }
    };

    let mut session = PredictorSession::new(service, history).with_log_channel(log_rx);
    if let Some(message) = history_error {
        session = session.with_history_error(message);
    }

    // 5. Run UI (Blocks Main Thread)
    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Stock Price Predictor"),
        ..Default::default()
    };

    eframe::run_native(
        "Stock Price Predictor",
        native_options,
        Box::new(|_cc| Ok(Box::new(session))),
    )
    .map_err(|e| anyhow::anyhow!("Eframe error: {}", e))?;

    Ok(())
}
