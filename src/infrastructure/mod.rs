pub mod history_csv;

pub use history_csv::{load_price_history, read_price_history};
