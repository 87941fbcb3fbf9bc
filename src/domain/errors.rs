use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a model artifact at startup
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read model artifact {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode model artifact {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Model artifact {path:?} has {actual} coefficients, expected {expected}")]
    Shape {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    #[error("Model artifact {path:?} has a non-finite {field}")]
    NonFinite { path: PathBuf, field: &'static str },
}

/// Errors related to malformed request or form input
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Invalid date '{input}': expected format {format}")]
    InvalidDate {
        input: String,
        format: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid {field} price '{value}': not a number")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Invalid {field} price: {value} is not a finite number")]
    NonFinite { field: &'static str, value: f64 },
}

/// Errors raised by a loaded model while scoring a feature vector
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Matrix creation failed: {0}")]
    Matrix(String),

    #[error("Prediction failed: {0}")]
    Model(String),

    #[error("No prediction returned")]
    EmptyOutput,

    #[error("Model produced a non-finite prediction: {0}")]
    NonFiniteOutput(f64),
}

/// Everything a single prediction call can fail with
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Model for endpoint '{endpoint}' is not loaded: {reason}")]
    ModelUnavailable { endpoint: String, reason: String },

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

impl PredictionError {
    /// Short machine-readable tag used in HTTP error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            PredictionError::ModelUnavailable { .. } => "model_unavailable",
            PredictionError::Input(_) => "invalid_input",
            PredictionError::Scoring(_) => "scoring_failed",
        }
    }
}

/// Errors related to the historical price CSV
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Failed to read price history: {0}")]
    Csv(#[from] csv::Error),

    #[error("Price history is missing the '{0}' column")]
    MissingColumn(&'static str),

    #[error("Row {row}: unrecognised date '{value}'")]
    InvalidDate { row: usize, value: String },

    #[error("Row {row}: invalid close price '{value}'")]
    InvalidClose { row: usize, value: String },
}

#[derive(Debug, Error)]
#[error("Invalid date format '{pattern}': {reason}")]
pub struct DateFormatError {
    pub pattern: String,
    pub reason: String,
}
