use crate::domain::errors::InputError;
use crate::domain::ml::feature_registry::{DateFormat, FeatureVector};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A price as it arrives from JSON or a text field.
///
/// JSON clients usually send numbers, the desktop form always sends text.
/// Both are coerced to `f64` before scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceField {
    Number(f64),
    Text(String),
}

impl PriceField {
    pub fn coerce(&self, field: &'static str) -> Result<f64, InputError> {
        let value = match self {
            PriceField::Number(v) => *v,
            PriceField::Text(s) => {
                s.trim()
                    .parse::<f64>()
                    .map_err(|_| InputError::InvalidNumber {
                        field,
                        value: s.clone(),
                    })?
            }
        };
        ensure_finite(field, value)
    }
}

impl From<f64> for PriceField {
    fn from(value: f64) -> Self {
        PriceField::Number(value)
    }
}

impl From<&str> for PriceField {
    fn from(value: &str) -> Self {
        PriceField::Text(value.to_string())
    }
}

impl From<String> for PriceField {
    fn from(value: String) -> Self {
        PriceField::Text(value)
    }
}

/// Raw prediction input: `{ "date": ..., "open": ..., "high": ..., "low": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    pub date: String,
    pub open: PriceField,
    pub high: PriceField,
    pub low: PriceField,
}

impl PredictionInput {
    pub fn new(
        date: impl Into<String>,
        open: impl Into<PriceField>,
        high: impl Into<PriceField>,
        low: impl Into<PriceField>,
    ) -> Self {
        Self {
            date: date.into(),
            open: open.into(),
            high: high.into(),
            low: low.into(),
        }
    }

    pub fn parse(&self, format: &DateFormat) -> Result<PredictionRequest, InputError> {
        let date = format.parse(&self.date)?;
        PredictionRequest::new(
            date,
            self.open.coerce("open")?,
            self.high.coerce("high")?,
            self.low.coerce("low")?,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionRequest {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
}

impl PredictionRequest {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64) -> Result<Self, InputError> {
        Ok(Self {
            date,
            open: ensure_finite("open", open)?,
            high: ensure_finite("high", high)?,
            low: ensure_finite("low", low)?,
        })
    }

    pub fn features(&self) -> FeatureVector {
        FeatureVector::from_request(self)
    }
}

/// A scored request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub request: PredictionRequest,
    pub features: FeatureVector,
    pub close: f64,
}

fn ensure_finite(field: &'static str, value: f64) -> Result<f64, InputError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InputError::NonFinite { field, value })
    }
}
