use crate::domain::errors::{DateFormatError, InputError};
use crate::domain::prediction::PredictionRequest;
use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

pub const FEATURE_COUNT: usize = 6;

/// Ordered list of feature names.
/// This order MUST match exactly with the column order the models were fit on.
/// Any change here is a breaking change for every model artifact.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = ["open", "high", "low", "year", "month", "day"];

/// Model input: `[open, high, low, year, month, day]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn from_request(request: &PredictionRequest) -> Self {
        Self([
            request.open,
            request.high,
            request.low,
            f64::from(request.date.year()),
            f64::from(request.date.month()),
            f64::from(request.date.day()),
        ])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Copy used to build a single-row smartcore matrix
    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }
}

/// Parses `date` with `format` and assembles the feature vector.
pub fn derive_features(
    date: &str,
    open: f64,
    high: f64,
    low: f64,
    format: &DateFormat,
) -> Result<FeatureVector, InputError> {
    let request = PredictionRequest::new(format.parse(date)?, open, high, low)?;
    Ok(request.features())
}

/// A strftime pattern that is known to carry a full calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateFormat(String);

impl DateFormat {
    pub const DEFAULT: &'static str = "%d/%m/%Y";

    pub fn new(pattern: impl Into<String>) -> Result<Self, DateFormatError> {
        let pattern = pattern.into();
        let invalid = |reason: &str| DateFormatError {
            pattern: pattern.clone(),
            reason: reason.to_string(),
        };

        if pattern.trim().is_empty() {
            return Err(invalid("pattern is empty"));
        }
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(invalid("unsupported format specifier"));
        }

        // The pattern must render and re-parse a date without losing the day, month or year
        let probe = NaiveDate::from_ymd_opt(2001, 12, 28).ok_or_else(|| invalid("probe date"))?;
        let mut rendered = String::new();
        write!(rendered, "{}", probe.format(&pattern))
            .map_err(|_| invalid("pattern cannot be rendered"))?;
        match NaiveDate::parse_from_str(&rendered, &pattern) {
            Ok(parsed) if parsed == probe => Ok(Self(pattern)),
            _ => Err(invalid("pattern must contain a day, a month and a year")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn parse(&self, input: &str) -> Result<NaiveDate, InputError> {
        NaiveDate::parse_from_str(input.trim(), &self.0).map_err(|source| InputError::InvalidDate {
            input: input.to_string(),
            format: self.0.clone(),
            source,
        })
    }

    /// Human hint for form placeholders, e.g. `DD/MM/YYYY`
    pub fn placeholder(&self) -> String {
        self.0
            .replace("%d", "DD")
            .replace("%m", "MM")
            .replace("%Y", "YYYY")
            .replace("%y", "YY")
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl std::str::FromStr for DateFormat {
    type Err = DateFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DateFormat {
    type Error = DateFormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DateFormat> for String {
    fn from(value: DateFormat) -> Self {
        value.0
    }
}

impl std::fmt::Display for DateFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
