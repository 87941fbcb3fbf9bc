use crate::domain::errors::ScoringError;
use crate::domain::ml::feature_registry::FeatureVector;

/// Interface for loaded close-price models
pub trait ClosePricePredictor: Send + Sync {
    /// Score a feature vector to a predicted close price.
    /// Implementations must be deterministic for a given artifact.
    fn predict(&self, features: &FeatureVector) -> Result<f64, ScoringError>;

    /// Get model name/type
    fn name(&self) -> &str;
}

/// Rejects NaN/inf coming out of a model
pub(crate) fn finite_output(value: f64) -> Result<f64, ScoringError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ScoringError::NonFiniteOutput(value))
    }
}
