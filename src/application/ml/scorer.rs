use super::coefficient_predictor::CoefficientPredictor;
use super::predictor::ClosePricePredictor;
use super::smartcore_predictor::SmartCorePredictor;
use crate::domain::errors::{LoadError, ScoringError};
use crate::domain::ml::feature_registry::FeatureVector;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which artifact shape an endpoint loads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    FullModel,
    LinearCoefficients,
}

impl std::str::FromStr for ScorerKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full_model" | "full" => Ok(ScorerKind::FullModel),
            "linear_coefficients" | "linear" | "simple" => Ok(ScorerKind::LinearCoefficients),
            _ => anyhow::bail!(
                "Invalid scorer: {}. Must be 'full_model' or 'linear_coefficients'",
                s
            ),
        }
    }
}

impl std::fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScorerKind::FullModel => f.write_str("full_model"),
            ScorerKind::LinearCoefficients => f.write_str("linear_coefficients"),
        }
    }
}

/// The loaded artifact behind an endpoint.
pub enum Scorer {
    FullModel(SmartCorePredictor),
    LinearCoefficients(CoefficientPredictor),
}

impl Scorer {
    pub fn load(kind: ScorerKind, path: &Path) -> Result<Self, LoadError> {
        match kind {
            ScorerKind::FullModel => SmartCorePredictor::from_file(path).map(Scorer::FullModel),
            ScorerKind::LinearCoefficients => {
                CoefficientPredictor::from_file(path).map(Scorer::LinearCoefficients)
            }
        }
    }

    pub fn kind(&self) -> ScorerKind {
        match self {
            Scorer::FullModel(_) => ScorerKind::FullModel,
            Scorer::LinearCoefficients(_) => ScorerKind::LinearCoefficients,
        }
    }
}

impl ClosePricePredictor for Scorer {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ScoringError> {
        match self {
            Scorer::FullModel(p) => p.predict(features),
            Scorer::LinearCoefficients(p) => p.predict(features),
        }
    }

    fn name(&self) -> &str {
        match self {
            Scorer::FullModel(p) => p.name(),
            Scorer::LinearCoefficients(p) => p.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_scorer_kind_parsing() {
        assert_eq!("full_model".parse::<ScorerKind>().unwrap(), ScorerKind::FullModel);
        assert_eq!("FULL".parse::<ScorerKind>().unwrap(), ScorerKind::FullModel);
        assert_eq!(
            "simple".parse::<ScorerKind>().unwrap(),
            ScorerKind::LinearCoefficients
        );
        assert!("svm".parse::<ScorerKind>().is_err());
        assert_eq!(ScorerKind::LinearCoefficients.to_string(), "linear_coefficients");
    }

    #[test]
    fn test_load_dispatches_on_kind() {
        let path = std::env::temp_dir().join(format!(
            "mlstockprice-scorer-{}.json",
            std::process::id()
        ));
        fs::write(&path, r#"{"coef": [1, 0, 0, 0, 0, 0], "intercept": 2.5}"#).unwrap();

        let scorer = Scorer::load(ScorerKind::LinearCoefficients, &path).unwrap();
        assert_eq!(scorer.kind(), ScorerKind::LinearCoefficients);
        let features = FeatureVector::from_values([10.0, 0.0, 0.0, 2023.0, 1.0, 1.0]);
        assert_eq!(scorer.predict(&features).unwrap(), 12.5);

        // A coefficient file is not a valid full-model artifact
        assert!(matches!(
            Scorer::load(ScorerKind::FullModel, &path),
            Err(LoadError::Decode { .. })
        ));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_full_model_variant() {
        let path = std::env::temp_dir().join(format!(
            "mlstockprice-scorer-full-{}.json",
            std::process::id()
        ));
        let model = crate::application::ml::smartcore_predictor::tests::fit_linear();
        fs::write(&path, serde_json::to_vec(&model).unwrap()).unwrap();

        let scorer = Scorer::load(ScorerKind::FullModel, &path).unwrap();
        assert_eq!(scorer.kind(), ScorerKind::FullModel);
        assert_eq!(scorer.name(), "SmartCore Linear Regression");

        let features = FeatureVector::from_values([100.0, 105.0, 98.0, 2023.0, 3.0, 15.0]);
        let pred = scorer.predict(&features).unwrap();
        assert!((pred - 101.1).abs() < 1e-3, "got {pred}");

        let _ = fs::remove_file(&path);
    }
}
