use super::predictor::{ClosePricePredictor, finite_output};
use crate::domain::errors::{LoadError, ScoringError};
use crate::domain::ml::feature_registry::{FEATURE_COUNT, FeatureVector};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Raw linear model exported as `{ "coef": [...], "intercept": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearCoefficients {
    pub coef: Vec<f64>,
    pub intercept: f64,
}

/// Coefficient variant: `dot(features, coef) + intercept`, no scaling.
#[derive(Debug, Clone)]
pub struct CoefficientPredictor {
    model: LinearCoefficients,
}

impl CoefficientPredictor {
    /// Validates the coefficient count against the feature layout.
    pub fn new(model: LinearCoefficients, path: &Path) -> Result<Self, LoadError> {
        if model.coef.len() != FEATURE_COUNT {
            return Err(LoadError::Shape {
                path: path.to_path_buf(),
                expected: FEATURE_COUNT,
                actual: model.coef.len(),
            });
        }
        if model.coef.iter().any(|c| !c.is_finite()) {
            return Err(LoadError::NonFinite {
                path: path.to_path_buf(),
                field: "coefficient",
            });
        }
        if !model.intercept.is_finite() {
            return Err(LoadError::NonFinite {
                path: path.to_path_buf(),
                field: "intercept",
            });
        }
        Ok(Self { model })
    }

    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model: LinearCoefficients =
            serde_json::from_str(&content).map_err(|source| LoadError::Decode {
                path: path.to_path_buf(),
                source,
            })?;

        let predictor = Self::new(model, path)?;
        info!("Loaded linear coefficients from {:?}", path);
        Ok(predictor)
    }

    pub fn coefficients(&self) -> &LinearCoefficients {
        &self.model
    }
}

impl ClosePricePredictor for CoefficientPredictor {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ScoringError> {
        let dot: f64 = features
            .as_slice()
            .iter()
            .zip(&self.model.coef)
            .map(|(x, w)| x * w)
            .sum();
        finite_output(dot + self.model.intercept)
    }

    fn name(&self) -> &str {
        "Linear Coefficients"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predictor(coef: Vec<f64>, intercept: f64) -> CoefficientPredictor {
        CoefficientPredictor::new(LinearCoefficients { coef, intercept }, Path::new("test"))
            .unwrap()
    }

    #[test]
    fn test_hand_computed_score() {
        let p = predictor(vec![0.1, 0.2, 0.1, 0.0, 0.0, 0.0], 5.0);
        let features = FeatureVector::from_values([1.0, 2.0, 3.0, 2020.0, 1.0, 15.0]);
        let result = p.predict(&features).unwrap();
        assert!((result - 5.8).abs() < 1e-9, "got {result}");
    }

    #[test]
    fn test_score_is_linear_in_features() {
        let p = predictor(vec![0.5, 0.3, 0.2, 0.01, -0.4, 0.02], 0.0);
        let base = [100.0, 105.0, 98.0, 2023.0, 3.0, 15.0];
        let doubled = base.map(|v| v * 2.0);

        let a = p.predict(&FeatureVector::from_values(base)).unwrap();
        let b = p.predict(&FeatureVector::from_values(doubled)).unwrap();
        assert!((b - 2.0 * a).abs() < 1e-9);
    }

    #[test]
    fn test_same_input_is_bit_identical() {
        let p = predictor(vec![0.5, 0.3, 0.2, 0.0, 0.0, 0.0], 1.25);
        let features = FeatureVector::from_values([100.0, 105.0, 98.0, 2023.0, 3.0, 15.0]);
        let first = p.predict(&features).unwrap();
        let second = p.predict(&features).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_wrong_coefficient_count_is_rejected() {
        let result = CoefficientPredictor::new(
            LinearCoefficients {
                coef: vec![0.1, 0.2, 0.3],
                intercept: 0.0,
            },
            Path::new("simplemodel.json"),
        );
        assert!(matches!(
            result,
            Err(LoadError::Shape {
                expected: 6,
                actual: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_non_finite_intercept_is_rejected() {
        let result = CoefficientPredictor::new(
            LinearCoefficients {
                coef: vec![0.0; 6],
                intercept: f64::NAN,
            },
            Path::new("simplemodel.json"),
        );
        assert!(matches!(
            result,
            Err(LoadError::NonFinite {
                field: "intercept",
                ..
            })
        ));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!(
            "mlstockprice-coef-{}.json",
            std::process::id()
        ));
        fs::write(
            &path,
            r#"{"coef": [0.5, 0.3, 0.2, 0, 0, 0], "intercept": 0}"#,
        )
        .unwrap();

        let p = CoefficientPredictor::from_file(&path).unwrap();
        assert_eq!(p.coefficients().coef.len(), 6);

        let _ = fs::remove_file(&path);
    }
}
