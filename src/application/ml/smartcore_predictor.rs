use super::predictor::{ClosePricePredictor, finite_output};
use crate::domain::errors::{LoadError, ScoringError};
use crate::domain::ml::feature_registry::FeatureVector;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::error::Failed;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::LinearRegression;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub type LinearModel = LinearRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>;
pub type ForestModel = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// On-disk form of a full model artifact:
/// `{ "algorithm": "linear_regression", "model": { ... } }`
#[derive(Serialize, Deserialize)]
#[serde(tag = "algorithm", content = "model", rename_all = "snake_case")]
pub enum FittedRegressor {
    LinearRegression(LinearModel),
    RandomForest(ForestModel),
}

impl FittedRegressor {
    fn predict(&self, x: &DenseMatrix<f64>) -> Result<Vec<f64>, Failed> {
        match self {
            FittedRegressor::LinearRegression(model) => model.predict(x),
            FittedRegressor::RandomForest(model) => model.predict(x),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            FittedRegressor::LinearRegression(_) => "SmartCore Linear Regression",
            FittedRegressor::RandomForest(_) => "SmartCore Random Forest",
        }
    }
}

/// Full-model variant: delegates scoring to a fitted smartcore regressor.
pub struct SmartCorePredictor {
    model: FittedRegressor,
    model_path: Option<PathBuf>,
}

impl SmartCorePredictor {
    pub fn new(model: FittedRegressor) -> Self {
        Self {
            model,
            model_path: None,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let buffer = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let model: FittedRegressor =
            serde_json::from_slice(&buffer).map_err(|source| LoadError::Decode {
                path: path.to_path_buf(),
                source,
            })?;

        info!("Loaded {} from {:?}", model.label(), path);
        Ok(Self {
            model,
            model_path: Some(path.to_path_buf()),
        })
    }

    pub fn model_path(&self) -> Option<&Path> {
        self.model_path.as_deref()
    }
}

impl ClosePricePredictor for SmartCorePredictor {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ScoringError> {
        let input_matrix = DenseMatrix::from_2d_vec(&vec![features.to_vec()])
            .map_err(|e| ScoringError::Matrix(e.to_string()))?;

        let predictions = self
            .model
            .predict(&input_matrix)
            .map_err(|e| ScoringError::Model(e.to_string()))?;

        let pred = predictions.first().copied().ok_or(ScoringError::EmptyOutput)?;
        finite_output(pred)
    }

    fn name(&self) -> &str {
        self.model.label()
    }
}
