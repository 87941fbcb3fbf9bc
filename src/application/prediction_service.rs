use crate::application::ml::predictor::ClosePricePredictor;
use crate::application::ml::scorer::Scorer;
use crate::config::EndpointConfig;
use crate::domain::errors::{LoadError, PredictionError};
use crate::domain::ml::feature_registry::DateFormat;
use crate::domain::prediction::{Prediction, PredictionInput, PredictionRequest};
use std::sync::Arc;
use tracing::{debug, error, info};

enum ModelState {
    Ready(Arc<dyn ClosePricePredictor>),
    Unavailable(String),
}

/// One endpoint: a date format plus the artifact loaded at startup.
///
/// A failed load leaves the service in a disabled state rather than
/// aborting; every later call returns `ModelUnavailable` without scoring.
pub struct PredictionService {
    endpoint: String,
    date_format: DateFormat,
    model: ModelState,
}

impl PredictionService {
    /// Loads the endpoint's artifact, degrading to disabled on failure.
    pub fn from_config(config: &EndpointConfig) -> Self {
        match Scorer::load(config.scorer, &config.artifact) {
            Ok(scorer) => {
                info!(
                    "Endpoint '{}' ready ({}, dates as {})",
                    config.name,
                    scorer.name(),
                    config.date_format
                );
                Self::with_predictor(&config.name, config.date_format.clone(), Arc::new(scorer))
            }
            Err(e) => {
                error!("Error loading model for endpoint '{}': {}", config.name, e);
                Self::disabled(&config.name, config.date_format.clone(), &e)
            }
        }
    }

    pub fn with_predictor(
        endpoint: &str,
        date_format: DateFormat,
        predictor: Arc<dyn ClosePricePredictor>,
    ) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            date_format,
            model: ModelState::Ready(predictor),
        }
    }

    pub fn disabled(endpoint: &str, date_format: DateFormat, reason: &LoadError) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            date_format,
            model: ModelState::Unavailable(reason.to_string()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn date_format(&self) -> &DateFormat {
        &self.date_format
    }

    pub fn is_available(&self) -> bool {
        matches!(self.model, ModelState::Ready(_))
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.model {
            ModelState::Ready(_) => None,
            ModelState::Unavailable(reason) => Some(reason),
        }
    }

    pub fn model_name(&self) -> Option<&str> {
        match &self.model {
            ModelState::Ready(predictor) => Some(predictor.name()),
            ModelState::Unavailable(_) => None,
        }
    }

    /// Parses raw input with this endpoint's date format and scores it.
    pub fn predict(&self, input: &PredictionInput) -> Result<Prediction, PredictionError> {
        let predictor = self.predictor()?;
        let request = input.parse(&self.date_format)?;
        self.score(predictor, request)
    }

    pub fn predict_request(&self, request: PredictionRequest) -> Result<Prediction, PredictionError> {
        let predictor = self.predictor()?;
        self.score(predictor, request)
    }

    fn predictor(&self) -> Result<&dyn ClosePricePredictor, PredictionError> {
        match &self.model {
            ModelState::Ready(predictor) => Ok(predictor.as_ref()),
            ModelState::Unavailable(reason) => Err(PredictionError::ModelUnavailable {
                endpoint: self.endpoint.clone(),
                reason: reason.clone(),
            }),
        }
    }

    fn score(
        &self,
        predictor: &dyn ClosePricePredictor,
        request: PredictionRequest,
    ) -> Result<Prediction, PredictionError> {
        let features = request.features();
        debug!("Endpoint '{}' features: {:?}", self.endpoint, features.as_slice());

        let close = predictor.predict(&features)?;
        info!("Prediction result ({}): {}", self.endpoint, close);

        Ok(Prediction {
            request,
            features,
            close,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::coefficient_predictor::{CoefficientPredictor, LinearCoefficients};
    use crate::application::ml::scorer::ScorerKind;
    use crate::domain::errors::ScoringError;
    use crate::domain::ml::feature_registry::FeatureVector;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn linear_service(coef: Vec<f64>, intercept: f64) -> PredictionService {
        let predictor =
            CoefficientPredictor::new(LinearCoefficients { coef, intercept }, Path::new("test"))
                .unwrap();
        PredictionService::with_predictor("mlstockpricesimple", DateFormat::default(), Arc::new(predictor))
    }

    /// Counts calls so tests can prove scoring never happened
    struct CountingPredictor {
        calls: AtomicUsize,
    }

    impl ClosePricePredictor for CountingPredictor {
        fn predict(&self, _features: &FeatureVector) -> Result<f64, ScoringError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ScoringError::Model("boom".to_string()))
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    #[test]
    fn test_end_to_end_linear_prediction() {
        let service = linear_service(vec![0.5, 0.3, 0.2, 0.0, 0.0, 0.0], 0.0);
        let input = PredictionInput::new("15/03/2023", 100.0, 105.0, 98.0);

        let prediction = service.predict(&input).unwrap();
        assert_eq!(
            prediction.features.as_slice(),
            &[100.0, 105.0, 98.0, 2023.0, 3.0, 15.0]
        );
        assert!((prediction.close - 101.1).abs() < 1e-9);
    }

    #[test]
    fn test_repeat_requests_are_bit_identical() {
        let service = linear_service(vec![0.5, 0.3, 0.2, 0.001, 0.1, 0.01], 3.0);
        let input = PredictionInput::new("15/03/2023", 100.0, 105.0, 98.0);

        let first = service.predict(&input).unwrap().close;
        let second = service.predict(&input).unwrap().close;
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_missing_artifact_disables_service() {
        let config = EndpointConfig {
            name: "mlstockprice".to_string(),
            scorer: ScorerKind::FullModel,
            artifact: PathBuf::from("does/not/exist/model.json"),
            date_format: DateFormat::default(),
        };
        let service = PredictionService::from_config(&config);

        assert!(!service.is_available());
        assert!(service.unavailable_reason().unwrap().contains("model.json"));
        assert!(service.model_name().is_none());

        let err = service
            .predict(&PredictionInput::new("15/03/2023", 1.0, 1.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, PredictionError::ModelUnavailable { .. }));
    }

    #[test]
    fn test_disabled_service_checks_before_parsing() {
        let reason = LoadError::Shape {
            path: PathBuf::from("simplemodel.json"),
            expected: 6,
            actual: 2,
        };
        let service = PredictionService::disabled("mlstockpricesimple", DateFormat::default(), &reason);

        // Even malformed input reports the unavailable model
        let err = service
            .predict(&PredictionInput::new("not a date", "x", "y", "z"))
            .unwrap_err();
        assert_eq!(err.kind(), "model_unavailable");
    }

    #[test]
    fn test_bad_input_is_not_scored() {
        let counting = Arc::new(CountingPredictor {
            calls: AtomicUsize::new(0),
        });
        let service =
            PredictionService::with_predictor("mlstockprice", DateFormat::default(), counting.clone());

        let err = service
            .predict(&PredictionInput::new("15-03-2023", 1.0, 1.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, PredictionError::Input(_)));
        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_scoring_failure_is_typed() {
        let counting = Arc::new(CountingPredictor {
            calls: AtomicUsize::new(0),
        });
        let service =
            PredictionService::with_predictor("mlstockprice", DateFormat::default(), counting.clone());

        let err = service
            .predict(&PredictionInput::new("15/03/2023", 1.0, 1.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, PredictionError::Scoring(ScoringError::Model(_))));
        assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
    }
}
