mod common;

use mlstockprice::application::ml::scorer::ScorerKind;
use mlstockprice::application::prediction_service::PredictionService;
use mlstockprice::config::{Config, EndpointConfig};
use mlstockprice::domain::errors::PredictionError;
use mlstockprice::domain::ml::feature_registry::DateFormat;
use mlstockprice::domain::prediction::PredictionInput;
use std::path::PathBuf;

fn simple_endpoint(artifact: PathBuf, format: &str) -> EndpointConfig {
    EndpointConfig {
        name: "mlstockpricesimple".to_string(),
        scorer: ScorerKind::LinearCoefficients,
        artifact,
        date_format: DateFormat::new(format).unwrap(),
    }
}

#[test]
fn test_simple_model_end_to_end() {
    let artifact = common::write_temp(
        "simplemodel.json",
        r#"{"coef": [0.5, 0.3, 0.2, 0.0, 0.0, 0.0], "intercept": 0.0}"#,
    );
    let service = PredictionService::from_config(&simple_endpoint(artifact.clone(), "%d/%m/%Y"));
    assert!(service.is_available());

    let input = PredictionInput::new("15/03/2023", 100.0, 105.0, 98.0);
    let prediction = service.predict(&input).unwrap();

    assert_eq!(
        prediction.features.as_slice(),
        &[100.0, 105.0, 98.0, 2023.0, 3.0, 15.0]
    );
    assert!((prediction.close - 101.1).abs() < 1e-9);

    // Same request against the same artifact is bit-identical
    let again = service.predict(&input).unwrap();
    assert_eq!(prediction.close.to_bits(), again.close.to_bits());

    let _ = std::fs::remove_file(artifact);
}

#[test]
fn test_date_format_is_per_endpoint() {
    let artifact = common::write_temp(
        "simplemodel.json",
        r#"{"coef": [1.0, 0.0, 0.0, 0.0, 0.0, 0.0], "intercept": 0.0}"#,
    );
    let slash = PredictionService::from_config(&simple_endpoint(artifact.clone(), "%d/%m/%Y"));
    let dash = PredictionService::from_config(&simple_endpoint(artifact.clone(), "%d-%m-%Y"));

    let slash_input = PredictionInput::new("15/03/2023", 1.0, 1.0, 1.0);
    let dash_input = PredictionInput::new("15-03-2023", 1.0, 1.0, 1.0);

    assert!(slash.predict(&slash_input).is_ok());
    assert!(matches!(
        slash.predict(&dash_input),
        Err(PredictionError::Input(_))
    ));
    assert!(dash.predict(&dash_input).is_ok());
    assert!(matches!(
        dash.predict(&slash_input),
        Err(PredictionError::Input(_))
    ));

    let _ = std::fs::remove_file(artifact);
}

#[test]
fn test_each_failure_class_is_distinct() {
    // Load failure: coefficient count does not match the feature layout
    let bad_artifact = common::write_temp(
        "short.json",
        r#"{"coef": [0.5, 0.3], "intercept": 0.0}"#,
    );
    let disabled = PredictionService::from_config(&simple_endpoint(bad_artifact.clone(), "%d/%m/%Y"));
    let err = disabled
        .predict(&PredictionInput::new("15/03/2023", 1.0, 1.0, 1.0))
        .unwrap_err();
    assert_eq!(err.kind(), "model_unavailable");

    // Parse failure
    let artifact = common::write_temp(
        "simplemodel.json",
        r#"{"coef": [0.5, 0.3, 0.2, 0.0, 0.0, 0.0], "intercept": 0.0}"#,
    );
    let service = PredictionService::from_config(&simple_endpoint(artifact.clone(), "%d/%m/%Y"));
    let err = service
        .predict(&PredictionInput::new("", 1.0, 1.0, 1.0))
        .unwrap_err();
    assert_eq!(err.kind(), "invalid_input");

    // Scoring failure: a huge coefficient overflows to infinity
    let overflow = common::write_temp(
        "overflow.json",
        r#"{"coef": [1e308, 1e308, 0.0, 0.0, 0.0, 0.0], "intercept": 0.0}"#,
    );
    let service = PredictionService::from_config(&simple_endpoint(overflow.clone(), "%d/%m/%Y"));
    let err = service
        .predict(&PredictionInput::new("15/03/2023", 10.0, 10.0, 1.0))
        .unwrap_err();
    assert_eq!(err.kind(), "scoring_failed");

    for path in [bad_artifact, artifact, overflow] {
        let _ = std::fs::remove_file(path);
    }
}

#[test]
fn test_descriptor_driven_endpoints() {
    let artifact = common::write_temp(
        "simplemodel.json",
        r#"{"coef": [0.5, 0.3, 0.2, 0.0, 0.0, 0.0], "intercept": 0.0}"#,
    );
    let descriptor = format!(
        r#"
[desktop]
endpoint = "mlstockpricesimple"

[[endpoint]]
name = "mlstockprice"
scorer = "full_model"
artifact = "definitely/missing/model.json"

[[endpoint]]
name = "mlstockpricesimple"
scorer = "linear_coefficients"
artifact = {:?}
"#,
        artifact.to_string_lossy()
    );

    let config = Config::from_toml_str(&descriptor).unwrap();
    let services: Vec<PredictionService> = config
        .endpoints
        .iter()
        .map(PredictionService::from_config)
        .collect();

    assert!(!services[0].is_available());
    assert!(services[1].is_available());

    let _ = std::fs::remove_file(artifact);
}
