//! HTTP surface for the prediction endpoints.
//!
//! `POST /predict/{endpoint}` takes `{date, open, high, low}` and answers
//! `{ "result": [close] }`. `GET /healthcheck` reports which endpoints have a
//! loaded model. Every failure, including an undecodable body, answers
//! `{ "error", "kind" }`.

use crate::application::prediction_service::PredictionService;
use crate::domain::errors::PredictionError;
use crate::domain::prediction::PredictionInput;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Loaded endpoints, shared read-only across handlers
#[derive(Clone)]
pub struct ApiState {
    endpoints: Arc<HashMap<String, Arc<PredictionService>>>,
}

impl ApiState {
    pub fn new(services: Vec<PredictionService>) -> Self {
        let endpoints = services
            .into_iter()
            .map(|s| (s.endpoint().to_string(), Arc::new(s)))
            .collect();
        Self {
            endpoints: Arc::new(endpoints),
        }
    }

    pub fn endpoint(&self, name: &str) -> Option<&Arc<PredictionService>> {
        self.endpoints.get(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub result: Vec<f64>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: &'static str,
    pub message: String,
}

impl From<PredictionError> for ApiError {
    fn from(err: PredictionError) -> Self {
        let status = match &err {
            PredictionError::ModelUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            PredictionError::Input(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PredictionError::Scoring(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message, "kind": self.kind }));
        (self.status, body).into_response()
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/predict/{endpoint}", post(predict))
        .route("/healthcheck", get(healthcheck))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn predict(
    State(state): State<ApiState>,
    Path(endpoint): Path<String>,
    body: Result<Json<PredictionInput>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let service = state.endpoint(&endpoint).ok_or_else(|| ApiError {
        status: StatusCode::NOT_FOUND,
        kind: "unknown_endpoint",
        message: format!("Unknown endpoint: {}", endpoint),
    })?;

    // An unloaded model answers 503 whatever the body holds
    if let Some(reason) = service.unavailable_reason() {
        return Err(PredictionError::ModelUnavailable {
            endpoint: endpoint.clone(),
            reason: reason.to_string(),
        }
        .into());
    }

    let Json(input) = body.map_err(|rejection| {
        warn!("Endpoint '{}' rejected body: {}", endpoint, rejection.body_text());
        ApiError {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            kind: "invalid_input",
            message: rejection.body_text(),
        }
    })?;

    match service.predict(&input) {
        Ok(prediction) => Ok(Json(PredictionResponse {
            result: vec![prediction.close],
        })),
        Err(e) => {
            warn!("Endpoint '{}' request failed: {}", endpoint, e);
            Err(e.into())
        }
    }
}

pub async fn healthcheck(State(state): State<ApiState>) -> Json<serde_json::Value> {
    let endpoints: BTreeMap<&str, bool> = state
        .endpoints
        .iter()
        .map(|(name, service)| (name.as_str(), service.is_available()))
        .collect();
    Json(json!({ "status": "ok", "endpoints": endpoints }))
}
