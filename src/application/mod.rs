// Model loading and scoring
pub mod ml;

// Endpoint orchestration: parse, derive, score
pub mod prediction_service;

// Desktop form state
pub mod predictor_session;
