// Model inputs and feature layout
pub mod ml;

// Prediction request/response types
pub mod prediction;

// Historical closes for chart context
pub mod history;

// Domain-specific error types
pub mod errors;
