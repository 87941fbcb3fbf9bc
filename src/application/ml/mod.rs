pub mod coefficient_predictor;
pub mod predictor;
pub mod scorer;
pub mod smartcore_predictor;
