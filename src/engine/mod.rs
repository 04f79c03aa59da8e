//! Prediction engine for the six coupled indicators

pub mod coefficients;
pub mod predict;

pub use coefficients::{CoefficientTable, Equation};
pub use predict::{PredictionEngine, DEFAULT_ROUNDS};
