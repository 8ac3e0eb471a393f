//! # Wind Math
//!
//! Numeric building blocks for wind series forecasting.
//! This crate provides the activation functions used by the recurrent
//! forecaster and the closed-form descriptive statistics (mean, quantiles)
//! used as companion forecasts.

use thiserror::Error;

pub mod activation;
pub mod statistics;

pub use activation::{sigmoid, tanh};
pub use statistics::{mean, quantile, quantiles};

/// Errors that can occur in forecasting-related calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for wind math operations
pub type Result<T> = std::result::Result<T, MathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MathError::InsufficientData("need 2 points".to_string());
        assert_eq!(
            err.to_string(),
            "Insufficient data for calculation: need 2 points"
        );
    }
}
