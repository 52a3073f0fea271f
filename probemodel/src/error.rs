use thiserror::Error;

use crate::model::ProbeModel;

/// Errors produced by the probe model, the scale estimator and the comparison builder
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Load factor outside [0, 1), or the unguarded λ = 0 case of double hashing success
    #[error("load factor {lambda} is outside the domain of {model}")]
    InvalidDomain { model: ProbeModel, lambda: f64 },

    /// The estimator could not produce a finite positive scale factor
    #[error("degenerate scale factor: {0}")]
    DegenerateScale(String),

    /// Invalid input parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;

impl From<String> for ModelError {
    fn from(msg: String) -> Self {
        ModelError::InvalidInput(msg)
    }
}

impl From<&str> for ModelError {
    fn from(msg: &str) -> Self {
        ModelError::InvalidInput(msg.to_string())
    }
}
