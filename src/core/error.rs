//! Engine error taxonomy
//!
//! Configuration errors are raised synchronously at the call that caused
//! them. Numerical edge cases inside a validly initialized step are handled
//! by documented fallbacks and never surface here.

use thiserror::Error;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the colony and foraging engines.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A parameter or precondition was out of range (too few cities,
    /// zero ants, evaporation outside (0,1), unknown parameter name...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A point had a NaN or infinite coordinate.
    #[error("invalid coordinate ({x}, {y}): coordinates must be finite")]
    InvalidCoordinate { x: f64, y: f64 },

    /// A stepping or query call arrived before the matching `initialize_*`.
    #[error("not initialized: {0}")]
    NotInitialized(&'static str),

    /// A JSON configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl EngineError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        EngineError::InvalidInput(msg.into())
    }
}

#[cfg(feature = "python")]
impl From<EngineError> for pyo3::PyErr {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotInitialized(_) => {
                pyo3::exceptions::PyRuntimeError::new_err(err.to_string())
            }
            _ => pyo3::exceptions::PyValueError::new_err(err.to_string()),
        }
    }
}
