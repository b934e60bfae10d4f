use thiserror::Error;

/// Errors from the optimization engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Malformed or mismatched-shape input. No computation was performed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced covariance id does not match the stored slot.
    #[error("Covariance matrix not found: {0}")]
    NotFound(String),

    /// The ridge-regularized matrix still has no usable pivot.
    #[error("Matrix is singular and cannot be inverted")]
    SingularMatrix,
}

impl EngineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
