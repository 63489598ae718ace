/// Convenience result type used across the blur pipeline.
pub type BlurResult<T> = Result<T, BlurError>;

/// Error taxonomy shared by the pipeline stages and renderers.
#[derive(thiserror::Error, Debug)]
pub enum BlurError {
    /// Malformed request data (empty bounds, bad sigma, mismatched buffers).
    #[error("validation error: {0}")]
    Validation(String),

    /// The renderer could not provide a surface.
    #[error("allocation error: {0}")]
    Allocation(String),

    /// Unsupported pixel config or renderer capability.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A planner or stage produced geometry it should never produce.
    #[error("invariant violation: {0}")]
    Invariant(String),

    /// Wrapped lower-level error from a renderer implementation.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BlurError {
    /// Build a [`BlurError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BlurError::Allocation`] value.
    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::Allocation(msg.into())
    }

    /// Build a [`BlurError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`BlurError::Invariant`] value.
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    /// `true` for failures that mean "the renderer could not provide a surface".
    pub fn is_allocation(&self) -> bool {
        matches!(self, Self::Allocation(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
