/// Convenience result type used across wallart.
pub type WallArtResult<T> = Result<T, WallArtError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Region validation does not use this type; it reports a structured
/// [`crate::ValidationReport`] instead.
#[derive(thiserror::Error, Debug)]
pub enum WallArtError {
    /// Invalid caller-provided data (buffer shapes, option values).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rendering or sampling rasters.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WallArtError {
    /// Build a [`WallArtError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WallArtError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`WallArtError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for WallArtError {
    fn from(e: serde_json::Error) -> Self {
        Self::serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
