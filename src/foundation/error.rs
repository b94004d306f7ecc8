/// Convenience result type used across bouncer.
pub type BouncerResult<T> = Result<T, BouncerError>;

/// Top-level error taxonomy.
///
/// Only fatal conditions travel as `BouncerError` all the way to the caller. Per-frame encode and
/// write failures are folded into [`crate::ExportOutcome`] by the exporter and never abort a run.
#[derive(thiserror::Error, Debug)]
pub enum BouncerError {
    /// Bad command-line input (missing argument, rejected file extension).
    #[error("usage error: {0}")]
    Usage(String),

    /// Invalid configuration or geometry.
    #[error("validation error: {0}")]
    Validation(String),

    /// The source still image could not be read or decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The encode capability failed to open or rejected a frame.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BouncerError {
    /// Build a [`BouncerError::Usage`] value.
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// Build a [`BouncerError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BouncerError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`BouncerError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`BouncerError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error should abort the pipeline before any frame work begins.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Encode(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
