/// Convenience result type used across the crate.
pub type OverlayResult<T> = Result<T, OverlayError>;

/// Top-level error taxonomy used by overlay APIs.
#[derive(thiserror::Error, Debug)]
pub enum OverlayError {
    /// Bad simulation, blend or export settings. Rejected before any state mutation.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A simulation was stepped or rendered before `initialize`.
    #[error("not initialized: {0}")]
    NotInitialized(String),

    /// A stroke had too few points to derive a region from.
    #[error("insufficient points: {0}")]
    InsufficientPoints(String),

    /// A frame index outside `[0, frame_count)`.
    #[error("index out of range: {0}")]
    IndexOutOfRange(String),

    /// The encoding sink rejected a frame or failed to finalize.
    #[error("encoding failure: {0}")]
    EncodingFailure(String),

    /// The host scheduler asked the export to stop between frames.
    #[error("export cancelled: {0}")]
    Cancelled(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OverlayError {
    /// Build a [`OverlayError::InvalidConfiguration`] value.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Build a [`OverlayError::NotInitialized`] value.
    pub fn not_initialized(msg: impl Into<String>) -> Self {
        Self::NotInitialized(msg.into())
    }

    /// Build a [`OverlayError::InsufficientPoints`] value.
    pub fn insufficient_points(msg: impl Into<String>) -> Self {
        Self::InsufficientPoints(msg.into())
    }

    /// Build a [`OverlayError::IndexOutOfRange`] value.
    pub fn index_out_of_range(msg: impl Into<String>) -> Self {
        Self::IndexOutOfRange(msg.into())
    }

    /// Build a [`OverlayError::EncodingFailure`] value.
    pub fn encoding_failure(msg: impl Into<String>) -> Self {
        Self::EncodingFailure(msg.into())
    }

    /// Build a [`OverlayError::Cancelled`] value.
    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
