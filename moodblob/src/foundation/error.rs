/// Convenience result type used across moodblob.
pub type BlobResult<T> = Result<T, BlobError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum BlobError {
    /// Invalid or missing configuration: shape, point count, offsets, colors, audio source.
    #[error("configuration error: {0}")]
    Config(String),

    /// A runtime resource could not be acquired (refresh subscription, audio tap, output files).
    #[error("resource error: {0}")]
    Resource(String),

    /// Raster-level failures while compositing a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BlobError {
    /// Build a [`BlobError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`BlobError::Resource`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build a [`BlobError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`BlobError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Message without the category prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Config(m) | Self::Resource(m) | Self::Render(m) | Self::Serde(m) => m.clone(),
            Self::Other(e) => e.to_string(),
        }
    }

    /// True for errors detected while validating configuration.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
