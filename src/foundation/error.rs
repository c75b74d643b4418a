/// Convenience result type used across gfxblit.
pub type GfxResult<T> = Result<T, GfxError>;

/// Top-level error taxonomy used by the fallible entry points.
///
/// Draw calls never surface these: the painter logs and skips instead.
#[derive(thiserror::Error, Debug)]
pub enum GfxError {
    /// Invalid buffer geometry (stride, length, dimensions).
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Unsupported pixel format or format pair.
    #[error("format error: {0}")]
    Format(String),

    /// Unknown or failing routine backend.
    #[error("routine backend error: {0}")]
    Plugin(String),

    /// Errors raised by the vector fallback renderer.
    #[error("fallback renderer error: {0}")]
    Fallback(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GfxError {
    /// Build a [`GfxError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`GfxError::Format`] value.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Build a [`GfxError::Plugin`] value.
    pub fn plugin(msg: impl Into<String>) -> Self {
        Self::Plugin(msg.into())
    }

    /// Build a [`GfxError::Fallback`] value.
    pub fn fallback(msg: impl Into<String>) -> Self {
        Self::Fallback(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
