/// Convenience result type used across renderproc.
pub type RenderProcResult<T> = Result<T, RenderProcError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Only load-time conditions are represented here. A step that cannot be dispatched while a
/// frame executes is an internal consistency fault and panics instead.
#[derive(thiserror::Error, Debug)]
pub enum RenderProcError {
    /// Invalid renderer configuration content (unknown step type, malformed field, ...).
    #[error("configuration error: {0}")]
    Config(String),

    /// The configuration document could not be parsed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Reading the configuration file failed after it was opened.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The uniform manager rejected the `uniformBuffers` section.
    #[error("collaborator error: {0}")]
    Collaborator(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RenderProcError {
    /// Build a [`RenderProcError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`RenderProcError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`RenderProcError::Collaborator`] value.
    pub fn collaborator(msg: impl Into<String>) -> Self {
        Self::Collaborator(msg.into())
    }

    /// Build a configuration error for the render step at `index`.
    pub fn step(index: usize, ty: &str, msg: impl std::fmt::Display) -> Self {
        Self::Config(format!("render step #{index} ('{ty}'): {msg}"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
