use crate::schema::validate::SchemaErrors;

/// Convenience result type used across reelgen.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by library APIs.
///
/// Per-scene content problems are not represented here: they are [`crate::DispatchError`]
/// values collected on the compiled timeline, so one bad scene never aborts a video.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// The video definition violates the structural contract.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaErrors),

    /// Chart layout received input it cannot place.
    #[error("layout error: {0}")]
    Layout(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Invalid configuration file or override.
    #[error("config error: {0}")]
    Config(String),

    /// The external renderer failed; `hint` is meant for humans.
    #[error("render error: {message} (hint: {hint})")]
    Render { message: String, hint: String },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn render(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
            hint: hint.into(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
