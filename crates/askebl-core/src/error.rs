use thiserror::Error;

/// Top-level error type for the AskEBL workspace.
///
/// Subsystem crates define their own error types and convert to and from
/// `AskEblError` so that `?` works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AskEblError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Knowledge base error: {0}")]
    Knowledge(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for AskEblError {
    fn from(err: toml::de::Error) -> Self {
        AskEblError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AskEblError {
    fn from(err: toml::ser::Error) -> Self {
        AskEblError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AskEblError {
    fn from(err: serde_json::Error) -> Self {
        AskEblError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for AskEBL operations.
pub type Result<T> = std::result::Result<T, AskEblError>;
