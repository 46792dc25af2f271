//! Error types for scene loading and simulation

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A level or mesh file did not match its positional grammar.
    #[error("{source_name}:{line}: {message}")]
    Parse {
        source_name: String,
        line: usize,
        message: String,
    },

    #[error("Missing asset: {0}")]
    MissingAsset(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Mesh error: {0}")]
    Mesh(String),
}

impl Error {
    /// Build a parse error for `line` (1-based) of `source_name`.
    pub fn parse(source_name: &str, line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            source_name: source_name.to_string(),
            line,
            message: message.into(),
        }
    }
}
