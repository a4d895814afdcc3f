use std::io;

use thiserror::Error;

/// Errors raised while building or decoding the data shared between screens.
#[derive(Debug, Error)]
pub enum SharedError {
    #[error("invalid derivation path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
    #[error("invalid device state '{value}': {reason}")]
    InvalidState { value: String, reason: String },
    #[error("extra '{key}' could not be encoded: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("extra '{key}' could not be decoded: {source}")]
    Decode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("device transport error: {0}")]
    Transport(String),
    #[error("{0}")]
    Interaction(String),
}

impl SharedError {
    pub(crate) fn invalid_path(path: &str, reason: impl Into<String>) -> Self {
        SharedError::InvalidPath {
            path: path.to_owned(),
            reason: reason.into(),
        }
    }
}

impl From<io::Error> for SharedError {
    fn from(value: io::Error) -> Self {
        SharedError::Transport(value.to_string())
    }
}
