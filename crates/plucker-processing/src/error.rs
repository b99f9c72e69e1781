//! Metadata read errors
//!
//! These never reach a client as an error status: the service folds them into
//! a `found: false` answer carrying the message.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Decode(String),

    #[error("Malformed {chunk} chunk: {reason}")]
    MalformedChunk { chunk: &'static str, reason: String },

    #[error("{0}")]
    PromptGraph(String),
}

impl From<image::ImageError> for MetadataError {
    fn from(err: image::ImageError) -> Self {
        MetadataError::Decode(err.to_string())
    }
}

impl From<serde_json::Error> for MetadataError {
    fn from(err: serde_json::Error) -> Self {
        MetadataError::PromptGraph(err.to_string())
    }
}
