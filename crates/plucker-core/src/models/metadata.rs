use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of a metadata lookup.
///
/// Absence of metadata is an ordinary answer, so both shapes are sent with a
/// success status.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(untagged)]
pub enum MetadataResponse {
    Found { metadata: String },
    Missing { found: bool, message: String },
}

impl MetadataResponse {
    pub fn found(metadata: impl Into<String>) -> Self {
        MetadataResponse::Found {
            metadata: metadata.into(),
        }
    }

    pub fn missing(message: impl Into<String>) -> Self {
        MetadataResponse::Missing {
            found: false,
            message: message.into(),
        }
    }

    pub fn metadata(&self) -> Option<&str> {
        match self {
            MetadataResponse::Found { metadata } => Some(metadata),
            MetadataResponse::Missing { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            MetadataResponse::Found { .. } => None,
            MetadataResponse::Missing { message, .. } => Some(message),
        }
    }
}
