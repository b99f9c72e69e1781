//! Request and response models shared between services and the HTTP layer.

pub mod collection;
pub mod listing;
pub mod metadata;

pub use collection::{CollectionsResponse, CreateCollectionRequest, CreateCollectionResponse};
pub use listing::{DirectoryEntry, ListingPage};
pub use metadata::MetadataResponse;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Plain confirmation body returned by delete and save.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
