use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Names of the collections under the Saved area, sorted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct CollectionsResponse {
    pub collections: Vec<String>,
}

/// Request DTO for creating a collection
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCollectionRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct CreateCollectionResponse {
    pub message: String,
    /// The sanitized name actually created
    pub name: String,
}
