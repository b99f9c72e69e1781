//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use plucker_core::models;

/// Returns the OpenAPI document served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Plucker API",
        version = "0.1.0",
        description = "Media browser over a fixed set of named root directories: paginated listings, save into collections, delete with companion files, and embedded generation metadata."
    ),
    paths(
        handlers::media_list::list_media,
        handlers::media_delete::delete_media,
        handlers::media_save::save_media,
        handlers::metadata::get_metadata,
        handlers::collections::list_collections,
        handlers::collections::create_collection,
    ),
    components(
        schemas(
            models::DirectoryEntry,
            models::ListingPage,
            models::MessageResponse,
            models::MetadataResponse,
            models::CollectionsResponse,
            models::CreateCollectionRequest,
            models::CreateCollectionResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "media", description = "Listing, saving and deleting media under the configured roots"),
        (name = "metadata", description = "Embedded generation metadata"),
        (name = "collections", description = "Collections under the Saved area"),
    )
)]
pub struct ApiDoc;
