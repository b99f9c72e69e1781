use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use plucker_core::models::{CollectionsResponse, CreateCollectionRequest, CreateCollectionResponse};
use plucker_core::AppError;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/plucker/collections",
    tag = "collections",
    responses(
        (status = 200, description = "Collection names, sorted", body = CollectionsResponse),
        (status = 500, description = "Filesystem error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_collections"))]
pub async fn list_collections(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let collections = state.collections.list().await?;
    Ok(Json(CollectionsResponse { collections }))
}

#[utoipa::path(
    post,
    path = "/plucker/collections",
    tag = "collections",
    request_body = CreateCollectionRequest,
    responses(
        (status = 200, description = "Collection created (or already present)", body = CreateCollectionResponse),
        (status = 400, description = "Missing or unusable name", body = ErrorResponse),
        (status = 500, description = "Filesystem error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(name = ?request.name, operation = "create_collection"))]
pub async fn create_collection(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateCollectionRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let name = request
        .name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| HttpAppError(AppError::InvalidInput("No name provided".to_string())))?;

    let name = state.collections.create(&name).await?;

    Ok((
        StatusCode::OK,
        Json(CreateCollectionResponse {
            message: "Created".to_string(),
            name,
        }),
    ))
}
