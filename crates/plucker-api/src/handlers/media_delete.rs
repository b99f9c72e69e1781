use crate::error::{ErrorResponse, HttpAppError, ValidatedQuery};
use crate::handlers::required_filename;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use plucker_core::models::MessageResponse;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteQuery {
    /// Virtual path of the file to delete
    #[serde(default)]
    pub filename: Option<String>,
}

#[utoipa::path(
    delete,
    path = "/plucker/delete",
    tag = "media",
    params(DeleteQuery),
    responses(
        (status = 200, description = "File and its companion deleted", body = MessageResponse),
        (status = 400, description = "Missing filename or invalid path", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "Filesystem error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(filename = ?query.filename, operation = "delete_media"))]
pub async fn delete_media(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<DeleteQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let filename = required_filename(query.filename)?;
    let message = state.files.delete(&filename).await?;
    Ok(Json(MessageResponse::new(message)))
}
