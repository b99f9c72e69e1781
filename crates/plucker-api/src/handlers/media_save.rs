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
pub struct SaveQuery {
    /// Virtual path of the file to move into the Saved area
    #[serde(default)]
    pub filename: Option<String>,
    /// Optional collection under the Saved area
    #[serde(default)]
    pub collection: Option<String>,
}

#[utoipa::path(
    post,
    path = "/plucker/save",
    tag = "media",
    params(SaveQuery),
    responses(
        (status = 200, description = "File moved into the Saved area", body = MessageResponse),
        (status = 400, description = "Missing filename, invalid path or collection", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "Filesystem error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, query),
    fields(filename = ?query.filename, collection = ?query.collection, operation = "save_media")
)]
pub async fn save_media(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<SaveQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let filename = required_filename(query.filename)?;
    let outcome = state
        .files
        .save(&filename, query.collection.as_deref())
        .await?;
    Ok(Json(MessageResponse::new(outcome.message())))
}
