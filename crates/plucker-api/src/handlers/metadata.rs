use crate::error::{ErrorResponse, HttpAppError, ValidatedQuery};
use crate::handlers::required_filename;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use plucker_core::models::MetadataResponse;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MetadataQuery {
    /// Virtual path of the image (or video with a PNG companion)
    #[serde(default)]
    pub filename: Option<String>,
    /// Info-store key, or `prompt_text` for the extracted prompt
    #[serde(default)]
    pub key: Option<String>,
}

#[utoipa::path(
    get,
    path = "/plucker/metadata",
    tag = "metadata",
    params(MetadataQuery),
    responses(
        (status = 200, description = "Metadata value, or found=false with a reason", body = MetadataResponse),
        (status = 400, description = "Missing filename or invalid path", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(filename = ?query.filename, key = ?query.key, operation = "get_metadata"))]
pub async fn get_metadata(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<MetadataQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let filename = required_filename(query.filename)?;
    let response = state
        .metadata
        .get(&filename, query.key.as_deref())
        .await?;
    Ok(Json(response))
}
