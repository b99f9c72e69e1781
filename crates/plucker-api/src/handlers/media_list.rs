use crate::error::{ErrorResponse, HttpAppError, ValidatedQuery};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use plucker_core::models::ListingPage;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Virtual directory to list; empty lists the roots
    #[serde(default)]
    pub subdir: Option<String>,
    /// Files to skip (negative values count as 0)
    #[serde(default)]
    pub offset: Option<i64>,
    /// Files to return, capped at the configured maximum (0 returns none)
    #[serde(default)]
    pub limit: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/plucker/media-list",
    tag = "media",
    params(ListQuery),
    responses(
        (status = 200, description = "Directories and one page of files", body = ListingPage),
        (status = 400, description = "Invalid path", body = ErrorResponse),
        (status = 404, description = "Directory not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, query),
    fields(subdir = ?query.subdir, offset = ?query.offset, limit = ?query.limit, operation = "list_media")
)]
pub async fn list_media(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<ListQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let offset = query.offset.unwrap_or(0).max(0) as usize;
    let limit = state
        .config
        .page_size(query.limit.map(|l| usize::try_from(l).unwrap_or(0)));

    let page = state
        .listing
        .list(query.subdir.as_deref(), offset, limit)
        .await?;

    Ok(Json(page))
}
