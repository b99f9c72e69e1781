pub mod collections;
pub mod media_delete;
pub mod media_list;
pub mod media_save;
pub mod metadata;

use crate::error::HttpAppError;
use plucker_core::AppError;

/// The `filename` query parameter, required and non-empty.
pub(crate) fn required_filename(filename: Option<String>) -> Result<String, HttpAppError> {
    filename
        .filter(|f| !f.is_empty())
        .ok_or_else(|| HttpAppError(AppError::InvalidInput("Missing filename".to_string())))
}
