//! Metadata lookup for a virtual path.

use crate::error::MetadataError;
use crate::info::{read_info_store, InfoStore};
use crate::prompt::extract_prompt_text;
use plucker_core::models::MetadataResponse;
use plucker_storage::companion::metadata_carrier_of;
use plucker_storage::{StorageError, StorageResult, VirtualPathResolver};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Key that selects the prompt-text heuristic instead of a raw entry.
pub const PROMPT_TEXT_KEY: &str = "prompt_text";

const WORKFLOW_KEY: &str = "workflow";
const PROMPT_KEY: &str = "prompt";

#[derive(Debug, Clone)]
pub struct MetadataService {
    resolver: VirtualPathResolver,
}

impl MetadataService {
    pub fn new(resolver: VirtualPathResolver) -> Self {
        Self { resolver }
    }

    /// Look up embedded metadata for `virtual_path`.
    ///
    /// Only path resolution and a missing target are errors. Anything that
    /// goes wrong while reading the file becomes a `found: false` answer.
    #[tracing::instrument(skip(self), fields(operation = "get_metadata"))]
    pub async fn get(
        &self,
        virtual_path: &str,
        key: Option<&str>,
    ) -> StorageResult<MetadataResponse> {
        let resolved = self.resolver.resolve(virtual_path)?;
        let target = metadata_target(&resolved.real_path).await;

        match fs::metadata(&target).await {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound("File not found".to_string()));
            }
            Err(e) => {
                tracing::debug!(path = %target.display(), error = %e, "Cannot stat metadata target");
                return Ok(MetadataResponse::missing(e.to_string()));
            }
        }

        let store = match read_store(&target).await {
            Ok(store) => store,
            Err(e) => {
                tracing::debug!(path = %target.display(), error = %e, "No readable metadata");
                return Ok(MetadataResponse::missing(e.to_string()));
            }
        };

        Ok(answer(&store, key.filter(|k| !k.is_empty())))
    }
}

/// The file that carries metadata for `path`: its PNG companion for a video
/// when one is readable, otherwise the file itself.
async fn metadata_target(path: &Path) -> PathBuf {
    if let Some(carrier) = metadata_carrier_of(path) {
        if matches!(fs::try_exists(&carrier).await, Ok(true)) {
            return carrier;
        }
    }
    path.to_path_buf()
}

async fn read_store(path: &Path) -> Result<InfoStore, MetadataError> {
    let data = fs::read(path).await?;
    read_info_store(&data)
}

fn answer(store: &InfoStore, key: Option<&str>) -> MetadataResponse {
    match key {
        Some(PROMPT_TEXT_KEY) => prompt_text(store),
        Some(key) => match store.get(key) {
            Some(value) => MetadataResponse::found(value),
            None => MetadataResponse::missing(format!("Key '{}' not found", key)),
        },
        None => store
            .get(WORKFLOW_KEY)
            .or_else(|| store.get(PROMPT_KEY))
            .map(MetadataResponse::found)
            .unwrap_or_else(|| MetadataResponse::missing("No ComfyUI metadata found")),
    }
}

fn prompt_text(store: &InfoStore) -> MetadataResponse {
    let Some(raw) = store.get(PROMPT_KEY) else {
        return MetadataResponse::missing("No prompt data found");
    };
    match extract_prompt_text(raw) {
        Ok(Some(text)) => MetadataResponse::found(text),
        Ok(None) => MetadataResponse::missing("Could not identify prompt text"),
        Err(e) => MetadataResponse::missing(format!("Error parsing: {}", e)),
    }
}
