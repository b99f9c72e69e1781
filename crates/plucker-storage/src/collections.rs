//! Collections: named buckets under the Saved area of the Output root.

use crate::error::{StorageError, StorageResult};
use crate::roots::VirtualPathResolver;
use plucker_core::constants::SAVED_FOLDER_NAME;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Keep alphanumerics, space, hyphen and underscore, then trim.
///
/// Returns `None` when nothing usable is left.
pub fn sanitize_collection_name(name: &str) -> Option<String> {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let trimmed = kept.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Reduce a save-target collection to one path segment.
///
/// Only the last `/`- or `\`-separated segment is kept; `.` and `..` are refused.
pub fn collection_segment(collection: &str) -> StorageResult<Option<String>> {
    let normalized = collection.replace('\\', "/");
    let last = normalized.rsplit('/').next().unwrap_or_default().trim();
    match last {
        "" => Ok(None),
        "." | ".." => Err(StorageError::InvalidName(format!(
            "Invalid collection '{}'",
            collection
        ))),
        segment => Ok(Some(segment.to_string())),
    }
}

/// Absolute path of the Saved area.
pub fn saved_root(resolver: &VirtualPathResolver) -> StorageResult<PathBuf> {
    resolver
        .roots()
        .output()
        .map(|root| root.base_dir.join(SAVED_FOLDER_NAME))
        .ok_or_else(|| StorageError::ConfigError("No Output root configured".to_string()))
}

#[derive(Debug, Clone)]
pub struct CollectionsService {
    saved_root: PathBuf,
}

impl CollectionsService {
    pub fn new(resolver: &VirtualPathResolver) -> StorageResult<Self> {
        Ok(Self {
            saved_root: saved_root(resolver)?,
        })
    }

    pub fn saved_root(&self) -> &Path {
        &self.saved_root
    }

    /// Names of the directories directly under the Saved area, sorted.
    pub async fn list(&self) -> StorageResult<Vec<String>> {
        let mut reader = match fs::read_dir(&self.saved_root).await {
            Ok(reader) => reader,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut collections = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            if fs::metadata(entry.path()).await.map(|m| m.is_dir()).unwrap_or(false) {
                collections.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        collections.sort();
        Ok(collections)
    }

    /// Create a collection from a client-supplied name; returns the sanitized name.
    ///
    /// Creating an existing collection succeeds.
    pub async fn create(&self, name: &str) -> StorageResult<String> {
        let safe_name = sanitize_collection_name(name)
            .ok_or_else(|| StorageError::InvalidName("Invalid collection name".to_string()))?;

        let dir = self.saved_root.join(&safe_name);
        fs::create_dir_all(&dir).await.map_err(|e| {
            StorageError::OperationFailed(format!(
                "Failed to create collection {}: {}",
                dir.display(),
                e
            ))
        })?;

        tracing::info!(collection = %safe_name, path = %dir.display(), "Collection created");
        Ok(safe_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plucker_core::RootSet;
    use tempfile::TempDir;

    fn setup() -> (TempDir, CollectionsService) {
        let out = tempfile::tempdir().unwrap();
        let resolver = VirtualPathResolver::new(RootSet::new([("Output", out.path())]).unwrap());
        let service = CollectionsService::new(&resolver).unwrap();
        (out, service)
    }

    #[test]
    fn test_sanitize_collection_name() {
        assert_eq!(
            sanitize_collection_name("  My Faves_2024-01 "),
            Some("My Faves_2024-01".to_string())
        );
        assert_eq!(sanitize_collection_name("../../etc"), Some("etc".to_string()));
        assert_eq!(sanitize_collection_name("a/b\\c.d"), Some("abcd".to_string()));
        assert_eq!(sanitize_collection_name("Café"), Some("Café".to_string()));
        assert_eq!(sanitize_collection_name("..//"), None);
        assert_eq!(sanitize_collection_name("   "), None);
    }

    #[test]
    fn test_collection_segment() {
        assert_eq!(collection_segment("").unwrap(), None);
        assert_eq!(collection_segment("Faves").unwrap(), Some("Faves".to_string()));
        assert_eq!(collection_segment("../Faves").unwrap(), Some("Faves".to_string()));
        assert_eq!(collection_segment("a\\b").unwrap(), Some("b".to_string()));
        assert!(collection_segment("..").is_err());
        assert!(collection_segment("x/..").is_err());
        assert!(collection_segment(".").is_err());
    }

    #[tokio::test]
    async fn test_list_without_saved_area_is_empty() {
        let (_dir, service) = setup();
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_then_list_sorted() {
        let (dir, service) = setup();
        assert_eq!(service.create("zebra").await.unwrap(), "zebra");
        assert_eq!(service.create(" Apples! ").await.unwrap(), "Apples");
        assert_eq!(service.create("mid").await.unwrap(), "mid");
        std::fs::write(dir.path().join("Saved").join("loose.png"), b"x").unwrap();

        assert_eq!(service.list().await.unwrap(), vec!["Apples", "mid", "zebra"]);
    }

    #[tokio::test]
    async fn test_create_is_idempotent() {
        let (dir, service) = setup();
        service.create("Faves").await.unwrap();
        std::fs::write(dir.path().join("Saved/Faves/keep.png"), b"x").unwrap();
        service.create("Faves").await.unwrap();
        assert!(dir.path().join("Saved/Faves/keep.png").exists());
    }

    #[tokio::test]
    async fn test_create_rejects_empty_after_sanitizing() {
        let (_dir, service) = setup();
        assert!(matches!(
            service.create("../..").await,
            Err(StorageError::InvalidName(_))
        ));
    }
}
