//! Delete and save (move) operations with companion cascade.
//!
//! Known limitation: the free-name probe for saves reads the filesystem at
//! call time. Two concurrent saves of the same name can both see a name as
//! free; no cross-request locking is attempted.

use crate::collections::{collection_segment, saved_root};
use crate::companion::companion_of;
use crate::error::{StorageError, StorageResult};
use crate::roots::{ResolvedPath, VirtualPathResolver};
use plucker_core::paths::to_forward_slashes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Result of a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Final path of the primary file.
    pub destination: PathBuf,
    /// Destination path relative to the Output root, forward slashes.
    pub relative_destination: String,
    /// Final path of the companion, when one was moved.
    pub companion_destination: Option<PathBuf>,
}

impl SaveOutcome {
    pub fn message(&self) -> String {
        format!("Moved to {}", self.relative_destination)
    }
}

#[derive(Debug, Clone)]
pub struct FileOperationsService {
    resolver: VirtualPathResolver,
    output_dir: PathBuf,
    saved_root: PathBuf,
}

impl FileOperationsService {
    pub fn new(resolver: VirtualPathResolver) -> StorageResult<Self> {
        let saved_root = saved_root(&resolver)?;
        let output_dir = resolver
            .roots()
            .output()
            .map(|root| root.base_dir.clone())
            .ok_or_else(|| StorageError::ConfigError("No Output root configured".to_string()))?;
        Ok(Self {
            resolver,
            output_dir,
            saved_root,
        })
    }

    /// Delete the file at `virtual_path` and its companion, if any.
    ///
    /// Returns the confirmation message.
    pub async fn delete(&self, virtual_path: &str) -> StorageResult<String> {
        let resolved = self.resolve_existing_file(virtual_path).await?;
        let start = std::time::Instant::now();

        fs::remove_file(&resolved.real_path).await.map_err(|e| {
            StorageError::OperationFailed(format!(
                "Failed to delete {}: {}",
                resolved.virtual_path(),
                e
            ))
        })?;

        let mut companion_deleted = None;
        if let Some(companion) = companion_file(&resolved.real_path).await? {
            match fs::remove_file(&companion).await {
                Ok(()) => companion_deleted = Some(companion),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(
                        path = %companion.display(),
                        error = %e,
                        "Primary deleted but companion removal failed"
                    );
                    return Err(StorageError::OperationFailed(format!(
                        "Deleted {} but failed to delete companion {}: {}",
                        virtual_path,
                        companion.display(),
                        e
                    )));
                }
            }
        }

        tracing::info!(
            path = %resolved.real_path.display(),
            companion = ?companion_deleted.as_ref().map(|p| p.display().to_string()),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "File deleted"
        );

        Ok(format!("{} deleted", virtual_path))
    }

    /// Move the file at `virtual_path` (and its companion) into the Saved
    /// area, optionally inside `collection`.
    pub async fn save(
        &self,
        virtual_path: &str,
        collection: Option<&str>,
    ) -> StorageResult<SaveOutcome> {
        let resolved = self.resolve_existing_file(virtual_path).await?;
        let start = std::time::Instant::now();

        let mut dest_dir = self.saved_root.clone();
        if let Some(segment) = collection.map(collection_segment).transpose()?.flatten() {
            dest_dir.push(segment);
        }
        fs::create_dir_all(&dest_dir).await.map_err(|e| {
            StorageError::OperationFailed(format!(
                "Failed to create {}: {}",
                dest_dir.display(),
                e
            ))
        })?;

        let companion = companion_file(&resolved.real_path).await?;

        let file_name = resolved
            .real_path
            .file_name()
            .ok_or_else(|| StorageError::NotAFile(virtual_path.to_string()))?;
        let (destination, companion_destination) =
            free_destination(&dest_dir, Path::new(file_name), companion.as_deref()).await?;

        let pair = companion.as_deref().zip(companion_destination.as_deref());
        move_with_companion(&resolved.real_path, &destination, pair).await?;

        let relative_destination = destination
            .strip_prefix(&self.output_dir)
            .map(to_forward_slashes)
            .unwrap_or_else(|_| destination.display().to_string());

        tracing::info!(
            from = %resolved.real_path.display(),
            to = %destination.display(),
            companion = ?companion_destination.as_ref().map(|p| p.display().to_string()),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "File saved"
        );

        Ok(SaveOutcome {
            destination,
            relative_destination,
            companion_destination,
        })
    }

    async fn resolve_existing_file(&self, virtual_path: &str) -> StorageResult<ResolvedPath> {
        let resolved = self.resolver.resolve(virtual_path)?;
        match fs::metadata(&resolved.real_path).await {
            Ok(meta) if meta.is_file() => Ok(resolved),
            Ok(_) => Err(StorageError::NotAFile(virtual_path.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound("File not found".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

async fn exists(path: &Path) -> StorageResult<bool> {
    Ok(fs::try_exists(path).await?)
}

/// The companion of `path`, when it exists as a regular file.
async fn companion_file(path: &Path) -> StorageResult<Option<PathBuf>> {
    let Some(companion) = companion_of(path) else {
        return Ok(None);
    };
    match fs::metadata(&companion).await {
        Ok(meta) if meta.is_file() => Ok(Some(companion)),
        Ok(_) => {
            tracing::debug!(path = %companion.display(), "Companion is not a file, ignoring");
            Ok(None)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Move a file and its companion as one unit. If the companion cannot be
/// moved, the primary is moved back to where it was.
async fn move_with_companion(
    from: &Path,
    to: &Path,
    companion: Option<(&Path, &Path)>,
) -> StorageResult<()> {
    move_file(from, to).await?;
    let Some((companion_from, companion_to)) = companion else {
        return Ok(());
    };
    if let Err(e) = move_file(companion_from, companion_to).await {
        tracing::warn!(
            path = %companion_from.display(),
            error = %e,
            "Companion move failed, restoring primary"
        );
        if let Err(restore) = move_file(to, from).await {
            tracing::error!(
                from = %to.display(),
                to = %from.display(),
                error = %restore,
                "Failed to restore primary after companion move failure"
            );
        }
        return Err(e);
    }
    Ok(())
}

/// Probe `name`, `name_1`, `name_2`, ... until the primary name and the
/// companion name derived from it are both free in `dir`.
async fn free_destination(
    dir: &Path,
    file_name: &Path,
    companion: Option<&Path>,
) -> StorageResult<(PathBuf, Option<PathBuf>)> {
    let stem = file_name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = file_name
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let companion_ext = companion
        .and_then(|c| c.extension())
        .map(|e| format!(".{}", e.to_string_lossy()));

    let mut counter: u32 = 0;
    loop {
        let base = if counter == 0 {
            stem.clone()
        } else {
            format!("{}_{}", stem, counter)
        };
        let primary = dir.join(format!("{}{}", base, ext));
        let paired = companion_ext
            .as_ref()
            .map(|cext| dir.join(format!("{}{}", base, cext)));

        let paired_taken = match &paired {
            Some(path) => exists(path).await?,
            None => false,
        };
        if !exists(&primary).await? && !paired_taken {
            return Ok((primary, paired));
        }
        counter += 1;
    }
}

/// Rename, falling back to copy + remove across filesystems.
async fn move_file(from: &Path, to: &Path) -> StorageResult<()> {
    match fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device(&e) => {
            fs::copy(from, to).await.map_err(|e| {
                StorageError::OperationFailed(format!(
                    "Failed to copy {} to {}: {}",
                    from.display(),
                    to.display(),
                    e
                ))
            })?;
            fs::remove_file(from).await.map_err(|e| {
                StorageError::OperationFailed(format!(
                    "Copied {} but failed to remove source: {}",
                    from.display(),
                    e
                ))
            })
        }
        Err(e) => Err(StorageError::OperationFailed(format!(
            "Failed to move {} to {}: {}",
            from.display(),
            to.display(),
            e
        ))),
    }
}

fn is_cross_device(err: &std::io::Error) -> bool {
    err.kind() == ErrorKind::CrossesDevices
}
