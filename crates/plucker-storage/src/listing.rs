//! Directory listing with companion suppression and file-only pagination.

use crate::companion::{extension_lower, is_suppressed, video_base_names};
use crate::error::{StorageError, StorageResult};
use crate::roots::{ResolvedPath, VirtualPathResolver};
use plucker_core::constants::is_supported_extension;
use plucker_core::models::{DirectoryEntry, ListingPage};
use std::path::{Path, PathBuf};
use tokio::fs;

/// A child of the scanned directory, classified once.
struct ScannedEntry {
    name: String,
    path: PathBuf,
    is_dir: bool,
    is_file: bool,
}

#[derive(Debug, Clone)]
pub struct MediaListingService {
    resolver: VirtualPathResolver,
}

impl MediaListingService {
    pub fn new(resolver: VirtualPathResolver) -> Self {
        Self { resolver }
    }

    /// List `subdir`, or the configured roots when `subdir` is empty.
    ///
    /// Every subdirectory is returned; only files are windowed by
    /// `offset`/`limit`, and `total` counts files only.
    pub async fn list(
        &self,
        subdir: Option<&str>,
        offset: usize,
        limit: usize,
    ) -> StorageResult<ListingPage> {
        let subdir = subdir.unwrap_or_default();
        if subdir.is_empty() {
            return Ok(self.list_roots());
        }

        let resolved = self.resolver.resolve(subdir)?;
        let start = std::time::Instant::now();

        let scanned = scan_directory(&resolved.real_path).await?;
        let page = build_page(&self.resolver, &resolved, scanned, subdir, offset, limit);

        tracing::debug!(
            path = %resolved.real_path.display(),
            total_files = page.total,
            returned = page.items.len(),
            offset,
            limit,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Directory listed"
        );

        Ok(page)
    }

    fn list_roots(&self) -> ListingPage {
        let items: Vec<DirectoryEntry> = self
            .resolver
            .roots()
            .iter()
            .map(|root| DirectoryEntry::Directory {
                name: root.name.clone(),
                path: root.name.clone(),
                fullpath: root.base_dir.display().to_string(),
            })
            .collect();

        ListingPage {
            total: items.len(),
            items,
            current_path: String::new(),
        }
    }
}

/// Read the direct children of `dir` in a single pass.
async fn scan_directory(dir: &Path) -> StorageResult<Vec<ScannedEntry>> {
    let not_found = || StorageError::NotFound("Directory not found".to_string());

    match fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(not_found()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
        Err(e) => return Err(e.into()),
    }

    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();
    while let Some(entry) = reader.next_entry().await? {
        let path = entry.path();
        let mut file_type = entry.file_type().await?;
        if file_type.is_symlink() {
            // Follow links like a regular stat would; dangling links are skipped.
            match fs::metadata(&path).await {
                Ok(meta) => file_type = meta.file_type(),
                Err(_) => continue,
            }
        }
        entries.push(ScannedEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path,
            is_dir: file_type.is_dir(),
            is_file: file_type.is_file(),
        });
    }
    Ok(entries)
}

fn build_page(
    resolver: &VirtualPathResolver,
    resolved: &ResolvedPath,
    scanned: Vec<ScannedEntry>,
    current_path: &str,
    offset: usize,
    limit: usize,
) -> ListingPage {
    // Suppression needs every video in the directory, wherever it sits in scan order.
    let videos = video_base_names(
        scanned
            .iter()
            .filter(|e| e.is_file)
            .map(|e| e.name.as_str()),
    );

    let root = resolver.roots().get(&resolved.root);
    let virtual_of = |path: &Path, name: &str| -> String {
        root.and_then(|r| resolver.virtual_path_for(r, path))
            .unwrap_or_else(|| format!("{}/{}", resolved.virtual_path(), name))
    };

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in scanned {
        if entry.is_dir {
            dirs.push(DirectoryEntry::Directory {
                path: virtual_of(&entry.path, &entry.name),
                fullpath: entry.path.display().to_string(),
                name: entry.name,
            });
            continue;
        }
        if !entry.is_file {
            continue;
        }
        let Some(extension) = extension_lower(Path::new(&entry.name)) else {
            continue;
        };
        if !is_supported_extension(&extension) || is_suppressed(&entry.name, &videos) {
            continue;
        }
        files.push(DirectoryEntry::File {
            path: virtual_of(&entry.path, &entry.name),
            fullpath: entry.path.display().to_string(),
            name: entry.name,
            extension,
        });
    }

    sort_by_name(&mut dirs);
    sort_by_name(&mut files);

    let total = files.len();
    let mut items = dirs;
    items.extend(files.into_iter().skip(offset).take(limit));

    ListingPage {
        total,
        items,
        current_path: current_path.to_string(),
    }
}

/// Case-insensitive name order; exact name breaks ties so the order is total.
fn sort_by_name(entries: &mut [DirectoryEntry]) {
    entries.sort_by(|a, b| {
        a.name()
            .to_lowercase()
            .cmp(&b.name().to_lowercase())
            .then_with(|| a.name().cmp(b.name()))
    });
}
