use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One visible item of a directory listing.
///
/// `path` is the root-relative virtual path with forward slashes and is what a
/// client sends back as `subdir` or `filename`. `fullpath` is the absolute
/// filesystem path, kept for debugging only.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum DirectoryEntry {
    #[serde(rename = "dir")]
    Directory {
        name: String,
        path: String,
        fullpath: String,
    },
    #[serde(rename = "file")]
    File {
        name: String,
        path: String,
        fullpath: String,
        /// Lowercase extension without the dot
        extension: String,
    },
}

impl DirectoryEntry {
    pub fn name(&self) -> &str {
        match self {
            DirectoryEntry::Directory { name, .. } | DirectoryEntry::File { name, .. } => name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            DirectoryEntry::Directory { path, .. } | DirectoryEntry::File { path, .. } => path,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, DirectoryEntry::Directory { .. })
    }
}

/// A page of a directory listing.
///
/// `items` holds every subdirectory followed by the requested window of files;
/// `total` counts files only.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ListingPage {
    pub total: usize,
    pub items: Vec<DirectoryEntry>,
    pub current_path: String,
}
