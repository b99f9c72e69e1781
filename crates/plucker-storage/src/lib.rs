//! Plucker Storage Library
//!
//! Filesystem side of the media browser: virtual path resolution, companion
//! file pairing, directory listing with pagination, delete/save operations and
//! the Saved-area collections.
//!
//! # Virtual paths
//!
//! Clients never see real paths as input. Every request names a file or
//! directory as `Root/sub/dir/file.png`, where `Root` is one of the configured
//! root identifiers. Resolution folds `..` lexically and rejects anything that
//! lands outside the root's base directory; see [`roots`].

pub mod collections;
pub mod companion;
pub mod error;
pub mod listing;
pub mod operations;
pub mod roots;

// Re-export commonly used types
pub use collections::CollectionsService;
pub use error::{StorageError, StorageResult};
pub use listing::MediaListingService;
pub use operations::{FileOperationsService, SaveOutcome};
pub use roots::{ResolvedPath, VirtualPathResolver};
