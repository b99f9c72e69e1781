//! Shared constants for roots, media kinds and pagination.

/// Identifier of the root that holds generated output (and the Saved area).
pub const OUTPUT_ROOT: &str = "Output";

/// Identifier of the root that holds input images.
pub const INPUT_ROOT: &str = "Input";

/// Directory under the Output root that receives saved files and collections.
pub const SAVED_FOLDER_NAME: &str = "Saved";

/// File extensions surfaced by listings (lowercase, without the dot).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["gif", "mp4", "png", "jpg", "jpeg", "webp"];

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 500;

/// Returns true when `extension` (any case, no dot) is a listed media type.
pub fn is_supported_extension(extension: &str) -> bool {
    let lower = extension.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS.contains(&lower.as_str())
}
