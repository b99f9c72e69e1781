//! Companion file pairing.
//!
//! Pairing is inferred from file names only. Two files are companions when
//! they share a base name (the name without its last extension):
//!
//! - `foo.mp4` + `foo.png`: the PNG carries the video's embedded metadata and
//!   poster. Listings hide the PNG and metadata lookups on the MP4 read it.
//! - `foo.gif` + `foo.png`: an animated preview generated from the still.
//!
//! Delete and save apply the same cascade: a GIF or MP4 takes its PNG along,
//! a PNG takes its GIF along. A PNG never takes an MP4 along.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Lowercased extension without the dot.
pub fn extension_lower(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

/// Base name used for pairing (`foo` for `foo.mp4`).
pub fn base_name(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
}

/// The file that must follow `path` when it is deleted or moved.
pub fn companion_of(path: &Path) -> Option<PathBuf> {
    match extension_lower(path)?.as_str() {
        "gif" | "mp4" => Some(path.with_extension("png")),
        "png" => Some(path.with_extension("gif")),
        _ => None,
    }
}

/// The file that holds embedded metadata on behalf of `path`, if not itself.
pub fn metadata_carrier_of(path: &Path) -> Option<PathBuf> {
    match extension_lower(path)?.as_str() {
        "mp4" => Some(path.with_extension("png")),
        _ => None,
    }
}

/// Base names of every `.mp4` among `file_names`.
pub fn video_base_names<'a, I>(file_names: I) -> HashSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    file_names
        .into_iter()
        .filter(|name| extension_lower(Path::new(name)).as_deref() == Some("mp4"))
        .map(|name| base_name(name).to_string())
        .collect()
}

/// Whether a listing hides `file_name` because a sibling video owns it.
pub fn is_suppressed(file_name: &str, video_bases: &HashSet<String>) -> bool {
    extension_lower(Path::new(file_name)).as_deref() == Some("png")
        && video_bases.contains(base_name(file_name))
}
