//! Lexical path helpers.
//!
//! Nothing here touches the filesystem: `..` and `.` are folded purely on the
//! component list, the same way for root base directories and for resolved
//! request paths, so containment checks compare like with like.

use std::path::{Component, Path, PathBuf};

/// Fold `.` and `..` components without consulting the filesystem.
///
/// A `..` that would climb above the filesystem root is dropped, mirroring how
/// `/..` is `/` on Unix.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// Make `path` absolute (against the current directory) and normalize it.
pub fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    Ok(normalize_lexically(&absolute))
}

/// Render a relative path with forward slashes regardless of platform.
pub fn to_forward_slashes(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
