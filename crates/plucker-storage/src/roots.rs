//! Virtual path resolution
//!
//! Maps `Root/sub/dir` onto the real filesystem. The containment check runs on
//! lexically normalized paths (both the root base directory and the candidate
//! are folded the same way) and compares whole components, so `Output2` is
//! never mistaken for a child of `Output`.

use crate::error::{StorageError, StorageResult};
use plucker_core::paths::{normalize_lexically, to_forward_slashes};
use plucker_core::{Root, RootSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A virtual path that passed resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub root: String,
    pub root_dir: PathBuf,
    pub real_path: PathBuf,
}

impl ResolvedPath {
    /// Path below the root base directory (empty for the root itself).
    pub fn relative(&self) -> &Path {
        self.real_path
            .strip_prefix(&self.root_dir)
            .unwrap_or_else(|_| Path::new(""))
    }

    pub fn is_root(&self) -> bool {
        self.relative().as_os_str().is_empty()
    }

    /// Canonical virtual form: `Root` or `Root/rel/path`.
    pub fn virtual_path(&self) -> String {
        join_virtual(&self.root, self.relative())
    }
}

/// Resolves client-supplied virtual paths against the configured roots.
#[derive(Debug, Clone)]
pub struct VirtualPathResolver {
    roots: Arc<RootSet>,
}

impl VirtualPathResolver {
    pub fn new(roots: RootSet) -> Self {
        Self {
            roots: Arc::new(roots),
        }
    }

    pub fn roots(&self) -> &RootSet {
        &self.roots
    }

    /// Resolve `virtual_path` to a real path inside one of the roots.
    ///
    /// Backslashes are accepted as separators. A trailing separator is
    /// ignored; any other empty segment is rejected.
    pub fn resolve(&self, virtual_path: &str) -> StorageResult<ResolvedPath> {
        if virtual_path.is_empty() {
            return Err(StorageError::InvalidPath("Empty path".to_string()));
        }

        let normalized = virtual_path.replace('\\', "/");
        let mut segments: Vec<&str> = normalized.split('/').collect();
        while segments.len() > 1 && segments.last() == Some(&"") {
            segments.pop();
        }

        let root_name = segments[0];
        let root = self
            .roots
            .get(root_name)
            .ok_or_else(|| StorageError::InvalidPath(format!("Unknown root '{}'", root_name)))?;

        let rest = &segments[1..];
        if rest.iter().any(|s| s.is_empty()) {
            return Err(StorageError::InvalidPath(format!(
                "Empty segment in '{}'",
                virtual_path
            )));
        }

        let mut candidate = root.base_dir.clone();
        for segment in rest {
            candidate.push(segment);
        }
        let real_path = normalize_lexically(&candidate);

        if !real_path.starts_with(&root.base_dir) {
            tracing::warn!(
                virtual_path = %virtual_path,
                root = %root.name,
                "Rejected virtual path escaping its root"
            );
            return Err(StorageError::InvalidPath(format!(
                "'{}' escapes root '{}'",
                virtual_path, root.name
            )));
        }

        Ok(ResolvedPath {
            root: root.name.clone(),
            root_dir: root.base_dir.clone(),
            real_path,
        })
    }

    /// Virtual path of a real path known to be inside `root`.
    pub fn virtual_path_for(&self, root: &Root, real_path: &Path) -> Option<String> {
        let relative = real_path.strip_prefix(&root.base_dir).ok()?;
        Some(join_virtual(&root.name, relative))
    }
}

fn join_virtual(root: &str, relative: &Path) -> String {
    let rel = to_forward_slashes(relative);
    if rel.is_empty() {
        root.to_string()
    } else {
        format!("{}/{}", root, rel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> VirtualPathResolver {
        VirtualPathResolver::new(
            RootSet::new([("Output", "/data/out"), ("Input", "/data/in")]).unwrap(),
        )
    }

    #[test]
    fn test_resolve_root_only() {
        let resolved = resolver().resolve("Output").unwrap();
        assert_eq!(resolved.real_path, PathBuf::from("/data/out"));
        assert!(resolved.is_root());
        assert_eq!(resolved.virtual_path(), "Output");

        let trailing = resolver().resolve("Output/").unwrap();
        assert_eq!(trailing.real_path, PathBuf::from("/data/out"));
    }

    #[test]
    fn test_resolve_nested_and_backslashes() {
        let resolved = resolver().resolve("Input\\sub\\a.png").unwrap();
        assert_eq!(resolved.root, "Input");
        assert_eq!(resolved.real_path, PathBuf::from("/data/in/sub/a.png"));
        assert_eq!(resolved.virtual_path(), "Input/sub/a.png");
    }

    #[test]
    fn test_resolve_rejects_empty_and_unknown_root() {
        assert!(matches!(
            resolver().resolve(""),
            Err(StorageError::InvalidPath(_))
        ));
        assert!(matches!(
            resolver().resolve("Models/x.png"),
            Err(StorageError::InvalidPath(_))
        ));
        assert!(matches!(
            resolver().resolve("/Output/x.png"),
            Err(StorageError::InvalidPath(_))
        ));
        assert!(matches!(
            resolver().resolve("Output//x.png"),
            Err(StorageError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_parent_segments_never_escape() {
        let r = resolver();
        let escapes = [
            "Output/..",
            "Output/../in/a.png",
            "Output/sub/../../etc/passwd",
            "Output/a/b/../../../out2",
            "Output/../../../../../..",
            "Output/./../out/../in",
        ];
        for path in escapes {
            assert!(
                matches!(r.resolve(path), Err(StorageError::InvalidPath(_))),
                "{} should be rejected",
                path
            );
        }

        for depth in 1..8 {
            let path = format!("Output/{}", vec![".."; depth].join("/"));
            assert!(r.resolve(&path).is_err(), "{} should be rejected", path);
            let interleaved = format!("Output/{}", vec!["x/../.."; depth].join("/"));
            assert!(r.resolve(&interleaved).is_err(), "{} should be rejected", interleaved);
        }
    }

    #[test]
    fn test_parent_segments_inside_root_allowed() {
        let resolved = resolver().resolve("Output/a/../b/./c.png").unwrap();
        assert_eq!(resolved.real_path, PathBuf::from("/data/out/b/c.png"));
        assert_eq!(resolved.virtual_path(), "Output/b/c.png");

        let back_to_root = resolver().resolve("Output/a/..").unwrap();
        assert!(back_to_root.is_root());
    }

    #[test]
    fn test_sibling_prefix_is_not_containment() {
        let r = VirtualPathResolver::new(
            RootSet::new([("Output", "/data/out"), ("Other", "/data/out2")]).unwrap(),
        );
        assert!(r.resolve("Output/../out2/x.png").is_err());
    }

    #[test]
    fn test_round_trip_through_virtual_path() {
        let r = resolver();
        for path in ["Output", "Output/a.png", "Input/x/y/z.webp", "Output/a/../b.gif"] {
            let first = r.resolve(path).unwrap();
            let again = r.resolve(&first.virtual_path()).unwrap();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_virtual_path_for_child() {
        let r = resolver();
        let root = r.roots().get("Output").unwrap().clone();
        assert_eq!(
            r.virtual_path_for(&root, Path::new("/data/out/sub/a.png")),
            Some("Output/sub/a.png".to_string())
        );
        assert_eq!(r.virtual_path_for(&root, Path::new("/elsewhere")), None);
    }
}
