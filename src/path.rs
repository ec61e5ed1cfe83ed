//! # Slash Paths
//!
//! Every store in this crate addresses entries with relative, slash-separated
//! paths. `.` names the root; nothing else may be empty or contain `.`/`..`
//! segments.
//!
//! ```rust
//! use virtfs::path;
//!
//! assert!(path::valid_path("a/b.txt"));
//! assert!(path::valid_path("."));
//! assert!(!path::valid_path("/a"));
//! assert!(!path::valid_path("a/../b"));
//! assert_eq!(path::join("a", "b.txt"), "a/b.txt");
//! assert_eq!(path::dir("a.txt"), ".");
//! ```

use crate::FsError;

/// The root path.
pub const ROOT: &str = ".";

/// Reports whether `path` is a valid store path.
///
/// Valid paths are `.` or a non-empty sequence of `/`-separated segments
/// where no segment is empty, `.` or `..`.
pub fn valid_path(path: &str) -> bool {
    if path == ROOT {
        return true;
    }
    !path.is_empty()
        && path
            .split('/')
            .all(|seg| !seg.is_empty() && seg != "." && seg != "..")
}

/// Validate `path` for `operation`.
pub(crate) fn check(operation: &'static str, path: &str) -> Result<(), FsError> {
    if valid_path(path) {
        Ok(())
    } else {
        Err(FsError::InvalidPath {
            path: path.into(),
            operation,
        })
    }
}

/// Join two valid paths. `.` is the identity on either side.
pub fn join(dir: &str, name: &str) -> String {
    match (dir, name) {
        (ROOT, _) => name.to_string(),
        (_, ROOT) => dir.to_string(),
        _ => format!("{dir}/{name}"),
    }
}

/// Join a list of segments, treating empty input as the root.
pub fn join_all<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .fold(ROOT.to_string(), |acc, p| join(&acc, p))
}

/// Parent directory of a valid path; `.` for top-level names and the root.
pub fn dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(i) => &path[..i],
        None => ROOT,
    }
}

/// Last segment of a valid path; `.` for the root.
pub fn base(path: &str) -> &str {
    match path.rfind('/') {
        Some(i) => &path[i + 1..],
        None => path,
    }
}

/// Every proper ancestor of `path`, nearest first, excluding the root.
pub(crate) fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices('/').rev().map(move |(i, _)| &path[..i])
}
