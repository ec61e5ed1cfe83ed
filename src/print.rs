//! Human-readable rendering of a filesystem.

use crate::{FsError, FsRead, path};

/// Render the tree under `dir` (`""` means the root) with box-drawing
/// branches, like `tree(1)`.
///
/// Subtrees that are missing or unreadable are left out rather than
/// failing the whole rendering.
///
/// ```rust
/// use virtfs::{Map, Mount, print};
///
/// let src: Map = [("a.txt", "a"), ("b/b.txt", "b")].into_iter().collect();
/// let fs = Mount::new("nested/src", src).unwrap();
/// assert_eq!(
///     print(&fs, ".").unwrap(),
///     ".\n\
///      └── nested\n    \
///          └── src\n        \
///              ├── a.txt\n        \
///              └── b\n            \
///                  └── b.txt\n"
/// );
/// ```
pub fn print<F: FsRead + ?Sized>(fs: &F, dir: &str) -> Result<String, FsError> {
    let dir = if dir.is_empty() { path::ROOT } else { dir };
    let mut out = format!("{dir}\n");
    branch(fs, dir, "", &mut out)?;
    Ok(out)
}

fn branch<F: FsRead + ?Sized>(
    fs: &F,
    dir: &str,
    indent: &str,
    out: &mut String,
) -> Result<(), FsError> {
    let entries = match fs.read_dir(dir) {
        Ok(entries) => entries,
        Err(FsError::NotFound { .. } | FsError::PermissionDenied { .. }) => return Ok(()),
        Err(e) => return Err(e),
    };
    let last = entries.len().saturating_sub(1);
    for (i, entry) in entries.iter().enumerate() {
        let (edge, nested) = if i == last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        out.push_str(indent);
        out.push_str(edge);
        out.push_str(&entry.name);
        out.push('\n');
        if entry.is_dir() {
            branch(fs, &path::join(dir, &entry.name), &format!("{indent}{nested}"), out)?;
        }
    }
    Ok(())
}
