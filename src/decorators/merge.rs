use std::collections::BTreeMap;
use std::fmt;

use crate::handle::VFile;
use crate::path;
use crate::{DirEntry, File, FsError, FsRead};

/// Read-only union of several filesystems.
///
/// The first layer holding a regular file at a path serves it. When the
/// first match is a directory, the listings of every layer holding that
/// directory are merged; on a name clash the earlier layer's entry is kept.
///
/// ```rust
/// use virtfs::{FsRead, Map, Merge};
///
/// let base: Map = [("a.txt", "base"), ("b.txt", "b")].into_iter().collect();
/// let over: Map = [("a.txt", "over")].into_iter().collect();
/// let fs = Merge::new(vec![Box::new(over), Box::new(base)]);
/// assert_eq!(fs.read_file("a.txt").unwrap(), b"over");
/// assert_eq!(fs.read_dir(".").unwrap().len(), 2);
/// ```
pub struct Merge {
    layers: Vec<Box<dyn FsRead>>,
}

impl Merge {
    /// Merge `layers`, highest priority first.
    pub fn new(layers: Vec<Box<dyn FsRead>>) -> Self {
        Self { layers }
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if there are no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl fmt::Debug for Merge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Merge")
            .field("layers", &self.layers.len())
            .finish()
    }
}

impl FsRead for Merge {
    fn open(&self, path: &str) -> Result<Box<dyn VFile>, FsError> {
        path::check("open", path)?;
        let mut dir: Option<File> = None;
        let mut names: BTreeMap<String, DirEntry> = BTreeMap::new();
        for layer in &self.layers {
            let mut handle = match layer.open(path) {
                Ok(handle) => handle,
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e),
            };
            let info = handle.stat()?;
            if !info.is_dir() {
                if dir.is_none() {
                    return Ok(handle);
                }
                // a file shadowed by an earlier directory
                continue;
            }
            for entry in handle.read_dir(None)? {
                names.entry(entry.name.clone()).or_insert(entry);
            }
            if dir.is_none() {
                dir = Some(File {
                    path: path.to_string(),
                    mode: info.mode,
                    mod_time: info.mod_time,
                    ..File::default()
                });
            }
        }
        match dir {
            Some(dir) => Ok(dir.with_entries(names.into_values().collect()).open()),
            None => Err(FsError::NotFound { path: path.into() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileMode, Map, Tree};

    #[test]
    fn first_file_wins() {
        let a: Map = [("x.txt", "a")].into_iter().collect();
        let b: Map = [("x.txt", "b"), ("y.txt", "y")].into_iter().collect();
        let fs = Merge::new(vec![Box::new(a), Box::new(b)]);
        assert_eq!(fs.read_file("x.txt").unwrap(), b"a");
        assert_eq!(fs.read_file("y.txt").unwrap(), b"y");
    }

    #[test]
    fn directories_merge_sorted() {
        let a: Map = [("d/z.txt", "z"), ("d/m.txt", "m1")].into_iter().collect();
        let b: Tree = [
            ("d/m.txt", File::new("m2").with_mode(FileMode(0o600))),
            ("d/a.txt", File::new("a")),
        ]
        .into_iter()
        .collect();
        let fs = Merge::new(vec![Box::new(a), Box::new(b)]);
        let entries = fs.read_dir("d").unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a.txt", "m.txt", "z.txt"]);
        // the first layer's entry is kept
        assert!(entries[1].mode.is_zero());
        assert_eq!(entries[1].size, 2);
        assert_eq!(fs.read_file("d/m.txt").unwrap(), b"m1");
    }

    #[test]
    fn missing_everywhere_is_not_found() {
        let fs = Merge::new(vec![Box::new(Map::new()), Box::new(Tree::new())]);
        assert!(fs.open("nope").unwrap_err().is_not_found());
        assert!(fs.read_dir(".").unwrap().is_empty());
        assert_eq!(fs.len(), 2);
    }

    #[test]
    fn invalid_path_short_circuits() {
        let fs = Merge::new(Vec::new());
        assert!(fs.is_empty());
        assert!(matches!(fs.open("a/../b"), Err(FsError::InvalidPath { .. })));
    }
}
