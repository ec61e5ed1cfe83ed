//! Read-only filesystem over a map of path to text.

use std::collections::BTreeMap;

use crate::handle::VFile;
use crate::{File, FsError, FsRead, Tree, path};

/// A read-only filesystem of UTF-8 files keyed by slash path.
///
/// Carries no modes, times or explicit directories; every open projects the
/// map into a [`Tree`] so parent directories are synthesized the same way.
///
/// ```rust
/// use virtfs::{FsRead, Map};
///
/// let fs: Map = [("a/b.txt", "b")].into_iter().collect();
/// assert!(fs.stat("a").unwrap().is_dir());
/// assert_eq!(fs.read_file("a/b.txt").unwrap(), b"b");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Map(pub BTreeMap<String, String>);

impl Map {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn insert(&mut self, path: impl Into<String>, data: impl Into<String>) {
        self.0.insert(path.into(), data.into());
    }

    fn to_tree(&self) -> Tree {
        self.0
            .iter()
            .map(|(path, data)| (path.as_str(), File::new(data.as_bytes())))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl FsRead for Map {
    fn open(&self, path: &str) -> Result<Box<dyn VFile>, FsError> {
        path::check("open", path)?;
        self.to_tree().open(path)
    }
}
