//! In-memory tree filesystem.
//!
//! A [`Tree`] is a flat map from slash path to [`File`]. Only explicit
//! entries are stored; every directory implied by a deeper path is
//! synthesized when it is opened, by scanning the stored paths that share
//! its prefix. Deleting a directory is a prefix filter over the same map.
//!
//! ```rust
//! use virtfs::{File, FsRead, Tree};
//!
//! let tree: Tree = [
//!     ("bud/view/index.svelte", File::new("<h1>index</h1>")),
//!     ("bud/view/about/index.svelte", File::new("<h1>about</h1>")),
//! ]
//! .into_iter()
//! .collect();
//!
//! let names: Vec<_> = tree
//!     .read_dir("bud/view")
//!     .unwrap()
//!     .into_iter()
//!     .map(|e| e.name)
//!     .collect();
//! assert_eq!(names, ["about", "index.svelte"]);
//! assert!(tree.stat("bud").unwrap().is_dir());
//! assert_eq!(tree.len(), 2);
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::clock::{Clock, SystemClock};
use crate::handle::{DirHandle, FileHandle, VFile};
use crate::path::{self, ROOT};
use crate::{DirEntry, File, FileMode, FsError, FsRead, FsWrite, OpenFlags};

type Shared = Arc<RwLock<File>>;

/// In-memory filesystem keyed by full slash path.
///
/// Not meant for concurrent mutation: the internal lock keeps the map
/// consistent, but a sync or a multi-step mutation is not atomic.
pub struct Tree {
    files: RwLock<BTreeMap<String, Shared>>,
    clock: Arc<dyn Clock>,
}

impl Tree {
    /// Create an empty tree stamped by the wall clock.
    pub fn new() -> Self {
        Self {
            files: RwLock::new(BTreeMap::new()),
            clock: Arc::new(SystemClock),
        }
    }

    /// Use `clock` for the modification times of written entries.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Store `file` at `path` as an explicit entry, replacing any previous one.
    ///
    /// The path is not validated; invalid paths are simply unreachable.
    pub fn insert(&self, path: impl Into<String>, mut file: File) {
        let path = path.into();
        file.path = path.clone();
        self.files.write().insert(path, Arc::new(RwLock::new(file)));
    }

    /// A copy of the explicit entry at `path`.
    pub fn get(&self, path: &str) -> Option<File> {
        self.files.read().get(path).map(|f| f.read().clone())
    }

    /// Returns `true` if `path` is stored explicitly.
    pub fn contains(&self, path: &str) -> bool {
        self.files.read().contains_key(path)
    }

    /// Number of explicit entries.
    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }

    /// Explicit paths in lexical order.
    pub fn paths(&self) -> Vec<String> {
        self.files.read().keys().cloned().collect()
    }

    fn synthesize(&self, dir: &str) -> Result<File, FsError> {
        let files = self.files.read();
        let explicit = files.get(dir).map(|f| f.read().clone());
        let mut synth = DirSynth::new(dir);
        if dir == ROOT {
            for (stored, file) in files.iter() {
                synth.visit(stored, |name| file.read().entry_named(name));
            }
        } else {
            let prefix = format!("{dir}/");
            for (stored, file) in files
                .range(prefix.clone()..)
                .take_while(|(k, _)| k.starts_with(&prefix))
            {
                synth.visit(stored, |name| file.read().entry_named(name));
            }
        }
        synth.finish(explicit)
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("paths", &self.paths())
            .finish_non_exhaustive()
    }
}

impl<K: Into<String>> FromIterator<(K, File)> for Tree {
    fn from_iter<I: IntoIterator<Item = (K, File)>>(iter: I) -> Self {
        let tree = Tree::new();
        for (path, file) in iter {
            tree.insert(path, file);
        }
        tree
    }
}

/// Builds the child list of one directory from the stored paths beneath it.
pub(crate) struct DirSynth<'a> {
    dir: &'a str,
    prefix_len: usize,
    children: Vec<DirEntry>,
    needed: BTreeSet<String>,
}

impl<'a> DirSynth<'a> {
    pub(crate) fn new(dir: &'a str) -> Self {
        let prefix_len = if dir == ROOT { 0 } else { dir.len() + 1 };
        Self {
            dir,
            prefix_len,
            children: Vec::new(),
            needed: BTreeSet::new(),
        }
    }

    /// Account for one stored path. `entry` builds the listing entry when
    /// the path is an immediate child; callers only pass paths under `dir`.
    pub(crate) fn visit(&mut self, stored: &str, entry: impl FnOnce(&str) -> DirEntry) {
        if self.dir == ROOT && stored == ROOT {
            return;
        }
        let rest = &stored[self.prefix_len..];
        match rest.find('/') {
            None => self.children.push(entry(rest)),
            Some(i) => {
                self.needed.insert(rest[..i].to_string());
            }
        }
    }

    /// Produce the directory, or `NotFound` when nothing backs it.
    pub(crate) fn finish(mut self, explicit: Option<File>) -> Result<File, FsError> {
        if self.dir != ROOT
            && explicit.is_none()
            && self.children.is_empty()
            && self.needed.is_empty()
        {
            return Err(FsError::NotFound {
                path: self.dir.into(),
            });
        }
        for child in &self.children {
            self.needed.remove(&child.name);
        }
        self.children.extend(self.needed.into_iter().map(|name| DirEntry {
            name,
            size: 0,
            mode: FileMode::DIR,
            mod_time: None,
        }));
        self.children.sort_by(|a, b| a.name.cmp(&b.name));

        let mut dir = explicit.unwrap_or_else(File::dir);
        dir.path = self.dir.to_string();
        dir.entries = self.children;
        Ok(dir)
    }
}

impl FsRead for Tree {
    fn open(&self, path: &str) -> Result<Box<dyn VFile>, FsError> {
        path::check("open", path)?;
        let stored = self.files.read().get(path).cloned();
        match stored {
            Some(file) if !file.read().is_dir() => Ok(Box::new(FileHandle::new(file))),
            _ => Ok(Box::new(DirHandle::new(self.synthesize(path)?))),
        }
    }
}

impl FsWrite for Tree {
    fn open_file(
        &self,
        path: &str,
        flags: OpenFlags,
        _mode: FileMode,
    ) -> Result<Box<dyn VFile>, FsError> {
        path::check("open_file", path)?;
        if !flags.is_read_only() {
            return Err(FsError::NotSupported {
                path: path.into(),
                operation: "open_file",
            });
        }
        self.open(path)
    }

    fn mkdir_all(&self, path: &str, mode: FileMode) -> Result<(), FsError> {
        path::check("mkdir_all", path)?;
        if path == ROOT {
            return Ok(());
        }
        match self.stat(path) {
            Ok(info) if info.is_dir() => return Ok(()),
            Ok(_) => {
                return Err(FsError::AlreadyExists {
                    path: path.into(),
                    operation: "mkdir_all",
                });
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }
        let dir = File {
            mode: mode | FileMode::DIR,
            mod_time: Some(self.clock.now()),
            ..File::default()
        };
        self.insert(path, dir);
        Ok(())
    }

    fn write_file(&self, path: &str, data: &[u8], mode: FileMode) -> Result<(), FsError> {
        path::check("write_file", path)?;
        match self.stat(path) {
            Ok(info) if info.is_dir() => {
                return Err(FsError::AlreadyExists {
                    path: path.into(),
                    operation: "write_file",
                });
            }
            Ok(_) => {}
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }
        {
            let files = self.files.read();
            let blocked = path::ancestors(path)
                .find(|a| files.get(*a).is_some_and(|f| !f.read().is_dir()));
            if let Some(ancestor) = blocked {
                return Err(FsError::NotADirectory {
                    path: ancestor.into(),
                });
            }
        }
        let file = File {
            data: data.to_vec(),
            mode,
            mod_time: Some(self.clock.now()),
            ..File::default()
        };
        self.insert(path, file);
        Ok(())
    }

    fn remove_all(&self, path: &str) -> Result<(), FsError> {
        path::check("remove_all", path)?;
        let info = match self.stat(path) {
            Ok(info) => info,
            Err(e) if e.is_not_found() => return Ok(()),
            Err(e) => return Err(e),
        };
        let mut files = self.files.write();
        files.remove(path);
        if info.is_dir() {
            let prefix = format!("{path}/");
            files.retain(|k, _| !k.starts_with(&prefix));
        }
        Ok(())
    }
}
