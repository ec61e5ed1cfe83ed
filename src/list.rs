//! Insertion-ordered list filesystem.
//!
//! A [`List`] is a plain sequence of files. Unlike [`Tree`](crate::Tree) it
//! only opens paths that are stored explicitly, keeps duplicate entries,
//! and never cascades: removing a directory entry leaves its children.
//!
//! ```rust
//! use virtfs::{File, FileMode, FsRead, FsWrite, List};
//!
//! let list: List = [
//!     File::new("<h1>index</h1>").with_path("bud/view/index.svelte"),
//!     File::new("<h1>about</h1>").with_path("bud/view/about/index.svelte"),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert_eq!(list.read_file("bud/view/index.svelte").unwrap(), b"<h1>index</h1>");
//! // nothing is stored at bud/view
//! assert!(list.open("bud/view").unwrap_err().is_not_found());
//!
//! list.mkdir_all("bud/view", FileMode::DEFAULT_DIR).unwrap();
//! assert_eq!(list.read_dir("bud/view").unwrap().len(), 2);
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::handle::{DirHandle, FileHandle, VFile};
use crate::path::{self, ROOT};
use crate::tree::DirSynth;
use crate::{File, FileMode, FsError, FsRead, FsWrite, OpenFlags};

type Shared = Arc<RwLock<File>>;

/// Filesystem backed by an ordered list of files, each carrying its path.
///
/// Lookups scan the list and take the first match. Written entries get no
/// modification time.
#[derive(Default)]
pub struct List {
    files: RwLock<Vec<Shared>>,
}

impl List {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `file` at its own path, even if that path is already taken.
    pub fn push(&self, file: File) {
        self.files.write().push(Arc::new(RwLock::new(file)));
    }

    /// Number of stored entries, duplicates included.
    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }

    /// Stored paths in insertion order.
    pub fn paths(&self) -> Vec<String> {
        self.files
            .read()
            .iter()
            .map(|f| f.read().path.clone())
            .collect()
    }

    fn find(&self, path: &str) -> Option<Shared> {
        self.files
            .read()
            .iter()
            .find(|f| f.read().path == path)
            .cloned()
    }

    fn synthesize(&self, dir: &str, explicit: File) -> Result<File, FsError> {
        let files = self.files.read();
        let mut synth = DirSynth::new(dir);
        let prefix = format!("{dir}/");
        for file in files.iter() {
            let file = file.read();
            if dir == ROOT || file.path.starts_with(&prefix) {
                synth.visit(&file.path, |name| file.entry_named(name));
            }
        }
        synth.finish(Some(explicit))
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("paths", &self.paths())
            .finish_non_exhaustive()
    }
}

impl FromIterator<File> for List {
    fn from_iter<I: IntoIterator<Item = File>>(iter: I) -> Self {
        Self {
            files: RwLock::new(
                iter.into_iter()
                    .map(|f| Arc::new(RwLock::new(f)))
                    .collect(),
            ),
        }
    }
}

impl FsRead for List {
    fn open(&self, path: &str) -> Result<Box<dyn VFile>, FsError> {
        path::check("open", path)?;
        let Some(file) = self.find(path) else {
            return Err(FsError::NotFound { path: path.into() });
        };
        if !file.read().is_dir() {
            return Ok(Box::new(FileHandle::new(file)));
        }
        let explicit = file.read().clone();
        Ok(Box::new(DirHandle::new(self.synthesize(path, explicit)?)))
    }
}

impl FsWrite for List {
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
        match self.find(path) {
            Some(file) if file.read().is_dir() => Ok(()),
            Some(_) => Err(FsError::AlreadyExists {
                path: path.into(),
                operation: "mkdir_all",
            }),
            None => {
                self.push(File::dir().with_path(path).with_mode(mode | FileMode::DIR));
                Ok(())
            }
        }
    }

    /// Overwrites an existing entry in place, so open handles on it see the
    /// new content.
    fn write_file(&self, path: &str, data: &[u8], mode: FileMode) -> Result<(), FsError> {
        path::check("write_file", path)?;
        let Some(file) = self.find(path) else {
            self.push(File::new(data).with_path(path).with_mode(mode));
            return Ok(());
        };
        let mut file = file.write();
        if file.is_dir() {
            return Err(FsError::AlreadyExists {
                path: path.into(),
                operation: "write_file",
            });
        }
        file.data = data.to_vec();
        file.mode = mode;
        Ok(())
    }

    /// Removes the first entry stored at exactly `path`; children stay.
    fn remove_all(&self, path: &str) -> Result<(), FsError> {
        path::check("remove_all", path)?;
        let mut files = self.files.write();
        if let Some(i) = files.iter().position(|f| f.read().path == path) {
            files.remove(i);
        }
        Ok(())
    }
}
