use std::fmt;

use crate::handle::VFile;
use crate::path;
use crate::{DirEntry, File, FileInfo, FileMode, FsError, FsRead, FsWrite, OpenFlags};

type Predicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Hides every path matched by a predicate.
///
/// Hidden paths cannot be opened, are dropped from listings, and refuse
/// writes. The predicate sees full slash paths, so excluding a directory
/// usually means matching it and everything under it:
///
/// ```rust
/// use virtfs::{Exclude, File, FsRead, Tree};
///
/// let tree: Tree = [
///     ("view/a.txt", File::new("a")),
///     ("bud/bud.go", File::new("bud")),
/// ]
/// .into_iter()
/// .collect();
/// let fs = Exclude::new(&tree, |p: &str| p == "bud" || p.starts_with("bud/"));
/// let names: Vec<_> = fs.read_dir(".").unwrap().into_iter().map(|e| e.name).collect();
/// assert_eq!(names, ["view"]);
/// ```
pub struct Exclude<F> {
    fs: F,
    excluded: Predicate,
}

impl<F> Exclude<F> {
    /// Hide from `fs` every path for which `excluded` returns `true`.
    pub fn new(fs: F, excluded: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self::boxed(fs, Box::new(excluded))
    }

    pub(crate) fn boxed(fs: F, excluded: Predicate) -> Self {
        Self { fs, excluded }
    }

    /// Unwrap the inner filesystem.
    pub fn into_inner(self) -> F {
        self.fs
    }

    fn hides(&self, path: &str) -> bool {
        path != path::ROOT && (self.excluded)(path)
    }

    fn visible(&self, dir: &str, entries: Vec<DirEntry>) -> Vec<DirEntry> {
        entries
            .into_iter()
            .filter(|e| !self.hides(&path::join(dir, &e.name)))
            .collect()
    }

    fn denied(&self, path: &str, operation: &'static str) -> Result<(), FsError> {
        if self.hides(path) {
            return Err(FsError::PermissionDenied {
                path: path.into(),
                operation,
            });
        }
        Ok(())
    }
}

impl<F: fmt::Debug> fmt::Debug for Exclude<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exclude")
            .field("fs", &self.fs)
            .finish_non_exhaustive()
    }
}

impl<F: FsRead> FsRead for Exclude<F> {
    fn open(&self, path: &str) -> Result<Box<dyn VFile>, FsError> {
        path::check("open", path)?;
        if self.hides(path) {
            return Err(FsError::NotFound { path: path.into() });
        }
        let mut handle = self.fs.open(path)?;
        if !handle.stat()?.is_dir() {
            return Ok(handle);
        }
        let mut dir = File::from_handle(path, handle.as_mut())?;
        dir.entries = self.visible(path, dir.entries);
        Ok(dir.open())
    }

    fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        path::check("read_dir", path)?;
        if self.hides(path) {
            return Err(FsError::NotFound { path: path.into() });
        }
        Ok(self.visible(path, self.fs.read_dir(path)?))
    }

    fn stat(&self, path: &str) -> Result<FileInfo, FsError> {
        path::check("stat", path)?;
        if self.hides(path) {
            return Err(FsError::NotFound { path: path.into() });
        }
        self.fs.stat(path)
    }
}

impl<F: FsRead + FsWrite> FsWrite for Exclude<F> {
    fn open_file(
        &self,
        path: &str,
        flags: OpenFlags,
        mode: FileMode,
    ) -> Result<Box<dyn VFile>, FsError> {
        if flags.is_read_only() {
            return self.open(path);
        }
        path::check("open_file", path)?;
        self.denied(path, "open_file")?;
        self.fs.open_file(path, flags, mode)
    }

    fn mkdir_all(&self, path: &str, mode: FileMode) -> Result<(), FsError> {
        path::check("mkdir_all", path)?;
        self.denied(path, "mkdir_all")?;
        self.fs.mkdir_all(path, mode)
    }

    fn write_file(&self, path: &str, data: &[u8], mode: FileMode) -> Result<(), FsError> {
        path::check("write_file", path)?;
        self.denied(path, "write_file")?;
        self.fs.write_file(path, data, mode)
    }

    /// Removes only what is visible. A directory that still holds hidden
    /// entries afterwards is kept.
    fn remove_all(&self, path: &str) -> Result<(), FsError> {
        path::check("remove_all", path)?;
        if self.hides(path) {
            return Ok(());
        }
        let info = match self.fs.stat(path) {
            Ok(info) => info,
            Err(e) if e.is_not_found() => return Ok(()),
            Err(e) => return Err(e),
        };
        if !info.is_dir() {
            return self.fs.remove_all(path);
        }
        for entry in self.read_dir(path)? {
            self.remove_all(&path::join(path, &entry.name))?;
        }
        if path == path::ROOT {
            return Ok(());
        }
        match self.fs.read_dir(path) {
            Ok(left) if left.is_empty() => self.fs.remove_all(path),
            Ok(_) => Ok(()),
            // an implicit directory disappears with its last child
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e),
        }
    }
}
