use crate::handle::VFile;
use crate::path;
use crate::{DirEntry, FileInfo, FileMode, FsError, FsRead, FsWrite, OpenFlags};

/// A view of `fs` rooted at one of its directories.
///
/// Every path is joined onto the directory before it reaches the inner
/// filesystem, writes included.
///
/// ```rust
/// use virtfs::{File, FsRead, Sub, Tree};
///
/// let tree: Tree = [("bud/view/index.svelte", File::new("<h1>")),].into_iter().collect();
/// let view = Sub::new(&tree, "bud/view").unwrap();
/// assert_eq!(view.read_file("index.svelte").unwrap(), b"<h1>");
/// ```
#[derive(Debug, Clone)]
pub struct Sub<F> {
    fs: F,
    dir: String,
}

impl<F> Sub<F> {
    /// Root `fs` at `dir`.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidPath`] if `dir` is not a valid slash path
    pub fn new(fs: F, dir: &str) -> Result<Self, FsError> {
        path::check("sub", dir)?;
        Ok(Self::unchecked(fs, dir))
    }

    pub(crate) fn unchecked(fs: F, dir: &str) -> Self {
        Self {
            fs,
            dir: dir.to_string(),
        }
    }

    /// The directory this view is rooted at.
    pub fn dir(&self) -> &str {
        &self.dir
    }

    /// Unwrap the inner filesystem.
    pub fn into_inner(self) -> F {
        self.fs
    }

    fn resolve(&self, operation: &'static str, name: &str) -> Result<String, FsError> {
        path::check(operation, name)?;
        Ok(path::join(&self.dir, name))
    }
}

impl<F: FsRead> FsRead for Sub<F> {
    fn open(&self, path: &str) -> Result<Box<dyn VFile>, FsError> {
        self.fs.open(&self.resolve("open", path)?)
    }

    fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        self.fs.read_dir(&self.resolve("read_dir", path)?)
    }

    fn stat(&self, path: &str) -> Result<FileInfo, FsError> {
        self.fs.stat(&self.resolve("stat", path)?)
    }
}

impl<F: FsWrite> FsWrite for Sub<F> {
    fn open_file(
        &self,
        path: &str,
        flags: OpenFlags,
        mode: FileMode,
    ) -> Result<Box<dyn VFile>, FsError> {
        self.fs
            .open_file(&self.resolve("open_file", path)?, flags, mode)
    }

    fn mkdir_all(&self, path: &str, mode: FileMode) -> Result<(), FsError> {
        self.fs.mkdir_all(&self.resolve("mkdir_all", path)?, mode)
    }

    fn write_file(&self, path: &str, data: &[u8], mode: FileMode) -> Result<(), FsError> {
        self.fs
            .write_file(&self.resolve("write_file", path)?, data, mode)
    }

    fn remove_all(&self, path: &str) -> Result<(), FsError> {
        self.fs.remove_all(&self.resolve("remove_all", path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{File, Tree};

    fn tree() -> Tree {
        [
            ("a/b/c.txt", File::new("c")),
            ("a/d.txt", File::new("d")),
            ("e.txt", File::new("e")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn reads_relative_to_dir() {
        let tree = tree();
        let sub = Sub::new(&tree, "a").unwrap();
        let names: Vec<_> = sub
            .read_dir(".")
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, ["b", "d.txt"]);
        assert_eq!(sub.read_file("b/c.txt").unwrap(), b"c");
        assert!(sub.open("e.txt").unwrap_err().is_not_found());
    }

    #[test]
    fn writes_land_under_dir() {
        let tree = tree();
        let sub = Sub::new(&tree, "a/b").unwrap();
        sub.write_file("new.txt", b"n", FileMode::DEFAULT_FILE)
            .unwrap();
        sub.remove_all("c.txt").unwrap();
        assert_eq!(tree.read_file("a/b/new.txt").unwrap(), b"n");
        assert!(!tree.contains("a/b/c.txt"));
    }

    #[test]
    fn validates_both_sides() {
        assert!(matches!(
            Sub::new(Tree::new(), "/abs"),
            Err(FsError::InvalidPath { .. })
        ));
        let sub = Sub::new(Tree::new(), "a").unwrap();
        assert!(matches!(
            sub.open("../x"),
            Err(FsError::InvalidPath { .. })
        ));
    }

    #[test]
    fn root_sub_is_identity() {
        let sub = Sub::new(tree(), ".").unwrap();
        assert_eq!(sub.read_file("e.txt").unwrap(), b"e");
        assert_eq!(sub.dir(), ".");
        assert_eq!(sub.into_inner().len(), 3);
    }
}
