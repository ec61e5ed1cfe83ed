use crate::handle::VFile;
use crate::path::{self, ROOT};
use crate::{File, FileInfo, FsError, FsRead, Tree};

/// Presents `fs` under `dir`, synthesizing the parent directories.
///
/// Read-only. Paths outside `dir` and its ancestors do not exist.
///
/// ```rust
/// use virtfs::{FsRead, Map, Mount};
///
/// let src: Map = [("a.txt", "a")].into_iter().collect();
/// let fs = Mount::new("nested/src", src).unwrap();
/// assert!(fs.stat("nested").unwrap().is_dir());
/// assert_eq!(fs.read_file("nested/src/a.txt").unwrap(), b"a");
/// ```
#[derive(Debug)]
pub struct Mount<F> {
    dir: String,
    fs: F,
    dirs: Tree,
}

impl<F> Mount<F> {
    /// Mount `fs` at `dir`.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidPath`] if `dir` is not a valid slash path
    pub fn new(dir: &str, fs: F) -> Result<Self, FsError> {
        path::check("mount", dir)?;
        Ok(Self::unchecked(dir, fs))
    }

    pub(crate) fn unchecked(dir: &str, fs: F) -> Self {
        let dirs = Tree::new();
        if dir != ROOT {
            dirs.insert(dir, File::dir());
        }
        Self {
            dir: dir.to_string(),
            fs,
            dirs,
        }
    }

    /// The mount point.
    pub fn dir(&self) -> &str {
        &self.dir
    }
}

impl<F: FsRead> FsRead for Mount<F> {
    fn open(&self, path: &str) -> Result<Box<dyn VFile>, FsError> {
        path::check("open", path)?;
        if self.dir == ROOT {
            return self.fs.open(path);
        }
        if path == self.dir {
            return self.fs.open(ROOT);
        }
        match path
            .strip_prefix(self.dir.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
        {
            Some(inner) => self.fs.open(inner),
            None => self.dirs.open(path),
        }
    }

    fn stat(&self, path: &str) -> Result<FileInfo, FsError> {
        let mut info = self.open(path)?.stat()?;
        info.name = path::base(path).to_string();
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Map;

    fn mounted() -> Mount<Map> {
        let src: Map = [("a.txt", "a"), ("b/b.txt", "b")].into_iter().collect();
        Mount::new("nested/src", src).unwrap()
    }

    fn names(fs: &impl FsRead, dir: &str) -> Vec<String> {
        fs.read_dir(dir)
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect()
    }

    #[test]
    fn synthesizes_parents() {
        let fs = mounted();
        assert_eq!(names(&fs, "."), ["nested"]);
        assert_eq!(names(&fs, "nested"), ["src"]);
        assert_eq!(names(&fs, "nested/src"), ["a.txt", "b"]);
        assert_eq!(fs.read_file("nested/src/b/b.txt").unwrap(), b"b");
    }

    #[test]
    fn mount_point_stats_under_its_own_name() {
        let fs = mounted();
        let info = fs.stat("nested/src").unwrap();
        assert!(info.is_dir());
        assert_eq!(info.name, "src");
    }

    #[test]
    fn outside_paths_are_missing() {
        let fs = mounted();
        assert!(fs.open("a.txt").unwrap_err().is_not_found());
        assert!(fs.open("nested/srcx").unwrap_err().is_not_found());
        assert!(fs.open("other").unwrap_err().is_not_found());
    }

    #[test]
    fn root_mount_passes_through() {
        let src: Map = [("a.txt", "a")].into_iter().collect();
        let fs = Mount::new(".", src).unwrap();
        assert_eq!(names(&fs, "."), ["a.txt"]);
        assert_eq!(fs.dir(), ".");
    }
}
