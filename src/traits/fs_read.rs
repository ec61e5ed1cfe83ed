//! Read operations for virtual filesystems.

use std::io::Read;
use std::sync::Arc;

use crate::handle::VFile;
use crate::{DirEntry, FileInfo, FsError};

/// Read operations for a virtual filesystem.
///
/// Only [`open`](FsRead::open) is required; the rest default to opening the
/// path and working through the handle. Stores with a cheaper native route
/// (the OS adapter's `read_dir`) override them.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsRead`.
pub trait FsRead: Send + Sync {
    /// Open `path` for reading.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidPath`] if `path` is not a valid slash path
    /// - [`FsError::NotFound`] if nothing exists at `path`
    fn open(&self, path: &str) -> Result<Box<dyn VFile>, FsError>;

    /// List a directory, sorted by name.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    /// - [`FsError::NotADirectory`] if the path is a file
    fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        let mut handle = self.open(path)?;
        let mut entries = handle.read_dir(None)?;
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Stat a path.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    fn stat(&self, path: &str) -> Result<FileInfo, FsError> {
        self.open(path)?.stat()
    }

    /// Read a whole file.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    /// - [`FsError::NotAFile`] if the path is a directory
    fn read_file(&self, path: &str) -> Result<Vec<u8>, FsError> {
        let mut handle = self.open(path)?;
        if handle.stat()?.is_dir() {
            return Err(FsError::NotAFile { path: path.into() });
        }
        let mut data = Vec::new();
        handle
            .read_to_end(&mut data)
            .map_err(|e| FsError::from_io("read", path, e))?;
        Ok(data)
    }
}

macro_rules! forward_fs_read {
    ($($ty:ty),*) => {$(
        impl<T: FsRead + ?Sized> FsRead for $ty {
            fn open(&self, path: &str) -> Result<Box<dyn VFile>, FsError> {
                (**self).open(path)
            }

            fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
                (**self).read_dir(path)
            }

            fn stat(&self, path: &str) -> Result<FileInfo, FsError> {
                (**self).stat(path)
            }

            fn read_file(&self, path: &str) -> Result<Vec<u8>, FsError> {
                (**self).read_file(path)
            }
        }
    )*};
}

forward_fs_read!(&T, Box<T>, Arc<T>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::File;

    /// Serves a single directory `d` holding `b.txt` then `a.txt`, unsorted.
    struct Unsorted;

    impl FsRead for Unsorted {
        fn open(&self, path: &str) -> Result<Box<dyn VFile>, FsError> {
            match path {
                "d" => Ok(File::dir()
                    .with_path("d")
                    .with_entries(vec![
                        File::new("b").with_path("b.txt").entry(),
                        File::new("a").with_path("a.txt").entry(),
                    ])
                    .open()),
                "d/a.txt" => Ok(File::new("a").with_path(path).open()),
                _ => Err(FsError::NotFound { path: path.into() }),
            }
        }
    }

    #[test]
    fn fs_read_is_object_safe() {
        fn _check(_: &dyn FsRead) {}
    }

    #[test]
    fn default_read_dir_sorts() {
        let names: Vec<_> = Unsorted
            .read_dir("d")
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, ["a.txt", "b.txt"]);
    }

    #[test]
    fn default_read_file_rejects_dirs() {
        assert!(matches!(
            Unsorted.read_file("d"),
            Err(FsError::NotAFile { .. })
        ));
        assert_eq!(Unsorted.read_file("d/a.txt").unwrap(), b"a");
    }

    #[test]
    fn forwards_through_pointers() {
        let boxed: Box<dyn FsRead> = Box::new(Unsorted);
        assert!(boxed.stat("d").unwrap().is_dir());
        let shared = Arc::new(Unsorted);
        assert!((&shared).stat("missing").unwrap_err().is_not_found());
    }
}
