//! Write operations for virtual filesystems.

use std::sync::Arc;

use crate::handle::VFile;
use crate::{FileMode, FsError, OpenFlags};

/// Write operations for a virtual filesystem.
///
/// All methods use `&self`; stores manage their own interior mutability.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsWrite`.
pub trait FsWrite: Send + Sync {
    /// Open `path` with explicit flags.
    ///
    /// In-memory stores only honor [`OpenFlags::READ`]; whole-file
    /// replacement goes through [`write_file`](FsWrite::write_file).
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidPath`] if `path` is not a valid slash path
    /// - [`FsError::NotSupported`] if the store declines the flags
    fn open_file(
        &self,
        path: &str,
        flags: OpenFlags,
        mode: FileMode,
    ) -> Result<Box<dyn VFile>, FsError>;

    /// Create a directory. Succeeds if it already exists.
    ///
    /// # Errors
    ///
    /// - [`FsError::AlreadyExists`] if a file occupies `path`
    fn mkdir_all(&self, path: &str, mode: FileMode) -> Result<(), FsError>;

    /// Replace (or create) the file at `path` with `data`.
    ///
    /// # Errors
    ///
    /// - [`FsError::AlreadyExists`] if a directory occupies `path`
    fn write_file(&self, path: &str, data: &[u8], mode: FileMode) -> Result<(), FsError>;

    /// Remove `path` and everything beneath it. Succeeds if absent.
    fn remove_all(&self, path: &str) -> Result<(), FsError>;
}

macro_rules! forward_fs_write {
    ($($ty:ty),*) => {$(
        impl<T: FsWrite + ?Sized> FsWrite for $ty {
            fn open_file(
                &self,
                path: &str,
                flags: OpenFlags,
                mode: FileMode,
            ) -> Result<Box<dyn VFile>, FsError> {
                (**self).open_file(path, flags, mode)
            }

            fn mkdir_all(&self, path: &str, mode: FileMode) -> Result<(), FsError> {
                (**self).mkdir_all(path, mode)
            }

            fn write_file(&self, path: &str, data: &[u8], mode: FileMode) -> Result<(), FsError> {
                (**self).write_file(path, data, mode)
            }

            fn remove_all(&self, path: &str) -> Result<(), FsError> {
                (**self).remove_all(path)
            }
        }
    )*};
}

forward_fs_write!(&T, Box<T>, Arc<T>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_write_is_object_safe() {
        fn _check(_: &dyn FsWrite) {}
    }

    #[test]
    fn fs_write_requires_send_sync() {
        fn _assert_send_sync<T: Send + Sync>() {}
        fn _check<T: FsWrite>() {
            _assert_send_sync::<T>();
        }
    }
}
