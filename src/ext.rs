//! # Extension Traits
//!
//! Convenience methods for every filesystem.
//!
//! [`FsReadExt`] is blanket-implemented over [`FsRead`], so stores,
//! decorators and trait objects all get it for free.
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`exists`](FsReadExt::exists) | Check if anything is at a path |
//! | [`is_file`](FsReadExt::is_file) | Check if path is a regular file |
//! | [`is_dir`](FsReadExt::is_dir) | Check if path is a directory |
//! | [`read_to_string`](FsReadExt::read_to_string) | Read a UTF-8 file |
//! | [`walk`](FsReadExt::walk) | Visit a subtree in lexical pre-order |
//!
//! ## JSON Support (Feature-Gated)
//!
//! With the `serde` feature enabled, `FsExtJson` adds `read_json` and
//! `write_json`.

use std::io;

use crate::{FileInfo, FsError, FsRead, path};

/// Extension methods for any readable filesystem.
///
/// ```rust
/// use virtfs::{File, FsReadExt, Tree};
///
/// let tree: Tree = [("a/b.txt", File::new("b"))].into_iter().collect();
/// assert!(tree.is_dir("a").unwrap());
/// assert!(tree.is_file("a/b.txt").unwrap());
/// assert!(!tree.exists("c").unwrap());
/// ```
pub trait FsReadExt: FsRead {
    /// Check if anything exists at `path`.
    ///
    /// Returns `Ok(false)` if the path doesn't exist (not an error).
    fn exists(&self, path: &str) -> Result<bool, FsError> {
        match self.stat(path) {
            Ok(_) => Ok(true),
            Err(FsError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Check if the path points to a regular file.
    ///
    /// Returns `Ok(false)` if the path doesn't exist (not an error).
    fn is_file(&self, path: &str) -> Result<bool, FsError> {
        match self.stat(path) {
            Ok(info) => Ok(!info.is_dir()),
            Err(FsError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Check if the path points to a directory, explicit or implied.
    ///
    /// Returns `Ok(false)` if the path doesn't exist (not an error).
    fn is_dir(&self, path: &str) -> Result<bool, FsError> {
        match self.stat(path) {
            Ok(info) => Ok(info.is_dir()),
            Err(FsError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Read a whole file as UTF-8.
    ///
    /// # Errors
    ///
    /// - [`FsError::Io`] with [`io::ErrorKind::InvalidData`] if the content
    ///   isn't valid UTF-8
    fn read_to_string(&self, path: &str) -> Result<String, FsError> {
        String::from_utf8(self.read_file(path)?).map_err(|e| FsError::Io {
            operation: "read_to_string",
            path: path.into(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })
    }

    /// Call `visit` on `root` and everything beneath it, parents before
    /// children, siblings in name order.
    ///
    /// ```rust
    /// use virtfs::{File, FsReadExt, Tree};
    ///
    /// let tree: Tree = [("b.txt", File::new("b")), ("a/c.txt", File::new("c"))]
    ///     .into_iter()
    ///     .collect();
    /// let mut seen = Vec::new();
    /// tree.walk(".", &mut |path, _| {
    ///     seen.push(path.to_string());
    ///     Ok(())
    /// })
    /// .unwrap();
    /// assert_eq!(seen, [".", "a", "a/c.txt", "b.txt"]);
    /// ```
    fn walk(
        &self,
        root: &str,
        visit: &mut dyn FnMut(&str, &FileInfo) -> Result<(), FsError>,
    ) -> Result<(), FsError> {
        let info = self.stat(root)?;
        walk_from(self, root, &info, visit)
    }
}

fn walk_from<F: FsRead + ?Sized>(
    fs: &F,
    dir: &str,
    info: &FileInfo,
    visit: &mut dyn FnMut(&str, &FileInfo) -> Result<(), FsError>,
) -> Result<(), FsError> {
    visit(dir, info)?;
    if !info.is_dir() {
        return Ok(());
    }
    for entry in fs.read_dir(dir)? {
        let child = path::join(dir, &entry.name);
        walk_from(fs, &child, &entry.info(), visit)?;
    }
    Ok(())
}

// Blanket implementation - any filesystem gets FsReadExt for free
impl<F: FsRead + ?Sized> FsReadExt for F {}

// =============================================================================
// JSON Support (Feature-Gated)
// =============================================================================

#[cfg(feature = "serde")]
mod json {
    use super::*;
    use crate::{FileMode, Fs};
    use serde::{Serialize, de::DeserializeOwned};

    /// JSON serialization extension methods.
    ///
    /// Available when the `serde` feature is enabled.
    pub trait FsExtJson: Fs {
        /// Read a file and deserialize it as JSON.
        ///
        /// # Errors
        ///
        /// - `FsError::NotFound` if the file doesn't exist
        /// - `FsError::Deserialization` if JSON parsing failed
        fn read_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FsError> {
            let data = self.read_file(path)?;
            serde_json::from_slice(&data).map_err(|e| FsError::Deserialization(e.to_string()))
        }

        /// Serialize a value and write it as pretty-printed JSON.
        ///
        /// # Errors
        ///
        /// - `FsError::Serialization` if JSON serialization failed
        fn write_json<T: Serialize>(
            &self,
            path: &str,
            value: &T,
            mode: FileMode,
        ) -> Result<(), FsError> {
            let json = serde_json::to_vec_pretty(value)
                .map_err(|e| FsError::Serialization(e.to_string()))?;
            self.write_file(path, &json, mode)
        }
    }

    // Blanket implementation
    impl<F: Fs + ?Sized> FsExtJson for F {}
}

#[cfg(feature = "serde")]
pub use json::FsExtJson;
