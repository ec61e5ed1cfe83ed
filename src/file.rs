//! The entry model: one file or directory node.

use std::io::{self, Read};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::RwLock;

use crate::handle::{DirHandle, FileHandle, VFile};
use crate::{DirEntry, FileInfo, FileMode, FsError, path};

/// A file or directory in a virtual filesystem.
///
/// A `File` is a directory iff its mode carries [`FileMode::DIR`]. `data` is
/// meaningless for directories; `entries` is meaningless for files and is
/// filled in when a directory is opened, never treated as ground truth by
/// the stores.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct File {
    /// Slash path of the entry. Stores set this on insert.
    pub path: String,
    /// Raw content.
    pub data: Vec<u8>,
    /// Mode bits; zero means unspecified.
    pub mode: FileMode,
    /// Last modification time; `None` means unset.
    #[cfg_attr(feature = "serde", serde(with = "crate::types::system_time_serde"))]
    pub mod_time: Option<SystemTime>,
    /// Child entries, populated for opened directories.
    pub entries: Vec<DirEntry>,
}

impl File {
    /// A regular file holding `data`, with unspecified mode and time.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            ..Default::default()
        }
    }

    /// An empty directory with only the directory flag set.
    pub fn dir() -> Self {
        Self {
            mode: FileMode::DIR,
            ..Default::default()
        }
    }

    /// Set the path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the mode.
    pub fn with_mode(mut self, mode: FileMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the modification time.
    pub fn with_mod_time(mut self, time: SystemTime) -> Self {
        self.mod_time = Some(time);
        self
    }

    /// Set the child entries.
    pub fn with_entries(mut self, entries: Vec<DirEntry>) -> Self {
        self.entries = entries;
        self
    }

    /// Base name of the path.
    pub fn name(&self) -> &str {
        path::base(&self.path)
    }

    /// Returns `true` if the directory flag is set.
    #[inline]
    pub fn is_dir(&self) -> bool {
        self.mode.is_dir()
    }

    /// Stat view of this file.
    pub fn info(&self) -> FileInfo {
        FileInfo {
            name: self.name().to_string(),
            size: self.data.len() as u64,
            mode: self.mode,
            mod_time: self.mod_time,
        }
    }

    /// Listing entry for this file, detached from it.
    pub fn entry(&self) -> DirEntry {
        self.entry_named(self.name())
    }

    pub(crate) fn entry_named(&self, name: &str) -> DirEntry {
        DirEntry {
            name: name.to_string(),
            size: self.data.len() as u64,
            mode: self.mode,
            mod_time: self.mod_time,
        }
    }

    /// Change fingerprint, see [`FileInfo::stamp`].
    pub fn stamp(&self) -> String {
        self.info().stamp()
    }

    /// Content as the body of an escaped string literal (`\x61\x62`).
    ///
    /// ```rust
    /// use virtfs::File;
    ///
    /// assert_eq!(File::new("ab").embed(), r"\x61\x62");
    /// ```
    pub fn embed(&self) -> String {
        const HEX: &[u8; 16] = b"0123456789abcdef";
        let mut s = String::with_capacity(self.data.len() * 4);
        for b in &self.data {
            s.push_str("\\x");
            s.push(HEX[(b >> 4) as usize] as char);
            s.push(HEX[(b & 0x0f) as usize] as char);
        }
        s
    }

    /// Wrap this file in a handle. Directories yield their `entries`.
    pub fn open(self) -> Box<dyn VFile> {
        if self.is_dir() {
            Box::new(DirHandle::new(self))
        } else {
            Box::new(FileHandle::new(Arc::new(RwLock::new(self))))
        }
    }

    /// Read an open handle into a detached `File`.
    ///
    /// Files are read in full; directories are enumerated and their entries
    /// sorted by name.
    pub fn from_handle(path: &str, handle: &mut dyn VFile) -> Result<Self, FsError> {
        let info = handle.stat()?;
        let mut file = File {
            path: path.to_string(),
            mode: info.mode,
            mod_time: info.mod_time,
            ..Default::default()
        };
        if info.is_dir() {
            let mut entries = handle.read_dir(None)?;
            entries.sort_by(|a, b| a.name.cmp(&b.name));
            file.entries = entries;
        } else {
            handle
                .read_to_end(&mut file.data)
                .map_err(|e| FsError::from_io("read", path, e))?;
        }
        Ok(file)
    }
}

/// Appends to `data`.
impl io::Write for File {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn name_is_base() {
        let f = File::new("x").with_path("a/b/c.txt");
        assert_eq!(f.name(), "c.txt");
        assert_eq!(File::dir().with_path(".").name(), ".");
    }

    #[test]
    fn info_reflects_fields() {
        let at = UNIX_EPOCH + Duration::from_secs(3);
        let f = File::new("abc")
            .with_path("a.txt")
            .with_mode(FileMode(0o600))
            .with_mod_time(at);
        let info = f.info();
        assert_eq!(info.name, "a.txt");
        assert_eq!(info.size, 3);
        assert_eq!(info.mode, FileMode(0o600));
        assert_eq!(info.mod_time, Some(at));
        assert!(!info.is_dir());
        assert_eq!(f.stamp(), "3:-rw-------:3000000000");
    }

    #[test]
    fn entry_is_detached() {
        let mut f = File::new("abc").with_path("d/a.txt");
        let entry = f.entry();
        f.data.clear();
        assert_eq!(entry.size, 3);
        assert_eq!(entry.name, "a.txt");
    }

    #[test]
    fn write_appends() {
        let mut f = File::new("a");
        f.write_all(b"bc").unwrap();
        write!(f, "d").unwrap();
        assert_eq!(f.data, b"abcd");
    }

    #[test]
    fn embed_empty() {
        assert_eq!(File::default().embed(), "");
        assert_eq!(File::new([0u8, 255]).embed(), r"\x00\xff");
    }

    #[test]
    fn open_and_read_back_file() {
        let mut handle = File::new("hello").with_path("h.txt").open();
        let back = File::from_handle("h.txt", handle.as_mut()).unwrap();
        assert_eq!(back.data, b"hello");
        assert_eq!(back.path, "h.txt");
    }

    #[test]
    fn open_and_read_back_dir() {
        let dir = File::dir().with_path("d").with_entries(vec![
            File::new("b").with_path("b").entry(),
            File::dir().with_path("a").entry(),
        ]);
        let mut handle = dir.open();
        let back = File::from_handle("d", handle.as_mut()).unwrap();
        assert!(back.is_dir());
        let names: Vec<_> = back.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn duplicate_entries_are_preserved() {
        let dir = File::dir().with_entries(vec![
            File::dir().with_path("a").entry(),
            File::dir().with_path("a").entry(),
        ]);
        let mut handle = dir.open();
        let entries = handle.read_dir(None).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "a");
        assert_eq!(entries[1].name, "a");
    }
}
