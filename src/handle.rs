//! Open handles returned by every `open` call.
//!
//! A handle is either a cursor over a file's bytes ([`FileHandle`]) or an
//! enumeration cursor over a directory's synthesized children
//! ([`DirHandle`]). Closing releases nothing; dropping the handle is enough.
//!
//! ```rust
//! use std::io::{Read, Seek, SeekFrom};
//! use virtfs::File;
//!
//! let mut h = File::new("hello").open();
//! h.seek(SeekFrom::End(-3)).unwrap();
//! let mut s = String::new();
//! h.read_to_string(&mut s).unwrap();
//! assert_eq!(s, "llo");
//! ```

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::{DirEntry, File, FileInfo, FsError};

/// An open file or directory.
///
/// Directory handles fail byte I/O; file handles fail enumeration.
pub trait VFile: Read + Write + Seek + Send {
    /// Stat the underlying entry as it is now.
    fn stat(&self) -> Result<FileInfo, FsError>;

    /// Enumerate children.
    ///
    /// `Some(n)` returns at most the next `n` entries and an empty list once
    /// the cursor is exhausted; `None` returns everything that remains.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotADirectory`] if the handle is over a file
    fn read_dir(&mut self, n: Option<usize>) -> Result<Vec<DirEntry>, FsError>;

    /// Release the handle. Always succeeds for in-memory handles.
    fn close(self: Box<Self>) -> Result<(), FsError> {
        Ok(())
    }
}

impl std::fmt::Debug for dyn VFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn VFile")
    }
}

/// Handle over a stored file's bytes.
///
/// Shares the file with the store that opened it, so writes made through
/// that same file are visible here.
#[derive(Debug)]
pub struct FileHandle {
    file: Arc<RwLock<File>>,
    offset: u64,
}

impl FileHandle {
    pub(crate) fn new(file: Arc<RwLock<File>>) -> Self {
        Self { file, offset: 0 }
    }

    fn invalid(&self, operation: &'static str) -> io::Error {
        FsError::InvalidArgument {
            path: self.file.read().path.clone(),
            operation,
        }
        .into()
    }
}

impl Read for FileHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let file = self.file.read();
        let len = file.data.len() as u64;
        if self.offset >= len {
            return Ok(0);
        }
        let start = self.offset as usize;
        let n = buf.len().min(file.data.len() - start);
        buf[..n].copy_from_slice(&file.data[start..start + n]);
        self.offset += n as u64;
        Ok(n)
    }
}

/// Overwrites in place from the current offset. The content never grows
/// through a handle; whole-file replacement goes through the store.
impl Write for FileHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self.file.write();
        let start = (self.offset as usize).min(file.data.len());
        let n = buf.len().min(file.data.len() - start);
        file.data[start..start + n].copy_from_slice(&buf[..n]);
        self.offset += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for FileHandle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let len = self.file.read().data.len() as i128;
        let target = match pos {
            SeekFrom::Start(n) => n as i128,
            SeekFrom::Current(n) => self.offset as i128 + n as i128,
            SeekFrom::End(n) => len + n as i128,
        };
        if target < 0 || target > len {
            return Err(self.invalid("seek"));
        }
        self.offset = target as u64;
        Ok(self.offset)
    }
}

impl VFile for FileHandle {
    fn stat(&self) -> Result<FileInfo, FsError> {
        Ok(self.file.read().info())
    }

    fn read_dir(&mut self, _n: Option<usize>) -> Result<Vec<DirEntry>, FsError> {
        Err(FsError::NotADirectory {
            path: self.file.read().path.clone(),
        })
    }
}

/// Handle over a directory's children.
///
/// Entries are returned exactly as given: sorted by whoever built the
/// directory, duplicates kept.
#[derive(Debug)]
pub struct DirHandle {
    dir: File,
    cursor: usize,
}

impl DirHandle {
    pub(crate) fn new(dir: File) -> Self {
        Self { dir, cursor: 0 }
    }

    fn is_a_directory(&self) -> io::Error {
        FsError::NotAFile {
            path: self.dir.path.clone(),
        }
        .into()
    }
}

impl Read for DirHandle {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(self.is_a_directory())
    }
}

impl Write for DirHandle {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(self.is_a_directory())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for DirHandle {
    fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        Err(self.is_a_directory())
    }
}

impl VFile for DirHandle {
    fn stat(&self) -> Result<FileInfo, FsError> {
        Ok(self.dir.info())
    }

    fn read_dir(&mut self, n: Option<usize>) -> Result<Vec<DirEntry>, FsError> {
        let rest = &self.dir.entries[self.cursor..];
        let take = n.map_or(rest.len(), |n| n.min(rest.len()));
        let out = rest[..take].to_vec();
        self.cursor += take;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FileMode;

    fn shared(data: &str) -> Arc<RwLock<File>> {
        Arc::new(RwLock::new(File::new(data).with_path("f.txt")))
    }

    #[test]
    fn reads_until_end() {
        let mut h = FileHandle::new(shared("abcdef"));
        let mut buf = [0u8; 4];
        assert_eq!(h.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf, b"abcd");
        assert_eq!(h.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"ef");
        assert_eq!(h.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn seek_bounds() {
        let mut h = FileHandle::new(shared("abc"));
        assert_eq!(h.seek(SeekFrom::End(0)).unwrap(), 3);
        assert_eq!(h.seek(SeekFrom::Current(-1)).unwrap(), 2);
        assert_eq!(h.seek(SeekFrom::Start(0)).unwrap(), 0);

        let err = h.seek(SeekFrom::Start(4)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        let err = h.seek(SeekFrom::Current(-1)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        // failed seeks leave the offset alone
        assert_eq!(h.stream_position().unwrap(), 0);
    }

    #[test]
    fn write_overwrites_in_place_without_growing() {
        let file = shared("abc");
        let mut h = FileHandle::new(file.clone());
        h.seek(SeekFrom::Start(1)).unwrap();
        assert_eq!(h.write(b"XYZ").unwrap(), 2);
        assert_eq!(file.read().data, b"aXY");
        assert_eq!(h.write(b"Q").unwrap(), 0);
    }

    #[test]
    fn observes_live_mutation() {
        let file = shared("abc");
        let h = FileHandle::new(file.clone());
        file.write().data.extend_from_slice(b"def");
        assert_eq!(h.stat().unwrap().size, 6);
    }

    #[test]
    fn file_handle_refuses_enumeration() {
        let mut h = FileHandle::new(shared("abc"));
        assert!(matches!(
            h.read_dir(None),
            Err(FsError::NotADirectory { .. })
        ));
    }

    #[test]
    fn dir_handle_cursor() {
        let entries = ["a", "b", "c"]
            .iter()
            .map(|n| File::dir().with_path(*n).entry())
            .collect();
        let mut h = DirHandle::new(File::dir().with_path("d").with_entries(entries));
        let first = h.read_dir(Some(2)).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[1].name, "b");
        let rest = h.read_dir(None).unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].name, "c");
        assert!(h.read_dir(Some(1)).unwrap().is_empty());
    }

    #[test]
    fn dir_handle_refuses_bytes() {
        let mut h = DirHandle::new(File::dir().with_path("d"));
        let err = h.read(&mut [0u8; 1]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::IsADirectory);
        assert_eq!(h.stat().unwrap().mode, FileMode::DIR);
    }

    #[test]
    fn close_always_succeeds() {
        let h: Box<dyn VFile> = File::new("x").open();
        assert!(h.close().is_ok());
    }
}
