//! Adapter over a directory of the real filesystem.

use std::fs;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::handle::VFile;
use crate::path::{self, ROOT};
use crate::{DirEntry, FileInfo, FileMode, FsError, FsRead, FsWrite, OpenFlags};

/// A filesystem rooted at a directory on disk.
///
/// Slash paths are joined onto the root; nothing escapes it because `..`
/// never passes validation.
#[derive(Debug, Clone)]
pub struct OsFs {
    root: PathBuf,
}

impl OsFs {
    /// Serve the directory at `root`. The directory need not exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory being served.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        if path == ROOT {
            self.root.clone()
        } else {
            self.root.join(path)
        }
    }
}

fn mode_of(meta: &fs::Metadata) -> FileMode {
    #[cfg(unix)]
    let perm = {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & FileMode::PERM.bits()
    };
    #[cfg(not(unix))]
    let perm = if meta.permissions().readonly() {
        0o444
    } else {
        0o666
    };
    let mode = FileMode(perm);
    if meta.is_dir() { mode | FileMode::DIR } else { mode }
}

fn info_of(name: &str, meta: &fs::Metadata) -> FileInfo {
    FileInfo {
        name: name.to_string(),
        size: if meta.is_dir() { 0 } else { meta.len() },
        mode: mode_of(meta),
        mod_time: meta.modified().ok(),
    }
}

fn list(full: &Path, path: &str) -> Result<Vec<DirEntry>, FsError> {
    let mut entries = Vec::new();
    let iter = fs::read_dir(full).map_err(|e| FsError::from_io("read_dir", path, e))?;
    for entry in iter {
        let entry = entry.map_err(|e| FsError::from_io("read_dir", path, e))?;
        let meta = entry
            .metadata()
            .map_err(|e| FsError::from_io("read_dir", path, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let info = info_of(&name, &meta);
        entries.push(DirEntry {
            name: info.name,
            size: info.size,
            mode: info.mode,
            mod_time: info.mod_time,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

impl FsRead for OsFs {
    fn open(&self, path: &str) -> Result<Box<dyn VFile>, FsError> {
        self.open_file(path, OpenFlags::READ, FileMode::default())
    }

    fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        path::check("read_dir", path)?;
        list(&self.resolve(path), path)
    }

    fn stat(&self, path: &str) -> Result<FileInfo, FsError> {
        path::check("stat", path)?;
        let meta =
            fs::metadata(self.resolve(path)).map_err(|e| FsError::from_io("stat", path, e))?;
        Ok(info_of(path::base(path), &meta))
    }
}

impl FsWrite for OsFs {
    fn open_file(
        &self,
        path: &str,
        flags: OpenFlags,
        mode: FileMode,
    ) -> Result<Box<dyn VFile>, FsError> {
        path::check("open_file", path)?;
        let full = self.resolve(path);
        if let Ok(meta) = fs::metadata(&full) {
            if meta.is_dir() {
                if !flags.is_read_only() {
                    return Err(FsError::NotAFile { path: path.into() });
                }
                return Ok(Box::new(OsHandle::dir(path, full)));
            }
        }

        let mut options = fs::OpenOptions::new();
        options
            .read(flags.read)
            .write(flags.write)
            .append(flags.append)
            .truncate(flags.truncate)
            .create(flags.create);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            if !mode.perm().is_zero() {
                options.mode(mode.perm().bits());
            }
        }
        #[cfg(not(unix))]
        let _ = mode;
        let file = options
            .open(&full)
            .map_err(|e| FsError::from_io("open_file", path, e))?;
        Ok(Box::new(OsHandle::file(path, file)))
    }

    fn mkdir_all(&self, path: &str, mode: FileMode) -> Result<(), FsError> {
        path::check("mkdir_all", path)?;
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            if !mode.perm().is_zero() {
                builder.mode(mode.perm().bits());
            }
        }
        #[cfg(not(unix))]
        let _ = mode;
        builder
            .create(self.resolve(path))
            .map_err(|e| FsError::from_io("mkdir_all", path, e))
    }

    fn write_file(&self, path: &str, data: &[u8], mode: FileMode) -> Result<(), FsError> {
        path::check("write_file", path)?;
        let mut handle = match self.open_file(path, OpenFlags::WRITE, mode) {
            Err(FsError::NotAFile { .. }) => {
                return Err(FsError::AlreadyExists {
                    path: path.into(),
                    operation: "write_file",
                });
            }
            opened => opened?,
        };
        handle
            .write_all(data)
            .map_err(|e| FsError::from_io("write_file", path, e))
    }

    fn remove_all(&self, path: &str) -> Result<(), FsError> {
        path::check("remove_all", path)?;
        let full = self.resolve(path);
        let meta = match fs::symlink_metadata(&full) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(FsError::from_io("remove_all", path, e)),
        };
        let removed = if meta.is_dir() {
            fs::remove_dir_all(&full)
        } else {
            fs::remove_file(&full)
        };
        match removed {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FsError::from_io("remove_all", path, e)),
        }
    }
}

/// Handle over an open file or directory on disk.
#[derive(Debug)]
pub struct OsHandle {
    path: String,
    inner: Inner,
}

#[derive(Debug)]
enum Inner {
    File(fs::File),
    Dir {
        full: PathBuf,
        entries: Option<Vec<DirEntry>>,
        cursor: usize,
    },
}

impl OsHandle {
    fn file(path: &str, file: fs::File) -> Self {
        Self {
            path: path.to_string(),
            inner: Inner::File(file),
        }
    }

    fn dir(path: &str, full: PathBuf) -> Self {
        Self {
            path: path.to_string(),
            inner: Inner::Dir {
                full,
                entries: None,
                cursor: 0,
            },
        }
    }
}

fn is_a_directory(path: &str) -> io::Error {
    FsError::NotAFile { path: path.into() }.into()
}

impl Read for OsHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.inner {
            Inner::File(file) => file.read(buf),
            Inner::Dir { .. } => Err(is_a_directory(&self.path)),
        }
    }
}

impl Write for OsHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            Inner::File(file) => file.write(buf),
            Inner::Dir { .. } => Err(is_a_directory(&self.path)),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            Inner::File(file) => file.flush(),
            Inner::Dir { .. } => Ok(()),
        }
    }
}

impl Seek for OsHandle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match &mut self.inner {
            Inner::File(file) => file.seek(pos),
            Inner::Dir { .. } => Err(is_a_directory(&self.path)),
        }
    }
}

impl VFile for OsHandle {
    fn stat(&self) -> Result<FileInfo, FsError> {
        let meta = match &self.inner {
            Inner::File(file) => file.metadata(),
            Inner::Dir { full, .. } => fs::metadata(full),
        }
        .map_err(|e| FsError::from_io("stat", &self.path, e))?;
        Ok(info_of(path::base(&self.path), &meta))
    }

    fn read_dir(&mut self, n: Option<usize>) -> Result<Vec<DirEntry>, FsError> {
        let Inner::Dir {
            full,
            entries,
            cursor,
        } = &mut self.inner
        else {
            return Err(FsError::NotADirectory {
                path: self.path.clone(),
            });
        };
        if entries.is_none() {
            *entries = Some(list(full, &self.path)?);
        }
        let rest: &[DirEntry] = match entries {
            Some(all) => &all[*cursor..],
            None => &[],
        };
        let take = n.map_or(rest.len(), |n| n.min(rest.len()));
        let out = rest[..take].to_vec();
        *cursor += take;
        Ok(out)
    }

    fn close(self: Box<Self>) -> Result<(), FsError> {
        if let Inner::File(file) = &self.inner {
            file.sync_all()
                .map_err(|e| FsError::from_io("close", &self.path, e))?;
        }
        Ok(())
    }
}
