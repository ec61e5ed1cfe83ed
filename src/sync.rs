//! Diff and apply engines.
//!
//! [`diff`] walks two filesystems side by side and produces the ordered
//! [`SyncOp`]s that make the target match the source; [`apply`] executes
//! them. [`sync_fs`] does both.
//!
//! Per directory level the ops are: creates, then deletes, then whatever
//! the common entries produce (recursing into shared directories). Files
//! are compared by [`stamp`], never by content.
//!
//! ```rust
//! use virtfs::{File, FsRead, SyncKind, Tree, diff, sync_fs};
//!
//! let from: Tree = [("a.txt", File::new("a")), ("b.txt", File::new("b"))]
//!     .into_iter()
//!     .collect();
//! let to: Tree = [("b.txt", File::new("bb")), ("c.txt", File::new("c"))]
//!     .into_iter()
//!     .collect();
//!
//! let kinds: Vec<_> = diff(&from, &to, ".").unwrap().into_iter().map(|op| op.kind).collect();
//! assert_eq!(kinds, [SyncKind::Create, SyncKind::Delete, SyncKind::Update]);
//!
//! sync_fs(&from, &to, ".").unwrap();
//! assert_eq!(to.paths(), ["a.txt", "b.txt"]);
//! assert_eq!(to.read_file("b.txt").unwrap(), b"b");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use tracing::{debug, trace};

use crate::path::{self, ROOT};
use crate::{DirEntry, FileMode, Fs, FsError, FsRead, OsFs};

/// What a [`SyncOp`] does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncKind {
    /// Write a file that the target lacks.
    Create,
    /// Overwrite a file whose stamp changed.
    Update,
    /// Remove a path and everything beneath it.
    Delete,
}

impl fmt::Display for SyncKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SyncKind::Create => "create",
            SyncKind::Update => "update",
            SyncKind::Delete => "delete",
        })
    }
}

/// One mutation of the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOp {
    /// Kind of mutation.
    pub kind: SyncKind,
    /// Target path.
    pub path: String,
    /// New content; empty for deletes.
    pub data: Vec<u8>,
    /// Source mode; zero for deletes.
    pub mode: FileMode,
}

impl SyncOp {
    fn delete(path: String) -> Self {
        Self {
            kind: SyncKind::Delete,
            path,
            data: Vec::new(),
            mode: FileMode::default(),
        }
    }
}

/// `create a.txt -rw-r--r--`
impl fmt::Display for SyncOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.kind, self.path, self.mode)
    }
}

/// Modes substituted when an op carries none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Mode for written files whose permission bits are unset.
    pub default_file_mode: FileMode,
    /// Mode for parent directories created on the way to a file.
    pub default_dir_mode: FileMode,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            default_file_mode: FileMode::DEFAULT_FILE,
            default_dir_mode: FileMode::DEFAULT_DIR,
        }
    }
}

/// Fingerprint of `path`: `"size:mode:nanos"`, or `"-1:-1"` when absent.
pub fn stamp<F: FsRead + ?Sized>(fs: &F, path: &str) -> Result<String, FsError> {
    match fs.stat(path) {
        Ok(info) => Ok(info.stamp()),
        Err(e) if e.is_not_found() => Ok("-1:-1".to_string()),
        Err(e) => Err(e),
    }
}

/// Make `to` match `from` under `dir` (`""` means the root).
///
/// Running it twice is only a no-op when every source file carries explicit
/// permission bits and a modification time equal to the target's clock at
/// write time. Otherwise the modes and times the target assigns on write
/// keep the stamps apart, and the next sync rewrites those files.
pub fn sync_fs<S, T>(from: &S, to: &T, dir: &str) -> Result<(), FsError>
where
    S: FsRead + ?Sized,
    T: Fs + ?Sized,
{
    sync_fs_with(from, to, dir, &SyncOptions::default())
}

/// [`sync_fs`] with explicit default modes.
pub fn sync_fs_with<S, T>(
    from: &S,
    to: &T,
    dir: &str,
    options: &SyncOptions,
) -> Result<(), FsError>
where
    S: FsRead + ?Sized,
    T: Fs + ?Sized,
{
    let dir = if dir.is_empty() { ROOT } else { dir };
    let ops = diff(from, to, dir)?;
    debug!("sync(dir={}, ops={})", dir, ops.len());
    apply_with(to, &ops, options)
}

/// Make the directory `to_dir` on disk match `from` under `dir`.
pub fn sync<S: FsRead + ?Sized>(
    from: &S,
    to_dir: impl AsRef<Path>,
    dir: &str,
) -> Result<(), FsError> {
    sync_fs(from, &OsFs::new(to_dir.as_ref()), dir)
}

/// Compute the ops that make `to` match `from` under `dir`.
///
/// A missing `dir` in the target counts as empty; in the source it is an
/// error.
pub fn diff<S, T>(from: &S, to: &T, dir: &str) -> Result<Vec<SyncOp>, FsError>
where
    S: FsRead + ?Sized,
    T: FsRead + ?Sized,
{
    let source = by_name(from.read_dir(dir)?);
    let target = match to.read_dir(dir) {
        Ok(entries) => by_name(entries),
        Err(e) if e.is_not_found() => BTreeMap::new(),
        Err(e) => return Err(e),
    };

    let mut ops = Vec::new();
    let mut common = Vec::new();
    for (name, entry) in &source {
        if !target.contains_key(name) {
            create_ops(from, dir, entry, &mut ops)?;
        }
    }
    for name in target.keys() {
        if name != ROOT && !source.contains_key(name) {
            ops.push(SyncOp::delete(path::join(dir, name)));
        }
    }
    for (name, entry) in &source {
        if let Some(existing) = target.get(name) {
            common.push((entry, existing));
        }
    }
    for (entry, existing) in common {
        update_ops(from, to, dir, entry, existing, &mut ops)?;
    }
    Ok(ops)
}

fn by_name(entries: Vec<DirEntry>) -> BTreeMap<String, DirEntry> {
    entries.into_iter().map(|e| (e.name.clone(), e)).collect()
}

fn create_ops<S: FsRead + ?Sized>(
    from: &S,
    dir: &str,
    entry: &DirEntry,
    ops: &mut Vec<SyncOp>,
) -> Result<(), FsError> {
    if entry.name == ROOT {
        return Ok(());
    }
    let path = path::join(dir, &entry.name);
    if entry.is_dir() {
        let children = match from.read_dir(&path) {
            Ok(children) => children,
            Err(e) if e.is_not_found() => {
                trace!("diff: source directory {} vanished", path);
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        for child in &children {
            create_ops(from, &path, child, ops)?;
        }
        return Ok(());
    }
    let data = match from.read_file(&path) {
        Ok(data) => data,
        Err(e) if e.is_not_found() => {
            trace!("diff: source file {} vanished", path);
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    ops.push(SyncOp {
        kind: SyncKind::Create,
        path,
        data,
        mode: entry.mode,
    });
    Ok(())
}

fn update_ops<S, T>(
    from: &S,
    to: &T,
    dir: &str,
    entry: &DirEntry,
    existing: &DirEntry,
    ops: &mut Vec<SyncOp>,
) -> Result<(), FsError>
where
    S: FsRead + ?Sized,
    T: FsRead + ?Sized,
{
    if entry.name == ROOT {
        return Ok(());
    }
    let path = path::join(dir, &entry.name);
    match (entry.is_dir(), existing.is_dir()) {
        (true, true) => {
            ops.extend(diff(from, to, &path)?);
            return Ok(());
        }
        // one side is a file, the other a directory: replace wholesale
        (true, false) | (false, true) => {
            trace!("diff: {} changed kind", path);
            ops.push(SyncOp::delete(path));
            return create_ops(from, dir, entry, ops);
        }
        (false, false) => {}
    }

    let source_stamp = stamp(from, &path)?;
    let target_stamp = stamp(to, &path)?;
    if source_stamp == target_stamp {
        trace!("diff: {} unchanged stamp={}", path, source_stamp);
        return Ok(());
    }
    let data = match from.read_file(&path) {
        Ok(data) => data,
        Err(e) if e.is_not_found() => {
            trace!("diff: source file {} vanished, deleting", path);
            ops.push(SyncOp::delete(path));
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    let from_mode = from.stat(&path)?.mode;
    let to_mode = to.stat(&path)?.mode;
    if from_mode != to_mode {
        ops.push(SyncOp::delete(path.clone()));
    }
    ops.push(SyncOp {
        kind: SyncKind::Update,
        path,
        data,
        mode: from_mode,
    });
    Ok(())
}

/// Execute `ops` in order against `to`, stopping at the first failure.
pub fn apply<T: Fs + ?Sized>(to: &T, ops: &[SyncOp]) -> Result<(), FsError> {
    apply_with(to, ops, &SyncOptions::default())
}

/// [`apply`] with explicit default modes.
pub fn apply_with<T: Fs + ?Sized>(
    to: &T,
    ops: &[SyncOp],
    options: &SyncOptions,
) -> Result<(), FsError> {
    for op in ops {
        debug!("apply: {}", op);
        match op.kind {
            SyncKind::Create => {
                to.mkdir_all(path::dir(&op.path), options.default_dir_mode)?;
                to.write_file(&op.path, &op.data, file_mode(op.mode, options))?;
            }
            SyncKind::Update => {
                to.write_file(&op.path, &op.data, file_mode(op.mode, options))?;
            }
            SyncKind::Delete => to.remove_all(&op.path)?,
        }
    }
    Ok(())
}

fn file_mode(mode: FileMode, options: &SyncOptions) -> FileMode {
    if mode.is_zero() {
        options.default_file_mode
    } else {
        mode
    }
}
