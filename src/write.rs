//! One-way copy between filesystems.
//!
//! Unlike [`sync_fs`](crate::sync_fs), writing never deletes anything from
//! the target and does not compare stamps: every file is rewritten.

use std::path::Path;

use tracing::debug;

use crate::path::ROOT;
use crate::{FileMode, Fs, FsError, FsRead, FsReadExt, OsFs, SyncOptions};

/// Copy every directory and file under `dir` (`""` means the root) from
/// `from` into `to`.
///
/// Entries whose permission bits are unset are written with `0o755`
/// (directories) or `0o644` (files).
///
/// # Errors
///
/// - [`FsError::NotFound`] if `dir` does not exist in `from`
///
/// ```rust
/// use virtfs::{FsRead, Map, Tree, write_fs};
///
/// let from: Map = [("a/b.txt", "b")].into_iter().collect();
/// let to = Tree::new();
/// write_fs(&from, &to, ".").unwrap();
/// assert_eq!(to.read_file("a/b.txt").unwrap(), b"b");
/// assert_eq!(to.paths(), ["a", "a/b.txt"]);
/// ```
pub fn write_fs<S, T>(from: &S, to: &T, dir: &str) -> Result<(), FsError>
where
    S: FsRead + ?Sized,
    T: Fs + ?Sized,
{
    let dir = if dir.is_empty() { ROOT } else { dir };
    let defaults = SyncOptions::default();
    let mut written = 0usize;
    from.walk(dir, &mut |path, info| {
        if path == ROOT {
            return Ok(());
        }
        if info.is_dir() {
            let mode = if info.mode.perm().is_zero() {
                defaults.default_dir_mode
            } else {
                info.mode | FileMode::DIR
            };
            return to.mkdir_all(path, mode);
        }
        let data = from.read_file(path)?;
        let mode = if info.mode.perm().is_zero() {
            defaults.default_file_mode
        } else {
            info.mode.perm()
        };
        to.write_file(path, &data, mode)?;
        written += 1;
        Ok(())
    })?;
    debug!("write(dir={}, files={})", dir, written);
    Ok(())
}

/// Copy `from` under `dir` into the directory `to_dir` on disk.
pub fn write<S: FsRead + ?Sized>(
    from: &S,
    to_dir: impl AsRef<Path>,
    dir: &str,
) -> Result<(), FsError> {
    write_fs(from, &OsFs::new(to_dir.as_ref()), dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{File, FsWrite, Tree};

    #[test]
    fn keeps_existing_target_files() {
        let from: Tree = [("a.txt", File::new("a"))].into_iter().collect();
        let to: Tree = [("keep.txt", File::new("k")), ("a.txt", File::new("old"))]
            .into_iter()
            .collect();
        write_fs(&from, &to, "").unwrap();
        assert_eq!(to.paths(), ["a.txt", "keep.txt"]);
        assert_eq!(to.read_file("a.txt").unwrap(), b"a");
    }

    #[test]
    fn preserves_explicit_modes() {
        let from: Tree = [
            ("bin", File::dir().with_mode(FileMode::DIR | FileMode(0o700))),
            ("bin/run", File::new("#!").with_mode(FileMode(0o755))),
        ]
        .into_iter()
        .collect();
        let to = Tree::new();
        write_fs(&from, &to, ".").unwrap();
        assert_eq!(to.stat("bin").unwrap().mode.perm(), FileMode(0o700));
        assert_eq!(to.stat("bin/run").unwrap().mode, FileMode(0o755));
    }

    #[test]
    fn subdirectory_only() {
        let from: Tree = [("a/x.txt", File::new("x")), ("b/y.txt", File::new("y"))]
            .into_iter()
            .collect();
        let to = Tree::new();
        write_fs(&from, &to, "a").unwrap();
        assert_eq!(to.paths(), ["a", "a/x.txt"]);
        assert_eq!(to.stat("a/x.txt").unwrap().mode, FileMode::DEFAULT_FILE);
    }

    #[test]
    fn missing_source_dir() {
        let err = write_fs(&Tree::new(), &Tree::new(), "nope").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn writes_to_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let from: Tree = [("d/e.txt", File::new("e"))].into_iter().collect();
        write(&from, tmp.path(), ".").unwrap();
        let os = OsFs::new(tmp.path());
        assert_eq!(os.read_file("d/e.txt").unwrap(), b"e");
        os.remove_all("d").unwrap();
    }
}
