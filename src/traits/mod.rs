//! # Filesystem Traits
//!
//! One capability contract shared by every store and decorator.
//!
//! ```text
//! FsRead + FsWrite = Fs
//! ```
//!
//! | Trait | Methods | Implemented by |
//! |-------|---------|----------------|
//! | [`FsRead`] | `open`, `read_dir`, `stat`, `read_file` | every store and decorator |
//! | [`FsWrite`] | `open_file`, `mkdir_all`, `write_file`, `remove_all` | `Tree`, `OsFs`, `Sub`, `Exclude` |
//! | [`Fs`] | both | blanket |
//!
//! A sync reads its source through [`FsRead`] and mutates its target through
//! [`Fs`], so any pairing of stores works:
//!
//! ```rust
//! use virtfs::{File, Fs, FsError, FsRead, Tree, sync_fs};
//!
//! fn mirror(from: &dyn FsRead, to: &dyn Fs) -> Result<(), FsError> {
//!     sync_fs(from, to, ".")
//! }
//!
//! let from: Tree = [("a.txt", File::new("a"))].into_iter().collect();
//! let to = Tree::new();
//! mirror(&from, &to).unwrap();
//! assert_eq!(to.read_file("a.txt").unwrap(), b"a");
//! ```

mod fs_read;
mod fs_write;

pub use fs_read::FsRead;
pub use fs_write::FsWrite;

/// A readable and writable filesystem.
///
/// Blanket-implemented for every type implementing [`FsRead`] and
/// [`FsWrite`]; never implement it directly.
pub trait Fs: FsRead + FsWrite {}

impl<T: FsRead + FsWrite + ?Sized> Fs for T {}
