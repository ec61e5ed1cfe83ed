//! # virtfs
//!
//! In-memory virtual filesystems with implicit directories, composable
//! decorators, and a diff/apply engine that syncs one filesystem onto
//! another.
//!
//! ---
//!
//! ## Quick Start
//!
//! ```rust
//! use virtfs::{File, FsRead, Tree, sync};
//!
//! // Only files are stored; `bud` and `bud/view` are implied.
//! let tree: Tree = [
//!     ("bud/view/index.svelte", File::new("<h1>index</h1>")),
//!     ("bud/view/about/index.svelte", File::new("<h1>about</h1>")),
//! ]
//! .into_iter()
//! .collect();
//! assert!(tree.stat("bud/view").unwrap().is_dir());
//!
//! let out = tempfile::tempdir().unwrap();
//! sync(&tree, out.path(), ".").unwrap();
//! assert!(out.path().join("bud/view/about/index.svelte").exists());
//! ```
//!
//! ---
//!
//! ## Core Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Tree`] | Flat in-memory store; directories synthesized on open |
//! | [`List`] | Ordered store; opens only explicit entries, keeps duplicates |
//! | [`Map`] | Read-only store of path to text |
//! | [`OsFs`] | A directory on disk |
//! | [`File`] | One file or directory node |
//! | [`DirEntry`] / [`FileInfo`] | Listing entry / stat result |
//! | [`FileMode`] | Directory flag plus permission bits |
//! | [`VFile`] | Open handle returned by every `open` |
//! | [`FsError`] | Error type with path and operation context |
//!
//! ---
//!
//! ## Traits
//!
//! ```text
//! FsRead + FsWrite = Fs
//! ```
//!
//! Every store and decorator implements [`FsRead`]; writable ones also
//! implement [`FsWrite`]. [`Fs`] is blanket-implemented, and so is
//! [`FsReadExt`] with its convenience methods. Decorators wrap any
//! implementation, including `&T`, `Box<T>`, `Arc<T>` and trait objects.
//!
//! ---
//!
//! ## Sync
//!
//! [`diff`] computes ordered [`SyncOp`]s (creates, then deletes, then the
//! recursive ops of shared directories, per level); [`apply`] executes them;
//! [`sync_fs`] and [`sync`] do both. Files are compared by [`stamp`]
//! (`size:mode:mtime`), never by content.
//!
//! ---
//!
//! ## Error Handling
//!
//! All operations return `Result<T, FsError>`. Errors include context:
//!
//! ```rust
//! use virtfs::FsError;
//!
//! let err = FsError::NotFound { path: "missing.txt".into() };
//! assert_eq!(err.to_string(), "not found: missing.txt");
//!
//! let err = FsError::PermissionDenied {
//!     path: "secret".into(),
//!     operation: "write_file",
//! };
//! assert_eq!(err.to_string(), "write_file: permission denied: secret");
//! ```
//!
//! ---
//!
//! ## Logging
//!
//! The sync and write engines emit `tracing` events: `debug` per applied op
//! and per call, `trace` for each diff decision. Install a subscriber to
//! see them.
//!
//! ---
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Serialization for [`File`], [`FileInfo`], [`DirEntry`], the `json` module and `FsExtJson` |

// Private modules
mod clock;
mod decorators;
mod error;
mod ext;
mod file;
mod handle;
mod layer;
mod list;
mod map;
mod os;
mod print;
mod sync;
mod traits;
mod tree;
mod types;
mod write;

// Public modules
#[cfg(feature = "serde")]
pub mod json;
pub mod path;

// Public re-exports - error types
pub use error::FsError;

// Public re-exports - core types
pub use file::File;
pub use handle::{DirHandle, FileHandle, VFile};
pub use types::{DirEntry, FileInfo, FileMode, OpenFlags, UNSET_NANOS};

// Public re-exports - traits
pub use ext::FsReadExt;
pub use traits::{Fs, FsRead, FsWrite};

// Public re-exports - stores
pub use list::List;
pub use map::Map;
pub use os::{OsFs, OsHandle};
pub use tree::Tree;

// Public re-exports - decorators
pub use decorators::{Exclude, Merge, Mount, Sub};
pub use layer::{ExcludeLayer, Layer, LayerExt, MountLayer, SubLayer};

// Public re-exports - engines
pub use print::print;
pub use sync::{
    SyncKind, SyncOp, SyncOptions, apply, apply_with, diff, stamp, sync, sync_fs, sync_fs_with,
};
pub use write::{write, write_fs};

// Public re-exports - infrastructure
pub use clock::{Clock, FixedClock, SystemClock};

// Conditional re-exports
#[cfg(feature = "serde")]
pub use ext::FsExtJson;
