//! Filesystems that wrap other filesystems.
//!
//! | Decorator | Effect | Writable |
//! |-----------|--------|----------|
//! | [`Sub`] | re-roots at a subdirectory | yes |
//! | [`Mount`] | presents a filesystem under a directory | no |
//! | [`Merge`] | union of several filesystems | no |
//! | [`Exclude`] | hides paths matching a predicate | yes |
//!
//! Each one can also be applied through [`Layer`](crate::Layer):
//!
//! ```rust
//! use virtfs::{ExcludeLayer, File, FsRead, LayerExt, SubLayer, Tree};
//!
//! let tree: Tree = [
//!     ("app/view/a.txt", File::new("a")),
//!     ("app/tmp/scratch", File::new("x")),
//! ]
//! .into_iter()
//! .collect();
//!
//! let fs = tree
//!     .layer(SubLayer::new("app").unwrap())
//!     .layer(ExcludeLayer::new(|p: &str| p == "tmp" || p.starts_with("tmp/")));
//! let names: Vec<_> = fs.read_dir(".").unwrap().into_iter().map(|e| e.name).collect();
//! assert_eq!(names, ["view"]);
//! ```

mod exclude;
mod merge;
mod mount;
mod sub;

pub use exclude::Exclude;
pub use merge::Merge;
pub use mount::Mount;
pub use sub::Sub;
