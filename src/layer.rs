//! # Layer Trait
//!
//! Tower-style composition for filesystem decorators.
//!
//! ```text
//! Filesystem ──▶ Layer::layer() ──▶ Wrapped filesystem
//! ```
//!
//! Each decorator has a matching layer holding its configuration:
//!
//! | Layer | Produces |
//! |-------|----------|
//! | [`SubLayer`] | [`Sub`] |
//! | [`MountLayer`] | [`Mount`] |
//! | [`ExcludeLayer`] | [`Exclude`] |
//!
//! ```rust
//! use virtfs::{FsRead, LayerExt, Map, MountLayer};
//!
//! let fs = Map::from_iter([("a.txt", "a")]).layer(MountLayer::new("www").unwrap());
//! assert_eq!(fs.read_file("www/a.txt").unwrap(), b"a");
//! ```

use std::fmt;

use crate::decorators::{Exclude, Mount, Sub};
use crate::{FsError, FsRead, path};

/// A layer that wraps a filesystem to change what it serves.
///
/// `layer(self, fs)` consumes both the layer and the filesystem.
pub trait Layer<F> {
    /// The resulting filesystem type after applying this layer.
    type Fs;

    /// Wrap `fs`.
    fn layer(self, fs: F) -> Self::Fs;
}

/// Extension trait for fluent layer composition.
///
/// ```rust
/// use virtfs::{FsRead, Layer, LayerExt};
///
/// fn wrap<F: FsRead, L: Layer<F>>(fs: F, layer: L) -> L::Fs {
///     fs.layer(layer)
/// }
/// ```
pub trait LayerExt: FsRead + Sized {
    /// Apply a layer to this filesystem.
    fn layer<L: Layer<Self>>(self, layer: L) -> L::Fs {
        layer.layer(self)
    }
}

impl<F: FsRead> LayerExt for F {}

/// Produces [`Sub`] views rooted at one directory.
#[derive(Debug, Clone)]
pub struct SubLayer {
    dir: String,
}

impl SubLayer {
    /// # Errors
    ///
    /// - [`FsError::InvalidPath`] if `dir` is not a valid slash path
    pub fn new(dir: &str) -> Result<Self, FsError> {
        path::check("sub", dir)?;
        Ok(Self {
            dir: dir.to_string(),
        })
    }
}

impl<F> Layer<F> for SubLayer {
    type Fs = Sub<F>;

    fn layer(self, fs: F) -> Sub<F> {
        Sub::unchecked(fs, &self.dir)
    }
}

/// Produces [`Mount`]s at one directory.
#[derive(Debug, Clone)]
pub struct MountLayer {
    dir: String,
}

impl MountLayer {
    /// # Errors
    ///
    /// - [`FsError::InvalidPath`] if `dir` is not a valid slash path
    pub fn new(dir: &str) -> Result<Self, FsError> {
        path::check("mount", dir)?;
        Ok(Self {
            dir: dir.to_string(),
        })
    }
}

impl<F> Layer<F> for MountLayer {
    type Fs = Mount<F>;

    fn layer(self, fs: F) -> Mount<F> {
        Mount::unchecked(&self.dir, fs)
    }
}

/// Produces [`Exclude`]s with one predicate.
pub struct ExcludeLayer {
    excluded: Box<dyn Fn(&str) -> bool + Send + Sync>,
}

impl ExcludeLayer {
    /// Hide every path for which `excluded` returns `true`.
    pub fn new(excluded: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self {
            excluded: Box::new(excluded),
        }
    }
}

impl fmt::Debug for ExcludeLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExcludeLayer").finish_non_exhaustive()
    }
}

impl<F> Layer<F> for ExcludeLayer {
    type Fs = Exclude<F>;

    fn layer(self, fs: F) -> Exclude<F> {
        Exclude::boxed(fs, self.excluded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{File, Fs, Tree};

    #[test]
    fn layers_compose() {
        let tree: Tree = [
            ("a/b/keep.txt", File::new("k")),
            ("a/b/skip.txt", File::new("s")),
        ]
        .into_iter()
        .collect();
        let fs = (&tree)
            .layer(SubLayer::new("a").unwrap())
            .layer(ExcludeLayer::new(|p: &str| p.ends_with("skip.txt")))
            .layer(MountLayer::new("m").unwrap());
        let names: Vec<_> = fs
            .read_dir("m/b")
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, ["keep.txt"]);
    }

    #[test]
    fn writable_layers_stay_writable() {
        fn _takes_fs<T: Fs>(_: &T) {}
        let fs = Tree::new()
            .layer(SubLayer::new("a").unwrap())
            .layer(ExcludeLayer::new(|_: &str| false));
        _takes_fs(&fs);
    }

    #[test]
    fn invalid_dirs_are_rejected() {
        assert!(SubLayer::new("a/").is_err());
        assert!(MountLayer::new("").is_err());
    }
}
