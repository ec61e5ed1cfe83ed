//! Error types for virtual filesystems and the sync engine.

use std::io;

/// Filesystem error type with contextual variants.
///
/// Variants carry the slash path and the operation that failed where that
/// context exists. Uses `#[non_exhaustive]` for forward compatibility.
///
/// # Examples
///
/// ```rust
/// use virtfs::FsError;
///
/// let err = FsError::NotFound { path: "a/b.txt".into() };
/// assert_eq!(err.to_string(), "not found: a/b.txt");
/// ```
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    /// Malformed path argument (absolute, `..`, empty segment, ...).
    #[error("{operation}: invalid path: {path:?}")]
    InvalidPath {
        /// The rejected path.
        path: String,
        /// The operation that rejected it.
        operation: &'static str,
    },

    /// Path does not exist.
    #[error("not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: String,
    },

    /// An entry of the other kind already occupies the path.
    #[error("{operation}: already exists: {path}")]
    AlreadyExists {
        /// The conflicting path.
        path: String,
        /// The operation that failed.
        operation: &'static str,
    },

    /// Expected a file but found a directory.
    #[error("not a file: {path}")]
    NotAFile {
        /// The path that is not a file.
        path: String,
    },

    /// Expected a directory but found a file.
    #[error("not a directory: {path}")]
    NotADirectory {
        /// The path that is not a directory.
        path: String,
    },

    /// Permission denied for operation.
    #[error("{operation}: permission denied: {path}")]
    PermissionDenied {
        /// The path where permission was denied.
        path: String,
        /// The operation that was denied.
        operation: &'static str,
    },

    /// Operation or open flag combination is not supported by the store.
    #[error("{operation}: not supported: {path}")]
    NotSupported {
        /// The path the operation was attempted on.
        path: String,
        /// The unsupported operation.
        operation: &'static str,
    },

    /// Argument out of range, such as a seek before the start of a file.
    #[error("{operation}: invalid argument: {path}")]
    InvalidArgument {
        /// The path the handle was opened on.
        path: String,
        /// The operation that failed.
        operation: &'static str,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// I/O error with context.
    #[error("{operation} failed for {path}: {source}")]
    Io {
        /// The operation that failed.
        operation: &'static str,
        /// The path involved in the operation.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl FsError {
    /// Returns `true` for [`FsError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::NotFound { .. })
    }

    /// Build an error from an I/O failure on `path`, keeping the path when
    /// the kind maps onto a dedicated variant.
    pub fn from_io(operation: &'static str, path: &str, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => FsError::NotFound { path: path.into() },
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied {
                path: path.into(),
                operation,
            },
            io::ErrorKind::AlreadyExists => FsError::AlreadyExists {
                path: path.into(),
                operation,
            },
            io::ErrorKind::NotADirectory => FsError::NotADirectory { path: path.into() },
            io::ErrorKind::IsADirectory => FsError::NotAFile { path: path.into() },
            // Handles report store errors wrapped in io::Error.
            _ if source.get_ref().is_some_and(|inner| inner.is::<FsError>()) => {
                match source.into_inner().map(|inner| inner.downcast::<FsError>()) {
                    Some(Ok(err)) => *err,
                    Some(Err(other)) => FsError::Io {
                        operation,
                        path: path.into(),
                        source: io::Error::other(other),
                    },
                    None => FsError::Io {
                        operation,
                        path: path.into(),
                        source: io::Error::other("empty wrapped error"),
                    },
                }
            }
            _ => FsError::Io {
                operation,
                path: path.into(),
                source,
            },
        }
    }

    fn io_kind(&self) -> io::ErrorKind {
        match self {
            FsError::NotFound { .. } => io::ErrorKind::NotFound,
            FsError::AlreadyExists { .. } => io::ErrorKind::AlreadyExists,
            FsError::PermissionDenied { .. } => io::ErrorKind::PermissionDenied,
            FsError::InvalidPath { .. } | FsError::InvalidArgument { .. } => {
                io::ErrorKind::InvalidInput
            }
            FsError::NotSupported { .. } => io::ErrorKind::Unsupported,
            FsError::NotAFile { .. } => io::ErrorKind::IsADirectory,
            FsError::NotADirectory { .. } => io::ErrorKind::NotADirectory,
            FsError::Io { source, .. } => source.kind(),
            _ => io::ErrorKind::Other,
        }
    }
}

impl From<io::Error> for FsError {
    fn from(error: io::Error) -> Self {
        FsError::from_io("io", "", error)
    }
}

impl From<FsError> for io::Error {
    fn from(error: FsError) -> Self {
        io::Error::new(error.io_kind(), error)
    }
}
