//! JSON encoding of a single open file or directory.
//!
//! ```rust
//! use virtfs::{File, FsRead, Tree, json};
//!
//! let tree: Tree = [("a/b.txt", File::new("b"))].into_iter().collect();
//! let bytes = json::marshal("a", tree.open("a").unwrap().as_mut()).unwrap();
//! let mut back = json::unmarshal(&bytes).unwrap();
//! assert_eq!(back.read_dir(None).unwrap()[0].name, "b.txt");
//! ```

use crate::handle::VFile;
use crate::{File, FsError};

/// Read `handle` fully and encode it, entries included for directories.
///
/// # Errors
///
/// - [`FsError::Serialization`] if encoding fails
pub fn marshal(path: &str, handle: &mut dyn VFile) -> Result<Vec<u8>, FsError> {
    let file = File::from_handle(path, handle)?;
    serde_json::to_vec(&file).map_err(|e| FsError::Serialization(e.to_string()))
}

/// Decode bytes produced by [`marshal`] into a detached handle.
///
/// # Errors
///
/// - [`FsError::Deserialization`] if the bytes are not a valid encoding
pub fn unmarshal(bytes: &[u8]) -> Result<Box<dyn VFile>, FsError> {
    let file: File =
        serde_json::from_slice(bytes).map_err(|e| FsError::Deserialization(e.to_string()))?;
    Ok(file.open())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FileMode;
    use std::io::Read;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn file_keeps_metadata() {
        let at = UNIX_EPOCH + Duration::new(1_628_088_960, 42);
        let mut handle = File::new("hello")
            .with_path("h.txt")
            .with_mode(FileMode(0o600))
            .with_mod_time(at)
            .open();
        let bytes = marshal("h.txt", handle.as_mut()).unwrap();
        let mut back = unmarshal(&bytes).unwrap();
        let info = back.stat().unwrap();
        assert_eq!(info.name, "h.txt");
        assert_eq!(info.mode, FileMode(0o600));
        assert_eq!(info.mod_time, Some(at));
        let mut s = String::new();
        back.read_to_string(&mut s).unwrap();
        assert_eq!(s, "hello");
    }

    #[test]
    fn garbage_is_a_deserialization_error() {
        assert!(matches!(
            unmarshal(b"{not json"),
            Err(FsError::Deserialization(_))
        ));
    }
}
