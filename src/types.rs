//! Core types shared by every store.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Mode bits of an entry: a directory flag plus Unix permission bits.
///
/// The zero value means "unspecified"; writers substitute a default when
/// materializing such an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileMode(pub u32);

impl FileMode {
    /// Directory flag.
    pub const DIR: Self = Self(1 << 31);

    /// Unix permission bits.
    pub const PERM: Self = Self(0o777);

    /// Default mode for files written without one (`-rw-r--r--`).
    pub const DEFAULT_FILE: Self = Self(0o644);

    /// Default mode for directories created without one (`drwxr-xr-x`).
    pub const DEFAULT_DIR: Self = Self(Self::DIR.0 | 0o755);

    /// Create a mode from raw bits.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if the directory flag is set.
    #[inline]
    pub const fn is_dir(self) -> bool {
        self.0 & Self::DIR.0 != 0
    }

    /// Permission bits only.
    #[inline]
    pub const fn perm(self) -> Self {
        Self(self.0 & Self::PERM.0)
    }

    /// Returns `true` for the unspecified mode.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for FileMode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl From<u32> for FileMode {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

/// Renders the mode like `ls -l`: `drwxr-xr-x`, `-rw-r--r--`.
impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const RWX: &[u8; 9] = b"rwxrwxrwx";
        let mut out = String::with_capacity(10);
        out.push(if self.is_dir() { 'd' } else { '-' });
        for (i, c) in RWX.iter().enumerate() {
            if self.0 & (1 << (8 - i)) != 0 {
                out.push(*c as char);
            } else {
                out.push('-');
            }
        }
        f.write_str(&out)
    }
}

/// Stat result for an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileInfo {
    /// Base name of the entry (`.` for the root).
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Mode bits.
    pub mode: FileMode,
    /// Last modification time, `None` when unset.
    #[cfg_attr(feature = "serde", serde(with = "system_time_serde"))]
    pub mod_time: Option<SystemTime>,
}

impl FileInfo {
    /// Returns `true` if this is a directory.
    #[inline]
    pub fn is_dir(&self) -> bool {
        self.mode.is_dir()
    }

    /// Change fingerprint: `"<size>:<mode>:<mtime unix nanos>"`.
    ///
    /// An unset time renders as [`UNSET_NANOS`] so it never collides with
    /// the epoch itself.
    ///
    /// ```rust
    /// use virtfs::{FileInfo, FileMode};
    ///
    /// let info = FileInfo {
    ///     name: "a.txt".into(),
    ///     size: 3,
    ///     mode: FileMode::DEFAULT_FILE,
    ///     mod_time: None,
    /// };
    /// assert_eq!(info.stamp(), "3:-rw-r--r--:-6795364578871345152");
    /// ```
    pub fn stamp(&self) -> String {
        format!("{}:{}:{}", self.size, self.mode, unix_nanos(self.mod_time))
    }
}

/// A directory listing entry. Carries no content and no link back to the
/// entry it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirEntry {
    /// Name of the entry (not the full path).
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Mode bits.
    pub mode: FileMode,
    /// Last modification time, `None` when unset.
    #[cfg_attr(feature = "serde", serde(with = "system_time_serde"))]
    pub mod_time: Option<SystemTime>,
}

impl DirEntry {
    /// Returns `true` if this is a directory.
    #[inline]
    pub fn is_dir(&self) -> bool {
        self.mode.is_dir()
    }

    /// Stat view of this entry.
    pub fn info(&self) -> FileInfo {
        FileInfo {
            name: self.name.clone(),
            size: self.size,
            mode: self.mode,
            mod_time: self.mod_time,
        }
    }
}

/// Flags for opening a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpenFlags {
    /// Open for reading.
    pub read: bool,
    /// Open for writing.
    pub write: bool,
    /// Create file if it doesn't exist.
    pub create: bool,
    /// Truncate file to zero length.
    pub truncate: bool,
    /// Append to end of file.
    pub append: bool,
}

impl OpenFlags {
    /// Read-only access.
    pub const READ: Self = Self {
        read: true,
        write: false,
        create: false,
        truncate: false,
        append: false,
    };

    /// Write access with create and truncate.
    pub const WRITE: Self = Self {
        read: false,
        write: true,
        create: true,
        truncate: true,
        append: false,
    };

    /// Read and write access.
    pub const READ_WRITE: Self = Self {
        read: true,
        write: true,
        create: false,
        truncate: false,
        append: false,
    };

    /// Append mode - writes go to end of file.
    pub const APPEND: Self = Self {
        read: false,
        write: true,
        create: true,
        truncate: false,
        append: true,
    };

    /// Returns `true` when no write-side flag is set.
    #[inline]
    pub const fn is_read_only(&self) -> bool {
        !(self.write || self.create || self.truncate || self.append)
    }
}

/// Stamp value of an unset modification time: the Unix nanoseconds of
/// `0001-01-01T00:00:00Z` wrapped to 64 bits, as Go's zero `time.Time`
/// reports them.
pub const UNSET_NANOS: i128 = -6_795_364_578_871_345_152;

/// Nanoseconds since the Unix epoch; [`UNSET_NANOS`] when unset, negative
/// before 1970.
pub(crate) fn unix_nanos(time: Option<SystemTime>) -> i128 {
    match time {
        None => UNSET_NANOS,
        Some(t) => match t.duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_nanos() as i128,
            Err(e) => -(e.duration().as_nanos() as i128),
        },
    }
}

/// Serde support for optional timestamps as `(secs, nanos)` pairs.
///
/// `secs` is signed and floors toward negative infinity, so times before
/// 1970 round-trip; `nanos` is always in `0..1_000_000_000`.
#[cfg(feature = "serde")]
pub(crate) mod system_time_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    pub(crate) fn split(t: SystemTime) -> (i64, u32) {
        match t.duration_since(UNIX_EPOCH) {
            Ok(d) => (d.as_secs() as i64, d.subsec_nanos()),
            Err(e) => {
                let d = e.duration();
                match d.subsec_nanos() {
                    0 => (-(d.as_secs() as i64), 0),
                    n => (-(d.as_secs() as i64) - 1, 1_000_000_000 - n),
                }
            }
        }
    }

    pub(crate) fn join(secs: i64, nanos: u32) -> Option<SystemTime> {
        if nanos >= 1_000_000_000 {
            return None;
        }
        let base = if secs >= 0 {
            UNIX_EPOCH.checked_add(Duration::from_secs(secs.unsigned_abs()))
        } else {
            UNIX_EPOCH.checked_sub(Duration::from_secs(secs.unsigned_abs()))
        };
        base?.checked_add(Duration::from_nanos(u64::from(nanos)))
    }

    pub fn serialize<S>(time: &Option<SystemTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        time.map(split).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SystemTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let pair: Option<(i64, u32)> = Deserialize::deserialize(deserializer)?;
        pair.map(|(secs, nanos)| {
            join(secs, nanos)
                .ok_or_else(|| D::Error::custom(format!("time out of range: ({secs}, {nanos})")))
        })
        .transpose()
    }
}
