//! Time sources for stamping written entries.
//!
//! Stores take a [`Clock`] at construction so tests can pin timestamps
//! without touching process-wide state.
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::{Duration, UNIX_EPOCH};
//! use virtfs::{FixedClock, FsRead, FsWrite, FileMode, Tree};
//!
//! let at = UNIX_EPOCH + Duration::from_secs(1_628_088_960);
//! let tree = Tree::new().with_clock(Arc::new(FixedClock(at)));
//! tree.write_file("a.txt", b"a", FileMode::DEFAULT_FILE).unwrap();
//! assert_eq!(tree.stat("a.txt").unwrap().mod_time, Some(at));
//! ```

use std::time::SystemTime;

/// A source of "now".
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> SystemTime;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub SystemTime);

impl Clock for FixedClock {
    fn now(&self) -> SystemTime {
        self.0
    }
}

impl<F> Clock for F
where
    F: Fn() -> SystemTime + Send + Sync,
{
    fn now(&self) -> SystemTime {
        self()
    }
}
