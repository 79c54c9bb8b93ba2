//! Content sources for virtual files.
//!
//! The store never owns file content directly. Each entry wraps a
//! [`FileSource`], a caller-supplied capability that reports length and
//! timestamp, opens fresh read streams on demand, and decides whether another
//! source is equivalent (which suppresses redundant updates).
//!
//! [`MemorySource`] is the bundled implementation for generated content held
//! in memory.
//!
//! # Examples
//!
//! ```
//! use virtual_files::{FileSource, MemorySource};
//! use std::io::Read;
//!
//! let source = MemorySource::new("export {}");
//! assert_eq!(source.length(), 9);
//!
//! let mut content = String::new();
//! source.open_read()?.read_to_string(&mut content)?;
//! assert_eq!(content, "export {}");
//! # Ok::<(), std::io::Error>(())
//! ```

use chrono::{DateTime, Utc};
use std::any::Any;
use std::fmt;
use std::io::{self, Cursor, Read};
use std::sync::Arc;

/// Capability backing a virtual file.
///
/// Implementations must be cheap to query: the store calls `same_as` while
/// holding its write lock.
pub trait FileSource: fmt::Debug + Send + Sync {
    /// Content length in bytes.
    fn length(&self) -> u64;

    /// Last modification time of the content.
    fn last_modified(&self) -> DateTime<Utc>;

    /// Opens a new, independent read stream over the content.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the source cannot produce its content.
    fn open_read(&self) -> io::Result<Box<dyn Read + Send>>;

    /// Returns `true` if `other` is equivalent to this source.
    ///
    /// Adding an equivalent source over an existing entry is a no-op.
    fn same_as(&self, other: &dyn FileSource) -> bool;

    /// Returns `self` as `Any`, for downcasting in `same_as`.
    fn as_any(&self) -> &dyn Any;
}

/// In-memory file content with a fixed timestamp.
///
/// Two memory sources are equivalent when both content and timestamp match.
///
/// # Examples
///
/// ```
/// use virtual_files::{FileSource, MemorySource};
/// use chrono::{TimeZone, Utc};
///
/// let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let a = MemorySource::with_timestamp("hello", stamp);
/// let b = MemorySource::with_timestamp("hello", stamp);
/// let c = MemorySource::with_timestamp("world", stamp);
///
/// assert!(a.same_as(&b));
/// assert!(!a.same_as(&c));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct MemorySource {
    content: Arc<[u8]>,
    last_modified: DateTime<Utc>,
}

impl MemorySource {
    /// Creates a source stamped with the current time.
    #[must_use]
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self::with_timestamp(content, Utc::now())
    }

    /// Creates a source with an explicit timestamp.
    #[must_use]
    pub fn with_timestamp(content: impl Into<Vec<u8>>, last_modified: DateTime<Utc>) -> Self {
        Self {
            content: Arc::from(content.into()),
            last_modified,
        }
    }

    /// Returns the content bytes.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

impl fmt::Debug for MemorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySource")
            .field("length", &self.content.len())
            .field("last_modified", &self.last_modified)
            .finish()
    }
}

impl FileSource for MemorySource {
    fn length(&self) -> u64 {
        self.content.len() as u64
    }

    fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    fn open_read(&self) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(Cursor::new(Arc::clone(&self.content))))
    }

    fn same_as(&self, other: &dyn FileSource) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| other == self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
