//! File information nodes returned by the store.
//!
//! Three kinds of node answer the [`FileInfo`] contract:
//! - [`VirtualFileEntry`]: a stored file, backed by a [`FileSource`]
//! - [`DirectoryNode`]: a folder synthesized by a listing query
//! - [`NotFoundNode`]: the sentinel returned for a path with no entry
//!
//! [`FileNode`] unifies them so callers can match on the kind or treat all
//! of them through the trait.

use crate::error::{Result, StoreError};
use crate::path;
use crate::source::FileSource;
use chrono::{DateTime, Utc};
use std::io::Read;
use std::sync::Arc;

/// Metadata and content access for a single node.
pub trait FileInfo {
    /// Whether the node refers to something present in the store.
    fn exists(&self) -> bool;

    /// Whether the node is a directory.
    fn is_directory(&self) -> bool;

    /// Last path segment.
    fn name(&self) -> &str;

    /// Full path of the node.
    fn path(&self) -> &str;

    /// Content length in bytes; zero for nodes without content.
    fn length(&self) -> u64;

    /// Last modification time; `DateTime::<Utc>::MIN_UTC` for nodes without
    /// content.
    fn last_modified(&self) -> DateTime<Utc>;

    /// Opens a fresh read stream over the content.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnsupportedOperation` for directories and missing
    /// files, or `StoreError::Io` if the backing source fails.
    fn open_read(&self) -> Result<Box<dyn Read + Send>>;
}

/// A stored file: canonical path plus its content source.
///
/// Entries are immutable. Updating a path installs a new entry.
///
/// # Examples
///
/// ```
/// use virtual_files::{FileInfo, MemorySource, VirtualFileEntry};
/// use std::sync::Arc;
///
/// let entry = VirtualFileEntry::new("/docs/readme.md", Arc::new(MemorySource::new("# Hi")));
/// assert_eq!(entry.name(), "readme.md");
/// assert_eq!(entry.length(), 4);
/// assert!(entry.exists());
/// assert!(!entry.is_directory());
/// ```
#[derive(Debug, Clone)]
pub struct VirtualFileEntry {
    path: String,
    name: String,
    source: Arc<dyn FileSource>,
}

impl VirtualFileEntry {
    /// Creates an entry for an already canonical path.
    #[must_use]
    pub fn new(path: impl Into<String>, source: Arc<dyn FileSource>) -> Self {
        let path = path.into();
        let name = path::file_name(&path).to_string();
        Self { path, name, source }
    }

    /// Returns the content source.
    #[must_use]
    pub fn source(&self) -> &Arc<dyn FileSource> {
        &self.source
    }
}

impl FileInfo for VirtualFileEntry {
    fn exists(&self) -> bool {
        true
    }

    fn is_directory(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn length(&self) -> u64 {
        self.source.length()
    }

    fn last_modified(&self) -> DateTime<Utc> {
        self.source.last_modified()
    }

    fn open_read(&self) -> Result<Box<dyn Read + Send>> {
        self.source.open_read().map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// A folder inferred from stored paths sharing a prefix.
///
/// Directory nodes are never stored; a listing creates them on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNode {
    path: String,
    name: String,
}

impl DirectoryNode {
    /// Creates a directory node from its full path and name.
    #[must_use]
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

impl FileInfo for DirectoryNode {
    fn exists(&self) -> bool {
        true
    }

    fn is_directory(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn length(&self) -> u64 {
        0
    }

    fn last_modified(&self) -> DateTime<Utc> {
        DateTime::<Utc>::MIN_UTC
    }

    fn open_read(&self) -> Result<Box<dyn Read + Send>> {
        Err(StoreError::UnsupportedOperation {
            operation: "open_read",
            path: self.path.clone(),
        })
    }
}

/// Sentinel for a path with no stored entry.
///
/// Reports `exists() == false` and echoes the queried path back as its name.
/// It is treated as a directory, has zero length and the minimum timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFoundNode {
    name: String,
}

impl NotFoundNode {
    /// Creates a sentinel for the queried path.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl FileInfo for NotFoundNode {
    fn exists(&self) -> bool {
        false
    }

    fn is_directory(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &str {
        &self.name
    }

    fn length(&self) -> u64 {
        0
    }

    fn last_modified(&self) -> DateTime<Utc> {
        DateTime::<Utc>::MIN_UTC
    }

    fn open_read(&self) -> Result<Box<dyn Read + Send>> {
        Err(StoreError::UnsupportedOperation {
            operation: "open_read",
            path: self.name.clone(),
        })
    }
}

/// Any node the store can hand out.
#[derive(Debug, Clone)]
pub enum FileNode {
    /// A stored file
    File(Arc<VirtualFileEntry>),
    /// A synthesized directory
    Directory(DirectoryNode),
    /// The not-found sentinel
    NotFound(NotFoundNode),
}

impl FileNode {
    /// Returns the stored entry, if this node is a file.
    #[must_use]
    pub const fn as_file(&self) -> Option<&Arc<VirtualFileEntry>> {
        match self {
            Self::File(entry) => Some(entry),
            Self::Directory(_) | Self::NotFound(_) => None,
        }
    }

    fn info(&self) -> &dyn FileInfo {
        match self {
            Self::File(entry) => &**entry,
            Self::Directory(dir) => dir,
            Self::NotFound(missing) => missing,
        }
    }
}

impl FileInfo for FileNode {
    fn exists(&self) -> bool {
        self.info().exists()
    }

    fn is_directory(&self) -> bool {
        self.info().is_directory()
    }

    fn name(&self) -> &str {
        self.info().name()
    }

    fn path(&self) -> &str {
        self.info().path()
    }

    fn length(&self) -> u64 {
        self.info().length()
    }

    fn last_modified(&self) -> DateTime<Utc> {
        self.info().last_modified()
    }

    fn open_read(&self) -> Result<Box<dyn Read + Send>> {
        self.info().open_read()
    }
}
