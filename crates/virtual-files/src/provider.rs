//! The file-serving contract hosts program against.
//!
//! A host that serves files needs three things: metadata and content for an
//! exact path, the immediate children of a directory, and a way to learn when
//! something changed. [`FileProvider`] captures that shape so hosts can accept
//! any implementation, with [`VirtualFileStore`] as the in-memory one.
//!
//! # Examples
//!
//! ```
//! use virtual_files::{FileInfo, FileProvider, MemorySource, VirtualFileStore};
//! use std::sync::Arc;
//!
//! fn describe(provider: &dyn FileProvider, path: &str) -> String {
//!     let info = provider.file_info(path);
//!     if info.exists() {
//!         format!("{} ({} bytes)", info.name(), info.length())
//!     } else {
//!         format!("{path}: not found")
//!     }
//! }
//!
//! let store = VirtualFileStore::default();
//! store.add("/index.html", Arc::new(MemorySource::new("<html></html>")), false);
//!
//! assert_eq!(describe(&store, "/index.html"), "index.html (13 bytes)");
//! assert_eq!(describe(&store, "/other.html"), "/other.html: not found");
//! ```

use crate::entry::FileNode;
use crate::listing::DirectoryContents;
use crate::notify::ChangeToken;
use crate::store::VirtualFileStore;

/// Read-side contract of a file provider.
pub trait FileProvider: Send + Sync {
    /// Returns the node at `subpath`, or a not-found sentinel.
    fn file_info(&self, subpath: &str) -> FileNode;

    /// Returns the immediate children of the directory at `subpath`.
    fn directory_contents(&self, subpath: &str) -> DirectoryContents;

    /// Returns a one-shot token that fires when paths matching `pattern`
    /// change.
    fn watch(&self, pattern: &str) -> ChangeToken;
}

impl FileProvider for VirtualFileStore {
    fn file_info(&self, subpath: &str) -> FileNode {
        Self::file_info(self, subpath)
    }

    fn directory_contents(&self, subpath: &str) -> DirectoryContents {
        Self::directory_contents(self, subpath)
    }

    fn watch(&self, pattern: &str) -> ChangeToken {
        Self::watch(self, pattern)
    }
}
