//! In-memory virtual file store.
//!
//! Serves generated or synthetic content as if it were a real filesystem,
//! without touching disk. Files are kept in a flat map keyed by canonical
//! path; directory listings are derived from the keys on every query, and
//! glob watches fire once when a matching path changes.
//!
//! # Features
//!
//! - **Flat storage**: no stored tree, so there is no parent/child graph to
//!   keep consistent
//! - **One-level listings**: deeper paths collapse into synthetic directories
//! - **One-shot watches**: glob-pattern tokens that fire inline on mutation
//! - **Pluggable content**: files wrap a caller-supplied [`FileSource`]
//! - **Thread-safe**: the store is `Send + Sync` and mutates through `&self`
//!
//! # Examples
//!
//! ```
//! use virtual_files::{FileInfo, MemorySource, VirtualFileStore};
//! use std::sync::Arc;
//!
//! let store = VirtualFileStore::default();
//! store.add("/a.txt", Arc::new(MemorySource::new("a")), false);
//! store.add("/sub/b.txt", Arc::new(MemorySource::new("b")), false);
//! store.add("/sub/nested/c.txt", Arc::new(MemorySource::new("c")), false);
//!
//! let root = store.directory_contents("/");
//! let names: Vec<_> = root.iter().map(|node| (node.name(), node.is_directory())).collect();
//! assert_eq!(names, [("a.txt", false), ("sub", true)]);
//!
//! let token = store.watch("/sub/**");
//! store.remove("/sub/nested/c.txt", false);
//! assert!(token.has_changed());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod builder;
pub mod config;
pub mod entry;
pub mod error;
pub mod listing;
pub mod notify;
pub mod path;
pub mod provider;
pub mod source;
pub mod store;

// Re-export main types
pub use builder::StoreBuilder;
pub use config::{CaseSensitivity, StoreOptions};
pub use entry::{DirectoryNode, FileInfo, FileNode, NotFoundNode, VirtualFileEntry};
pub use error::{Result, StoreError};
pub use listing::DirectoryContents;
pub use notify::{ChangeNotifier, ChangeToken};
pub use provider::FileProvider;
pub use source::{FileSource, MemorySource};
pub use store::VirtualFileStore;
