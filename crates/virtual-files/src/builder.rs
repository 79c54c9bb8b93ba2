//! Builder for pre-populated stores.
//!
//! Provides a fluent API for creating a store with initial content. Files
//! are installed without notifications since nothing can be watching a store
//! that does not exist yet.
//!
//! # Examples
//!
//! ```
//! use virtual_files::{CaseSensitivity, MemorySource, StoreBuilder};
//!
//! let store = StoreBuilder::new()
//!     .case_sensitivity(CaseSensitivity::Insensitive)
//!     .add_file("/site/manifest.json", MemorySource::new("{}"))
//!     .add_file("/site/types.ts", MemorySource::new("export type Params = {};"))
//!     .build();
//!
//! assert_eq!(store.len(), 2);
//! assert!(store.contains("/SITE/manifest.json"));
//! ```

use crate::config::{CaseSensitivity, StoreOptions};
use crate::source::FileSource;
use crate::store::VirtualFileStore;
use std::sync::Arc;

/// Builder for constructing a [`VirtualFileStore`].
#[derive(Debug, Default)]
pub struct StoreBuilder {
    options: StoreOptions,
    files: Vec<(String, Arc<dyn FileSource>)>,
}

impl StoreBuilder {
    /// Creates a builder with default options and no files.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the store options.
    #[must_use]
    pub const fn options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the case sensitivity of the store.
    #[must_use]
    pub const fn case_sensitivity(mut self, case_sensitivity: CaseSensitivity) -> Self {
        self.options.case_sensitivity = case_sensitivity;
        self
    }

    /// Adds a file. Later files at the same path replace earlier ones.
    #[must_use]
    pub fn add_file(mut self, path: impl Into<String>, source: impl FileSource + 'static) -> Self {
        self.files.push((path.into(), Arc::new(source)));
        self
    }

    /// Adds a file from a shared source.
    #[must_use]
    pub fn add_shared(mut self, path: impl Into<String>, source: Arc<dyn FileSource>) -> Self {
        self.files.push((path.into(), source));
        self
    }

    /// Adds multiple files at once.
    ///
    /// # Examples
    ///
    /// ```
    /// use virtual_files::{MemorySource, StoreBuilder};
    ///
    /// let files = vec![
    ///     ("/file1.ts", MemorySource::new("content1")),
    ///     ("/file2.ts", MemorySource::new("content2")),
    /// ];
    ///
    /// let store = StoreBuilder::new().add_files(files).build();
    /// assert_eq!(store.len(), 2);
    /// ```
    #[must_use]
    pub fn add_files<P, S>(mut self, files: impl IntoIterator<Item = (P, S)>) -> Self
    where
        P: Into<String>,
        S: FileSource + 'static,
    {
        for (path, source) in files {
            self = self.add_file(path, source);
        }
        self
    }

    /// Consumes the builder and returns the populated store.
    #[must_use]
    pub fn build(self) -> VirtualFileStore {
        let store = VirtualFileStore::new(self.options);
        for (path, source) in self.files {
            store.add(&path, source, true);
        }
        tracing::debug!("Built store with {} files", store.len());
        store
    }
}
