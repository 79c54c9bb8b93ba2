//! The virtual file store.
//!
//! Files live in a single ordered map from canonical path to entry. Directory
//! structure is never stored; listings derive it from the current keys. Every
//! operation takes `&self`, so one store can be shared across threads behind
//! an `Arc`.
//!
//! # Examples
//!
//! ```
//! use virtual_files::{FileInfo, MemorySource, VirtualFileStore};
//! use std::sync::Arc;
//!
//! let store = VirtualFileStore::default();
//! let token = store.watch("**/*.ts");
//!
//! assert!(store.add("/tools/create.ts", Arc::new(MemorySource::new("export {}")), false));
//! assert!(token.has_changed());
//!
//! let info = store.file_info("tools/create.ts");
//! assert!(info.exists());
//! assert_eq!(info.length(), 9);
//! ```

use crate::config::{CaseSensitivity, StoreOptions};
use crate::entry::{FileInfo, FileNode, NotFoundNode, VirtualFileEntry};
use crate::listing::{self, DirectoryContents};
use crate::notify::{ChangeNotifier, ChangeToken};
use crate::path::{ROOT, normalize_dir_path, normalize_file_path};
use crate::source::FileSource;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// An in-memory file store with derived directory listings and glob watches.
///
/// # Thread Safety
///
/// `VirtualFileStore` is `Send + Sync`. Mutations are atomic per call; reads
/// observe a consistent snapshot and may race concurrent writes.
///
/// # Examples
///
/// ```
/// use virtual_files::{FileInfo, MemorySource, VirtualFileStore};
/// use std::sync::Arc;
///
/// let store = VirtualFileStore::default();
/// store.add("/a.txt", Arc::new(MemorySource::new("a")), false);
/// store.add("/sub/b.txt", Arc::new(MemorySource::new("b")), false);
/// store.add("/sub/nested/c.txt", Arc::new(MemorySource::new("c")), false);
///
/// let names: Vec<_> = store
///     .directory_contents("/sub")
///     .iter()
///     .map(|node| node.name().to_string())
///     .collect();
/// assert_eq!(names, ["b.txt", "nested"]);
/// ```
#[derive(Debug)]
pub struct VirtualFileStore {
    options: StoreOptions,
    files: RwLock<BTreeMap<String, Arc<VirtualFileEntry>>>,
    notifier: ChangeNotifier,
}

impl VirtualFileStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(options: StoreOptions) -> Self {
        Self {
            options,
            files: RwLock::new(BTreeMap::new()),
            notifier: ChangeNotifier::new(options.case_sensitivity),
        }
    }

    /// Creates an empty store with the given case sensitivity.
    #[must_use]
    pub fn with_case_sensitivity(case_sensitivity: CaseSensitivity) -> Self {
        Self::new(StoreOptions::new().with_case_sensitivity(case_sensitivity))
    }

    /// Returns the options the store was created with.
    #[must_use]
    pub const fn options(&self) -> StoreOptions {
        self.options
    }

    const fn case(&self) -> CaseSensitivity {
        self.options.case_sensitivity
    }

    fn key(&self, canonical: &str) -> String {
        self.case().fold(canonical).into_owned()
    }

    /// Adds or replaces the file at `path`.
    ///
    /// Returns `true` if an entry was installed. When an entry already exists
    /// and its source is [`same_as`](FileSource::same_as) the new one, the
    /// existing entry is kept, nothing is notified, and `false` is returned.
    /// Otherwise watchers of the path are notified unless `skip_notify` is
    /// set.
    ///
    /// The root is always a directory. A path that canonicalizes to `/`
    /// (including empty or whitespace-only input) installs nothing and
    /// returns `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use virtual_files::{MemorySource, VirtualFileStore};
    /// use chrono::Utc;
    /// use std::sync::Arc;
    ///
    /// let store = VirtualFileStore::default();
    /// let now = Utc::now();
    ///
    /// assert!(store.add("/a.txt", Arc::new(MemorySource::with_timestamp("a", now)), false));
    /// assert!(!store.add("/a.txt", Arc::new(MemorySource::with_timestamp("a", now)), false));
    /// assert!(store.add("/a.txt", Arc::new(MemorySource::with_timestamp("b", now)), false));
    /// ```
    pub fn add(&self, path: &str, source: Arc<dyn FileSource>, skip_notify: bool) -> bool {
        let canonical = normalize_file_path(path);
        if canonical == ROOT {
            tracing::warn!("Ignored add of {path:?}: the root is a directory");
            return false;
        }
        let key = self.key(&canonical);

        {
            let mut files = self.files.write();
            if let Some(existing) = files.get(&key)
                && existing.source().same_as(source.as_ref())
            {
                tracing::trace!("Skipped unchanged update of {canonical}");
                return false;
            }
            files.insert(
                key,
                Arc::new(VirtualFileEntry::new(canonical.clone(), source)),
            );
        }

        tracing::debug!("Installed {canonical}");
        if !skip_notify {
            self.notifier.notify([canonical.as_str()]);
        }
        true
    }

    /// Removes the file at `path`.
    ///
    /// Returns `true` if an entry was removed. Watchers are notified only when
    /// something was removed and `skip_notify` is not set.
    pub fn remove(&self, path: &str, skip_notify: bool) -> bool {
        let canonical = normalize_file_path(path);
        let key = self.key(&canonical);

        let Some(removed) = self.files.write().remove(&key) else {
            return false;
        };

        tracing::debug!("Removed {}", removed.path());
        if !skip_notify {
            self.notifier.notify([removed.path()]);
        }
        true
    }

    /// Removes every listed path that is present.
    ///
    /// Paths are canonicalized like [`remove`](Self::remove). Returns `true`
    /// if anything was removed. The removed paths are notified in a single
    /// batch unless `skip_notify` is set.
    pub fn remove_many<I, S>(&self, paths: I, skip_notify: bool) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys: Vec<String> = paths
            .into_iter()
            .map(|path| self.key(&normalize_file_path(path.as_ref())))
            .collect();

        let removed: Vec<Arc<VirtualFileEntry>> = {
            let mut files = self.files.write();
            keys.iter().filter_map(|key| files.remove(key)).collect()
        };

        if removed.is_empty() {
            return false;
        }

        tracing::debug!("Removed {} files", removed.len());
        if !skip_notify {
            self.notifier
                .notify(removed.iter().map(|entry| entry.path()));
        }
        true
    }

    /// Removes every file.
    ///
    /// The flag is inverted relative to the other mutations: with
    /// `skip_notify == true` the paths present before clearing are notified,
    /// with `skip_notify == false` nothing is notified.
    pub fn clear(&self, skip_notify: bool) {
        let cleared = std::mem::take(&mut *self.files.write());

        tracing::debug!("Cleared {} files", cleared.len());
        if skip_notify {
            self.notifier
                .notify(cleared.values().map(|entry| entry.path()));
        }
    }

    /// Looks up the file at `subpath`.
    ///
    /// Returns [`FileNode::NotFound`] when no entry exists; its name is
    /// `subpath` as given.
    ///
    /// # Examples
    ///
    /// ```
    /// use virtual_files::{FileInfo, VirtualFileStore};
    ///
    /// let store = VirtualFileStore::default();
    /// let info = store.file_info("/missing.txt");
    /// assert!(!info.exists());
    /// assert_eq!(info.name(), "/missing.txt");
    /// ```
    #[must_use]
    pub fn file_info(&self, subpath: &str) -> FileNode {
        self.get(subpath).map_or_else(
            || FileNode::NotFound(NotFoundNode::new(subpath)),
            FileNode::File,
        )
    }

    /// Lists the immediate children of the directory at `subpath`.
    ///
    /// Deeper descendants collapse into one directory node per immediate
    /// child segment. The listing exists when it has at least one child.
    #[must_use]
    pub fn directory_contents(&self, subpath: &str) -> DirectoryContents {
        let dir = normalize_dir_path(subpath);
        let snapshot = self.entries();
        listing::synthesize(&dir, &snapshot, self.case())
    }

    /// Returns a token that fires once a mutation touches a path matching
    /// `pattern`.
    ///
    /// Watching a pattern that is already pending returns the pending token.
    pub fn watch(&self, pattern: &str) -> ChangeToken {
        self.notifier.watch(pattern)
    }

    /// Returns the number of watches that have not fired.
    #[must_use]
    pub fn pending_watches(&self) -> usize {
        self.notifier.pending()
    }

    /// Returns the entry stored at `path`, if any.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<Arc<VirtualFileEntry>> {
        let key = self.key(&normalize_file_path(path));
        self.files.read().get(&key).cloned()
    }

    /// Returns `true` if a file is stored at `path`.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        let key = self.key(&normalize_file_path(path));
        self.files.read().contains_key(&key)
    }

    /// Returns the number of stored files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    /// Returns `true` if no files are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }

    /// Returns a snapshot of all entries in path order.
    #[must_use]
    pub fn entries(&self) -> Vec<Arc<VirtualFileEntry>> {
        self.files.read().values().cloned().collect()
    }

    /// Returns all canonical paths in order.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.files
            .read()
            .values()
            .map(|entry| entry.path().to_string())
            .collect()
    }
}

impl Default for VirtualFileStore {
    fn default() -> Self {
        Self::new(StoreOptions::default())
    }
}
