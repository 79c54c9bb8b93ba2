//! Directory listings synthesized from flat keys.
//!
//! The store keeps no tree. A listing walks a sorted snapshot of entries,
//! keeps the ones under the requested directory, and emits one child per
//! immediate segment: the file itself when it sits directly in the
//! directory, otherwise a single [`DirectoryNode`] for the first segment.

use crate::config::CaseSensitivity;
use crate::entry::{DirectoryNode, FileInfo, FileNode, VirtualFileEntry};
use crate::path::{self, SEPARATOR};
use std::collections::HashSet;
use std::sync::Arc;

/// Immediate children of a directory.
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
///
/// let contents = store.directory_contents("/");
/// assert!(contents.exists());
/// let names: Vec<_> = contents.iter().map(|node| node.name()).collect();
/// assert_eq!(names, ["a.txt", "sub"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DirectoryContents {
    entries: Vec<FileNode>,
}

impl DirectoryContents {
    /// Whether the directory has at least one child.
    #[must_use]
    pub fn exists(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the directory has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the children in listing order.
    pub fn iter(&self) -> std::slice::Iter<'_, FileNode> {
        self.entries.iter()
    }

    /// Returns the children as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[FileNode] {
        &self.entries
    }
}

impl IntoIterator for DirectoryContents {
    type Item = FileNode;
    type IntoIter = std::vec::IntoIter<FileNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a DirectoryContents {
    type Item = &'a FileNode;
    type IntoIter = std::slice::Iter<'a, FileNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Lists the immediate children of `dir` among `entries`.
///
/// `dir` must be in directory form (leading and trailing separator) and
/// `entries` sorted under `case`. Children come out in entry order, with each
/// synthetic directory emitted at the position of its first descendant.
#[must_use]
pub fn synthesize(
    dir: &str,
    entries: &[Arc<VirtualFileEntry>],
    case: CaseSensitivity,
) -> DirectoryContents {
    let mut children = Vec::new();
    let mut seen_dirs = HashSet::new();

    for entry in entries {
        let Some(remainder) = path::strip_prefix(entry.path(), dir, case) else {
            continue;
        };

        let mut segments = remainder.split(SEPARATOR).filter(|s| !s.is_empty());
        let Some(first) = segments.next() else {
            continue;
        };

        if segments.next().is_none() {
            children.push(FileNode::File(Arc::clone(entry)));
            continue;
        }

        let dir_path = format!("{dir}{first}");
        if seen_dirs.insert(case.fold(&dir_path).into_owned()) {
            children.push(FileNode::Directory(DirectoryNode::new(dir_path, first)));
        }
    }

    tracing::trace!("Listed {} children under {dir}", children.len());
    DirectoryContents { entries: children }
}
