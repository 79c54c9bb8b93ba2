//! Integration tests for the virtual file store.
//!
//! Exercises the public API end to end: canonical paths, derived listings,
//! update suppression, and one-shot watches.

use chrono::{DateTime, TimeZone, Utc};
use std::any::Any;
use std::io::{self, Cursor, Read};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use virtual_files::{
    CaseSensitivity, ChangeToken, FileInfo, FileNode, FileProvider, FileSource, MemorySource,
    StoreBuilder, VirtualFileStore,
};

fn stamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
}

fn memory(content: &str) -> Arc<dyn FileSource> {
    Arc::new(MemorySource::with_timestamp(content, stamp()))
}

fn read_all(node: &FileNode) -> String {
    let mut content = String::new();
    node.open_read()
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}

fn sample_store() -> VirtualFileStore {
    StoreBuilder::new()
        .add_file("/a.txt", MemorySource::with_timestamp("a", stamp()))
        .add_file("/sub/b.txt", MemorySource::with_timestamp("b", stamp()))
        .add_file("/sub/nested/c.txt", MemorySource::with_timestamp("c", stamp()))
        .build()
}

fn listing(store: &VirtualFileStore, dir: &str) -> Vec<(String, bool)> {
    store
        .directory_contents(dir)
        .iter()
        .map(|node| (node.name().to_string(), node.is_directory()))
        .collect()
}

/// Source whose identity, not content, decides equality.
#[derive(Debug)]
struct VersionedSource {
    version: u32,
    opens: AtomicUsize,
}

impl VersionedSource {
    fn new(version: u32) -> Self {
        Self {
            version,
            opens: AtomicUsize::new(0),
        }
    }
}

impl FileSource for VersionedSource {
    fn length(&self) -> u64 {
        format!("v{}", self.version).len() as u64
    }

    fn last_modified(&self) -> DateTime<Utc> {
        stamp()
    }

    fn open_read(&self) -> io::Result<Box<dyn Read + Send>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(Cursor::new(format!("v{}", self.version).into_bytes())))
    }

    fn same_as(&self, other: &dyn FileSource) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| other.version == self.version)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
struct BrokenSource;

impl FileSource for BrokenSource {
    fn length(&self) -> u64 {
        0
    }

    fn last_modified(&self) -> DateTime<Utc> {
        stamp()
    }

    fn open_read(&self) -> io::Result<Box<dyn Read + Send>> {
        Err(io::Error::new(io::ErrorKind::NotFound, "backing blob evicted"))
    }

    fn same_as(&self, _other: &dyn FileSource) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[test]
fn test_never_added_paths_do_not_exist() {
    let store = sample_store();
    for path in ["/missing.txt", "/sub", "/sub/", "", "/sub/nested", "b.txt"] {
        assert!(!store.file_info(path).exists(), "{path} should not exist");
    }
}

#[test]
fn test_added_file_matches_source() {
    let store = VirtualFileStore::default();
    assert!(store.add("/docs/guide.md", memory("# Guide"), false));

    let info = store.file_info("/docs/guide.md");
    assert!(info.exists());
    assert!(!info.is_directory());
    assert_eq!(info.name(), "guide.md");
    assert_eq!(info.length(), 7);
    assert_eq!(info.last_modified(), stamp());
    assert_eq!(read_all(&info), "# Guide");
}

#[test]
fn test_each_open_yields_independent_stream() {
    let store = VirtualFileStore::default();
    let source = Arc::new(VersionedSource::new(7));
    store.add("/v.txt", source.clone(), false);

    let info = store.file_info("/v.txt");
    assert_eq!(read_all(&info), "v7");
    assert_eq!(read_all(&info), "v7");
    assert_eq!(source.opens.load(Ordering::SeqCst), 2);
}

#[test]
fn test_equal_source_is_not_replaced_or_notified() {
    let store = VirtualFileStore::default();
    store.add("/v.txt", Arc::new(VersionedSource::new(1)), false);
    let token = store.watch("/v.txt");

    assert!(!store.add("/v.txt", Arc::new(VersionedSource::new(1)), false));
    assert!(!store.add("/v.txt", Arc::new(VersionedSource::new(1)), true));
    assert!(!token.has_changed());

    assert!(store.add("/v.txt", Arc::new(VersionedSource::new(2)), false));
    assert!(token.has_changed());
    assert_eq!(read_all(&store.file_info("/v.txt")), "v2");
}

#[test]
fn test_different_source_types_replace() {
    let store = VirtualFileStore::default();
    store.add("/x", Arc::new(VersionedSource::new(1)), false);
    assert!(store.add("/x", memory("v1"), false));
}

#[test]
fn test_remove_absent_returns_false() {
    let store = sample_store();
    let token = store.watch("**");
    assert!(!store.remove("/nope", false));
    assert!(!token.has_changed());
    assert_eq!(store.len(), 3);
}

#[test]
fn test_watch_fires_exactly_once() {
    let store = VirtualFileStore::default();
    let token = store.watch("/logs/*.log");
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    token.register_callback(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    store.add("/logs/nested/a.log", memory("x"), false);
    assert!(!token.has_changed());

    store.add("/logs/a.log", memory("1"), false);
    assert!(token.has_changed());
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    store.add("/logs/a.log", memory("2"), false);
    store.remove("/logs/a.log", false);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.pending_watches(), 0);
}

#[test]
fn test_rewatch_observes_next_change() {
    let store = VirtualFileStore::default();
    let first = store.watch("*.txt");
    store.add("/a.txt", memory("a"), false);
    assert!(first.has_changed());

    let second = store.watch("*.txt");
    assert!(!second.has_changed());
    store.add("/b.txt", memory("b"), false);
    assert!(second.has_changed());
}

#[test]
fn test_watch_same_pattern_shares_registration() {
    let store = VirtualFileStore::default();
    let first = store.watch("/a.txt");
    let second = store.watch("/a.txt");
    assert_eq!(store.pending_watches(), 1);

    store.add("/a.txt", memory("a"), false);
    assert!(first.has_changed());
    assert!(second.has_changed());
}

#[test]
fn test_root_listing_collapses_deeper_paths() {
    let store = sample_store();
    assert_eq!(
        listing(&store, "/"),
        [("a.txt".to_string(), false), ("sub".to_string(), true)]
    );
}

#[test]
fn test_subdirectory_listing_dedupes_nested() {
    let store = sample_store();
    store.add("/sub/nested/d.txt", memory("d"), false);
    store.add("/sub/nested/deeper/e.txt", memory("e"), false);

    let expected = [("b.txt".to_string(), false), ("nested".to_string(), true)];
    assert_eq!(listing(&store, "/sub"), expected);
    assert_eq!(listing(&store, "sub/"), expected);
    assert_eq!(listing(&store, r"\sub\"), expected);
}

#[test]
fn test_listing_exists_only_with_children() {
    let store = sample_store();
    assert!(store.directory_contents("/sub/nested").exists());
    assert!(!store.directory_contents("/sub/nested/c.txt").exists());
    assert!(!store.directory_contents("/other").exists());
    assert!(store.directory_contents("   ").exists());
}

#[test]
fn test_listing_file_children_are_readable() {
    let store = sample_store();
    let contents = store.directory_contents("/sub");
    let file = contents.iter().find(|node| !node.is_directory()).unwrap();
    assert_eq!(read_all(file), "b");
    assert_eq!(file.path(), "/sub/b.txt");

    let dir = contents.iter().find(|node| node.is_directory()).unwrap();
    assert!(dir.open_read().err().unwrap().is_unsupported());
}

#[test]
fn test_enumeration_is_sorted_and_stable() {
    let store = VirtualFileStore::default();
    for path in ["/b", "/a/z", "/C", "/a/b", "/a"] {
        store.add(path, memory(path), false);
    }

    let expected = ["/C", "/a", "/a/b", "/a/z", "/b"];
    assert_eq!(store.paths(), expected);
    assert_eq!(store.paths(), expected);
}

#[test]
fn test_case_insensitive_ordering_and_listing() {
    let store = VirtualFileStore::with_case_sensitivity(CaseSensitivity::Insensitive);
    for path in ["/b", "/C", "/a"] {
        store.add(path, memory(path), false);
    }
    assert_eq!(store.paths(), ["/a", "/b", "/C"]);

    store.add("/Docs/One.md", memory("1"), false);
    store.add("/docs/two.md", memory("2"), false);
    let names: Vec<_> = listing(&store, "/DOCS")
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, ["One.md", "two.md"]);
}

#[test]
fn test_case_insensitive_watch() {
    let store = VirtualFileStore::with_case_sensitivity(CaseSensitivity::Insensitive);
    let token = store.watch("/DOCS/*.MD");
    store.add("/docs/readme.md", memory("r"), false);
    assert!(token.has_changed());
}

#[test]
fn test_skip_notify_suppresses_mutations() {
    let store = sample_store();
    let token = store.watch("**");

    store.add("/new.txt", memory("n"), true);
    store.remove("/a.txt", true);
    store.remove_many(["/sub/b.txt"], true);
    assert!(!token.has_changed());
    assert_eq!(store.len(), 2);
}

#[test]
fn test_remove_many_batches_notification() {
    let store = sample_store();
    let b = store.watch("/sub/b.txt");
    let c = store.watch("/sub/nested/*");
    let a = store.watch("/a.txt");

    assert!(store.remove_many([r"sub\b.txt", "sub/nested/c.txt", "/gone"], false));
    assert!(b.has_changed());
    assert!(c.has_changed());
    assert!(!a.has_changed());
    assert_eq!(store.paths(), ["/a.txt"]);
}

#[test]
fn test_clear_polarity() {
    let store = sample_store();
    let token = store.watch("**");
    store.clear(false);
    assert!(store.is_empty());
    assert!(!token.has_changed());

    let store = sample_store();
    let token = store.watch("/sub/nested/c.txt");
    store.clear(true);
    assert!(store.is_empty());
    assert!(token.has_changed());
}

#[test]
fn test_clear_empty_store_with_notify_fires_nothing() {
    let store = VirtualFileStore::default();
    let token = store.watch("**");
    store.clear(true);
    assert!(!token.has_changed());
}

#[test]
fn test_broken_source_surfaces_io_error() {
    let store = VirtualFileStore::default();
    store.add("/broken.bin", Arc::new(BrokenSource), false);

    let err = store.file_info("/broken.bin").open_read().err().unwrap();
    assert!(err.is_io());
    assert!(err.to_string().contains("/broken.bin"));
}

#[test]
fn test_not_found_sentinel_shape() {
    let store = VirtualFileStore::default();
    let info = store.file_info("sub/missing.txt");
    assert!(matches!(info, FileNode::NotFound(_)));
    assert!(info.is_directory());
    assert_eq!(info.name(), "sub/missing.txt");
    assert_eq!(info.length(), 0);
    assert_eq!(info.last_modified(), DateTime::<Utc>::MIN_UTC);
    assert!(info.open_read().err().unwrap().is_unsupported());
}

#[test]
fn test_provider_trait_object() {
    let store: Arc<dyn FileProvider> = Arc::new(sample_store());
    assert!(store.file_info("/sub/b.txt").exists());
    assert_eq!(store.directory_contents("/").len(), 2);
}

#[test]
fn test_watch_callback_can_rewatch() {
    let store = Arc::new(VirtualFileStore::default());
    let rewatched = Arc::new(Mutex::new(None::<ChangeToken>));

    let token = store.watch("/a.txt");
    let store_ref = Arc::clone(&store);
    let slot = Arc::clone(&rewatched);
    token.register_callback(move || {
        *slot.lock().unwrap() = Some(store_ref.watch("/a.txt"));
    });

    store.add("/a.txt", memory("1"), false);
    let next = rewatched.lock().unwrap().take().unwrap();
    assert!(!next.has_changed());

    store.add("/a.txt", memory("2"), false);
    assert!(next.has_changed());
}

#[test]
fn test_cancelling_derived_token_leaves_watch_pending() {
    let store = VirtualFileStore::default();
    let token = store.watch("/a.txt");
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    token.register_callback(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let derived = token.cancellation_token();
    derived.cancel();
    assert!(derived.is_cancelled());
    assert!(!token.has_changed());
    assert!(!store.watch("/a.txt").has_changed());
    assert_eq!(store.pending_watches(), 1);

    store.add("/a.txt", memory("a"), false);
    assert!(token.has_changed());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.pending_watches(), 0);
}

#[test]
fn test_watch_only_fires_after_mutation() {
    let store = VirtualFileStore::default();
    let first = store.watch("/x.txt");
    let second = store.watch("/x.txt");
    assert!(!first.has_changed());
    assert!(!second.has_changed());

    store.add("/y.txt", memory("y"), false);
    assert!(!store.watch("/x.txt").has_changed());

    store.add("/x.txt", memory("x"), false);
    assert!(first.has_changed());
    assert!(!store.watch("/x.txt").has_changed());
}

#[test]
fn test_case_insensitive_multi_char_fold() {
    let store = VirtualFileStore::with_case_sensitivity(CaseSensitivity::Insensitive);
    store.add("/\u{130}x/a.txt", memory("a"), false);

    let folded_dir = "/i\u{307}x";
    assert!(store.contains(&format!("{folded_dir}/a.txt")));
    assert_eq!(listing(&store, folded_dir), [("a.txt".to_string(), false)]);
    assert_eq!(listing(&store, "/\u{130}X"), [("a.txt".to_string(), false)]);
}

#[test]
fn test_root_cannot_hold_a_file() {
    let store = sample_store();
    let token = store.watch("**");

    for path in ["", "/", "   ", r"\\"] {
        assert!(!store.add(path, memory("root"), false), "{path:?}");
    }
    assert!(!token.has_changed());
    assert_eq!(store.len(), 3);
    assert!(!store.file_info("/").exists());
    assert_eq!(store.directory_contents("/").len(), 2);
}
