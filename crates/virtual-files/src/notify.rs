//! One-shot change notifications keyed by glob pattern.
//!
//! [`ChangeNotifier::watch`] hands out a [`ChangeToken`] registered under the
//! literal pattern string. When a mutation touches any path the pattern
//! matches, the registration is removed and its token fires. A fired token
//! never fires again; callers re-watch to keep observing.
//!
//! Firing happens inline on the thread that performed the mutation.
//!
//! # Examples
//!
//! ```
//! use virtual_files::{CaseSensitivity, ChangeNotifier};
//!
//! let notifier = ChangeNotifier::new(CaseSensitivity::Sensitive);
//! let token = notifier.watch("**/*.md");
//!
//! notifier.notify(["/src/lib.rs"]);
//! assert!(!token.has_changed());
//!
//! notifier.notify(["/docs/intro.md"]);
//! assert!(token.has_changed());
//! assert_eq!(notifier.pending(), 0);
//! ```

use crate::config::CaseSensitivity;
use crate::path::SEPARATOR;
use globset::{GlobBuilder, GlobMatcher};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio_util::sync::CancellationToken;

type Callback = Box<dyn FnOnce() + Send>;

struct TokenInner {
    cancel: CancellationToken,
    callbacks: Mutex<Vec<Callback>>,
}

/// Handle observing a single watch registration.
///
/// Clones share state. Only the registry that issued the token can fire it,
/// and the transition to "changed" happens once.
///
/// # Examples
///
/// ```
/// use virtual_files::{CaseSensitivity, ChangeNotifier};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// let notifier = ChangeNotifier::new(CaseSensitivity::Sensitive);
/// let token = notifier.watch("/a.txt");
/// let calls = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&calls);
/// token.register_callback(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// notifier.notify(["/a.txt"]);
/// notifier.notify(["/a.txt"]);
/// assert!(token.has_changed());
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone)]
pub struct ChangeToken {
    inner: Arc<TokenInner>,
}

impl ChangeToken {
    fn new() -> Self {
        Self {
            inner: Arc::new(TokenInner {
                cancel: CancellationToken::new(),
                callbacks: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Returns `true` once the watched paths have changed.
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    /// Waits until the token fires.
    ///
    /// Completes immediately if it already has.
    pub async fn changed(&self) {
        self.inner.cancel.cancelled().await;
    }

    /// Returns a `CancellationToken` cancelled when this token fires.
    ///
    /// The returned token is a child: cancelling it does not fire this one.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.inner.cancel.child_token()
    }

    /// Registers a callback to run when the token fires.
    ///
    /// The callback runs on the firing thread. If the token has already
    /// fired, it runs immediately on the calling thread.
    pub fn register_callback(&self, callback: impl FnOnce() + Send + 'static) {
        {
            let mut callbacks = self.inner.callbacks.lock();
            if !self.has_changed() {
                callbacks.push(Box::new(callback));
                return;
            }
        }
        callback();
    }

    /// Fires the token and runs pending callbacks.
    ///
    /// Returns `false` if the token had already fired.
    pub(crate) fn fire(&self) -> bool {
        if self.has_changed() {
            return false;
        }
        let callbacks = {
            let mut callbacks = self.inner.callbacks.lock();
            if self.has_changed() {
                return false;
            }
            self.inner.cancel.cancel();
            std::mem::take(&mut *callbacks)
        };
        for callback in callbacks {
            callback();
        }
        true
    }

    fn same_registration(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ChangeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeToken")
            .field("has_changed", &self.has_changed())
            .field("callbacks", &self.inner.callbacks.lock().len())
            .finish()
    }
}

#[derive(Debug)]
struct Registration {
    id: u64,
    token: ChangeToken,
}

/// Registry of pending watch subscriptions.
#[derive(Debug)]
pub struct ChangeNotifier {
    case: CaseSensitivity,
    next_id: AtomicU64,
    watches: Mutex<HashMap<String, Registration>>,
}

impl ChangeNotifier {
    /// Creates an empty registry matching patterns under `case`.
    #[must_use]
    pub fn new(case: CaseSensitivity) -> Self {
        Self {
            case,
            next_id: AtomicU64::new(0),
            watches: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the token registered under `pattern`, registering one if none
    /// is pending.
    ///
    /// A registration whose token has already fired is replaced, so the
    /// returned token has not fired at the time of the call.
    pub fn watch(&self, pattern: &str) -> ChangeToken {
        let mut watches = self.watches.lock();
        if let Some(current) = watches.get(pattern)
            && !current.token.has_changed()
        {
            return current.token.clone();
        }

        tracing::trace!("Registered watch for pattern {pattern:?}");
        let token = ChangeToken::new();
        watches.insert(
            pattern.to_string(),
            Registration {
                id: self.next_id.fetch_add(1, Ordering::Relaxed),
                token: token.clone(),
            },
        );
        token
    }

    /// Returns the number of registrations that have not fired.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.watches.lock().len()
    }

    /// Fires every pending registration whose pattern matches any of
    /// `touched`.
    ///
    /// Returns the number of registrations fired.
    pub fn notify<I, S>(&self, touched: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let touched: Vec<S> = touched.into_iter().collect();
        if touched.is_empty() {
            return 0;
        }

        let snapshot: Vec<(String, u64)> = self
            .watches
            .lock()
            .iter()
            .map(|(pattern, registration)| (pattern.clone(), registration.id))
            .collect();

        let mut fired = 0;
        for (pattern, id) in snapshot {
            let matcher = PatternMatcher::new(&pattern, self.case);
            if !touched.iter().any(|path| matcher.is_match(path.as_ref())) {
                continue;
            }

            let registration = {
                let mut watches = self.watches.lock();
                match watches.get(&pattern) {
                    Some(current) if current.id == id => watches.remove(&pattern),
                    _ => None,
                }
            };

            if let Some(registration) = registration
                && registration.token.fire()
            {
                tracing::debug!("Watch fired for pattern {pattern:?}");
                fired += 1;
            }
        }
        fired
    }

    /// Returns `true` if `token` is the pending registration for `pattern`.
    #[must_use]
    pub fn is_current(&self, pattern: &str, token: &ChangeToken) -> bool {
        self.watches
            .lock()
            .get(pattern)
            .is_some_and(|registration| registration.token.same_registration(token))
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(CaseSensitivity::default())
    }
}

/// A compiled watch pattern.
///
/// Leading separators are ignored on both the pattern and the tested path, so
/// `a.txt`, `/a.txt` and `**/a.txt` all match `/a.txt`. `*` stays within one
/// segment; `**` crosses segments. Patterns that fail to compile fall back to
/// literal comparison.
enum PatternMatcher {
    Glob(GlobMatcher),
    Literal { pattern: String, case: CaseSensitivity },
}

impl PatternMatcher {
    fn new(pattern: &str, case: CaseSensitivity) -> Self {
        let pattern = pattern.replace('\\', "/");
        let pattern = pattern.trim_start_matches(SEPARATOR);
        match GlobBuilder::new(pattern)
            .literal_separator(true)
            .case_insensitive(!case.is_sensitive())
            .build()
        {
            Ok(glob) => Self::Glob(glob.compile_matcher()),
            Err(err) => {
                tracing::warn!("Invalid watch pattern {pattern:?}, matching literally: {err}");
                Self::Literal {
                    pattern: case.fold(pattern).into_owned(),
                    case,
                }
            }
        }
    }

    fn is_match(&self, path: &str) -> bool {
        let path = path.trim_start_matches(SEPARATOR);
        match self {
            Self::Glob(matcher) => matcher.is_match(path),
            Self::Literal { pattern, case } => case.fold(path) == pattern.as_str(),
        }
    }
}
