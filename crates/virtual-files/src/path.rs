//! Path canonicalization.
//!
//! Store keys use a single convention regardless of what callers pass in:
//! - `/` is the only separator (`\` is accepted and converted)
//! - runs of separators collapse into one
//! - exactly one leading separator
//! - directory queries end in exactly one trailing separator
//!
//! Empty or whitespace-only input is the root path. Nothing here rejects
//! input; every string has a canonical form.
//!
//! # Examples
//!
//! ```
//! use virtual_files::path::{normalize_dir_path, normalize_file_path};
//!
//! assert_eq!(normalize_file_path(r"docs\guide\intro.md"), "/docs/guide/intro.md");
//! assert_eq!(normalize_dir_path("//docs//guide"), "/docs/guide/");
//! assert_eq!(normalize_dir_path("   "), "/");
//! ```

use crate::config::CaseSensitivity;

/// The separator used by canonical paths.
pub const SEPARATOR: char = '/';

/// The canonical root path.
pub const ROOT: &str = "/";

const fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

fn canonicalize(path: &str, trailing: bool) -> String {
    if path.trim().is_empty() {
        return ROOT.to_string();
    }

    let mut canonical = String::with_capacity(path.len() + 2);
    for segment in path.split(is_separator).filter(|s| !s.is_empty()) {
        canonical.push(SEPARATOR);
        canonical.push_str(segment);
    }

    if canonical.is_empty() || trailing {
        canonical.push(SEPARATOR);
    }
    canonical
}

/// Canonicalizes a file path.
///
/// A trailing separator present in the input is kept (collapsed to one).
///
/// # Examples
///
/// ```
/// use virtual_files::path::normalize_file_path;
///
/// assert_eq!(normalize_file_path("a.txt"), "/a.txt");
/// assert_eq!(normalize_file_path("///a.txt"), "/a.txt");
/// assert_eq!(normalize_file_path(""), "/");
/// ```
#[must_use]
pub fn normalize_file_path(path: &str) -> String {
    canonicalize(path, path.ends_with(is_separator))
}

/// Canonicalizes a directory path so it ends with exactly one separator.
///
/// # Examples
///
/// ```
/// use virtual_files::path::normalize_dir_path;
///
/// assert_eq!(normalize_dir_path("sub"), "/sub/");
/// assert_eq!(normalize_dir_path(r"\sub\\"), "/sub/");
/// assert_eq!(normalize_dir_path("/"), "/");
/// ```
#[must_use]
pub fn normalize_dir_path(path: &str) -> String {
    canonicalize(path, true)
}

/// Returns the last segment of a canonical path.
///
/// The root path has an empty name.
///
/// # Examples
///
/// ```
/// use virtual_files::path::file_name;
///
/// assert_eq!(file_name("/sub/b.txt"), "b.txt");
/// assert_eq!(file_name("/sub/nested/"), "nested");
/// assert_eq!(file_name("/"), "");
/// ```
#[must_use]
pub fn file_name(path: &str) -> &str {
    path.trim_end_matches(SEPARATOR)
        .rsplit(SEPARATOR)
        .next()
        .unwrap_or_default()
}

/// Strips `prefix` from `path`, comparing under `case`.
///
/// Insensitive matching compares the [`CaseSensitivity::fold`] of both sides
/// and only accepts a match that ends on a character boundary of `path`.
/// Returns the remainder of `path` in its original casing.
#[must_use]
pub fn strip_prefix<'a>(path: &'a str, prefix: &str, case: CaseSensitivity) -> Option<&'a str> {
    if case.is_sensitive() {
        return path.strip_prefix(prefix);
    }

    let prefix = case.fold(prefix);
    let mut folded = String::with_capacity(prefix.len());
    for (idx, c) in path.char_indices() {
        if folded.len() == prefix.len() {
            return Some(&path[idx..]);
        }
        folded.extend(c.to_lowercase());
        if !prefix.starts_with(folded.as_str()) {
            return None;
        }
    }
    (folded.len() == prefix.len()).then_some("")
}
