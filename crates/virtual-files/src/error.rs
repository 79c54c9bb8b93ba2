//! Error types for the virtual file store.
//!
//! Store operations are total: missing paths produce a not-found sentinel and
//! malformed paths normalize to the root. Errors only arise when reading
//! content from a node that has none, when a caller-supplied source fails to
//! open its stream, or when options cannot be parsed.
//!
//! # Examples
//!
//! ```
//! use virtual_files::StoreError;
//!
//! let error = StoreError::UnsupportedOperation {
//!     operation: "open_read",
//!     path: "/docs/".to_string(),
//! };
//!
//! assert!(error.is_unsupported());
//! ```

use std::io;
use thiserror::Error;

/// Errors that can occur while working with the virtual file store.
///
/// All variants carry the path or setting involved and can be classified
/// with the `is_xxx()` methods.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The node carries metadata only and cannot provide content.
    ///
    /// Raised by `open_read` on synthetic directory nodes and on the
    /// not-found sentinel.
    #[error("Operation '{operation}' is not supported for {path}")]
    UnsupportedOperation {
        /// Name of the rejected operation
        operation: &'static str,
        /// Path of the node the operation was attempted on
        path: String,
    },

    /// The file source failed to open a read stream.
    #[error("Failed to open read stream for {path}")]
    Io {
        /// Canonical path of the entry whose source failed
        path: String,
        /// Underlying I/O error reported by the source
        #[source]
        source: io::Error,
    },

    /// Store options could not be parsed.
    #[error("Invalid store configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration problem
        message: String,
    },
}

impl StoreError {
    /// Returns `true` if the operation is not supported by the node.
    ///
    /// # Examples
    ///
    /// ```
    /// use virtual_files::StoreError;
    ///
    /// let error = StoreError::UnsupportedOperation {
    ///     operation: "open_read",
    ///     path: "/missing.txt".to_string(),
    /// };
    /// assert!(error.is_unsupported());
    /// assert!(!error.is_io());
    /// ```
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedOperation { .. })
    }

    /// Returns `true` if a file source failed to produce a stream.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }
}

/// Type alias for store operation results.
pub type Result<T> = std::result::Result<T, StoreError>;
