//! Configuration for the virtual file store.
//!
//! Case sensitivity is the single construction-time option. It is applied
//! consistently to key comparison, listing order, prefix matching and glob
//! matching.
//!
//! # Examples
//!
//! ```
//! use virtual_files::{CaseSensitivity, StoreOptions};
//!
//! // Default options compare paths case-sensitively
//! let options = StoreOptions::default();
//! assert_eq!(options.case_sensitivity, CaseSensitivity::Sensitive);
//!
//! // Options can be loaded from TOML
//! let options = StoreOptions::from_toml_str(r#"case_sensitivity = "insensitive""#).unwrap();
//! assert!(!options.case_sensitivity.is_sensitive());
//! ```

use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// How path strings are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseSensitivity {
    /// Ordinal, byte-wise comparison.
    #[default]
    Sensitive,
    /// Comparison over the lowercase fold of each path.
    Insensitive,
}

impl CaseSensitivity {
    /// Returns `true` for [`CaseSensitivity::Sensitive`].
    #[must_use]
    pub const fn is_sensitive(self) -> bool {
        matches!(self, Self::Sensitive)
    }

    /// Returns the key a path is stored and ordered under.
    ///
    /// The insensitive fold maps each character through `char::to_lowercase`
    /// on its own. Prefix matching in listings uses the same fold, so a
    /// prefix of a key always folds to a prefix of the folded key.
    ///
    /// # Examples
    ///
    /// ```
    /// use virtual_files::CaseSensitivity;
    ///
    /// assert_eq!(CaseSensitivity::Sensitive.fold("/Docs/A.md"), "/Docs/A.md");
    /// assert_eq!(CaseSensitivity::Insensitive.fold("/Docs/A.md"), "/docs/a.md");
    /// ```
    #[must_use]
    pub fn fold(self, path: &str) -> Cow<'_, str> {
        match self {
            Self::Sensitive => Cow::Borrowed(path),
            Self::Insensitive => {
                Cow::Owned(path.chars().flat_map(char::to_lowercase).collect())
            }
        }
    }
}

/// Options fixed when a store is constructed.
///
/// # Examples
///
/// ```
/// use virtual_files::{CaseSensitivity, StoreOptions};
///
/// let options = StoreOptions::new().with_case_sensitivity(CaseSensitivity::Insensitive);
/// assert_eq!(options.case_sensitivity, CaseSensitivity::Insensitive);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreOptions {
    /// Case sensitivity of paths and watch patterns.
    ///
    /// Default: [`CaseSensitivity::Sensitive`]
    pub case_sensitivity: CaseSensitivity,
}

impl StoreOptions {
    /// Creates options with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            case_sensitivity: CaseSensitivity::Sensitive,
        }
    }

    /// Sets the case sensitivity.
    #[must_use]
    pub const fn with_case_sensitivity(mut self, case_sensitivity: CaseSensitivity) -> Self {
        self.case_sensitivity = case_sensitivity;
        self
    }

    /// Parses options from a TOML document.
    ///
    /// Missing keys fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidConfig` if the document is not valid TOML,
    /// contains unknown keys, or holds an unrecognized value.
    ///
    /// # Examples
    ///
    /// ```
    /// use virtual_files::StoreOptions;
    ///
    /// let options = StoreOptions::from_toml_str("")?;
    /// assert!(options.case_sensitivity.is_sensitive());
    ///
    /// assert!(StoreOptions::from_toml_str("case_sensitivity = \"maybe\"").is_err());
    /// # Ok::<(), virtual_files::StoreError>(())
    /// ```
    pub fn from_toml_str(document: &str) -> Result<Self> {
        toml::from_str(document).map_err(|err| StoreError::InvalidConfig {
            message: err.to_string(),
        })
    }
}
