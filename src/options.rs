//! Configuration options for parsing and decoding.
//!
//! - [`ParseOptions`]: Main configuration struct
//! - [`KeyCheck`]: Strategy used to detect duplicate map keys
//!
//! ## Examples
//!
//! ```rust
//! use serde_ednb::{parse_with_options, KeyCheck, ParseOptions};
//!
//! // Allow deeper nesting than the default of 10 maps
//! let options = ParseOptions::new().with_max_depth(32);
//! let value = parse_with_options(r#"{"a" {"b" "c"}}"#, options).unwrap();
//! assert_eq!(value.size(), 1);
//!
//! // Use hash buckets instead of the pairwise scan for wide maps
//! let options = ParseOptions::new().with_key_check(KeyCheck::Hashed);
//! let value = parse_with_options(r#"{"a" "1" "b" "2"}"#, options).unwrap();
//! assert_eq!(value.size(), 2);
//! ```

/// Default maximum number of nested maps.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Strategy for detecting duplicate keys in a map.
///
/// Both strategies reject exactly the same inputs; they differ in cost and in
/// which duplicate the error names when a map has more than one:
///
/// - **Pairwise**: O(n²) scan; reports the first key (in entry order) that
///   has a later duplicate
/// - **Hashed**: buckets keys by structural hash; reports the first key that
///   repeats an earlier one
///
/// # Examples
///
/// ```rust
/// use serde_ednb::KeyCheck;
///
/// assert_eq!(KeyCheck::default(), KeyCheck::Pairwise);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeyCheck {
    #[default]
    Pairwise,
    Hashed,
}

/// Configuration options for parsing EDN text and decoding EDNB.
///
/// # Examples
///
/// ```rust
/// use serde_ednb::{KeyCheck, ParseOptions};
///
/// let options = ParseOptions::new()
///     .with_max_depth(4)
///     .with_key_check(KeyCheck::Hashed);
/// assert_eq!(options.max_depth, 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of nested maps; the root map is depth 1.
    pub max_depth: usize,
    pub key_check: KeyCheck,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            key_check: KeyCheck::default(),
        }
    }
}

impl ParseOptions {
    /// Creates default options (depth limit 10, pairwise key check).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_ednb::ParseOptions;
    ///
    /// let options = ParseOptions::new();
    /// assert_eq!(options.max_depth, 10);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of nested maps.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the duplicate-key detection strategy.
    #[must_use]
    pub fn with_key_check(mut self, key_check: KeyCheck) -> Self {
        self.key_check = key_check;
        self
    }
}
