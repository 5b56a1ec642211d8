//! Structural hashing and equality for [`Value`] trees.
//!
//! The structural hash identifies a value by content:
//!
//! - **Strings** hash their bytes with MurmurHash3 (x86, 32-bit) and seed 0
//! - **Maps** sum `hash(key) ^ hash(value)` over their entries with wrapping
//!   addition, so the result does not depend on entry order
//!
//! Map hashes are memoized inside [`EdnMap`](crate::EdnMap). Equality uses the
//! hash only to reject quickly; equal hashes are always confirmed by a full
//! structural comparison, so collisions never report two different maps as
//! equal.
//!
//! ## Examples
//!
//! ```rust
//! use serde_ednb::{hash, parse};
//!
//! let a = parse(r#"{"x" "1" "y" "2"}"#).unwrap();
//! let b = parse(r#"{"y" "2" "x" "1"}"#).unwrap();
//! assert_eq!(hash::hash(&a), hash::hash(&b));
//! assert!(hash::equals(&a, &b));
//! ```

use crate::Value;
use std::collections::HashMap;

/// Seed used for string hashes.
pub const SEED: u32 = 0;

/// MurmurHash3, x86 32-bit variant.
///
/// # Examples
///
/// ```rust
/// use serde_ednb::hash::murmur3_32;
///
/// assert_eq!(murmur3_32(b"", 0), 0);
/// assert_eq!(murmur3_32(b"", 1), 0x514e_28b7);
/// ```
#[must_use]
pub fn murmur3_32(data: &[u8], seed: u32) -> u32 {
    let mut reader = data;
    // reading from an in-memory slice cannot fail
    murmur3::murmur3_32(&mut reader, seed).unwrap_or_default()
}

/// Hash of a string payload.
#[inline]
pub(crate) fn hash_str(s: &str) -> u32 {
    murmur3_32(s.as_bytes(), SEED)
}

/// Order-independent combination of entry hashes.
pub(crate) fn combine_entries<I>(pairs: I) -> u32
where
    I: IntoIterator<Item = (u32, u32)>,
{
    pairs
        .into_iter()
        .fold(0u32, |acc, (key, value)| acc.wrapping_add(key ^ value))
}

/// Returns the structural hash of `value`, using map memos where valid.
#[inline]
#[must_use]
pub fn hash(value: &Value) -> u32 {
    value.structural_hash()
}

/// Structural equality: same variant, same size, and same content
/// (map entries compared as sets).
#[inline]
#[must_use]
pub fn equals(a: &Value, b: &Value) -> bool {
    a == b
}

/// Finds the first pair of structurally equal values with a pairwise scan.
///
/// Returns `Some((i, j))` with `i < j` for the smallest `i` that has a later
/// duplicate, and the smallest such `j`. O(n²) comparisons, which is cheap at
/// typical map widths.
///
/// # Examples
///
/// ```rust
/// use serde_ednb::{hash::find_duplicate, Value};
///
/// let keys = [Value::from("a"), Value::from("b"), Value::from("b"), Value::from("a")];
/// let refs: Vec<&Value> = keys.iter().collect();
/// assert_eq!(find_duplicate(&refs), Some((0, 3)));
/// ```
#[must_use]
pub fn find_duplicate(values: &[&Value]) -> Option<(usize, usize)> {
    for i in 0..values.len() {
        for j in (i + 1)..values.len() {
            if equals(values[i], values[j]) {
                return Some((i, j));
            }
        }
    }
    None
}

/// Finds a pair of structurally equal values by bucketing on the structural hash.
///
/// Returns `Some((i, j))` where `j` is the smallest index that repeats an
/// earlier value and `i` is that earlier index. Expected linear time.
///
/// # Examples
///
/// ```rust
/// use serde_ednb::{hash::find_duplicate_hashed, Value};
///
/// let keys = [Value::from("a"), Value::from("b"), Value::from("b"), Value::from("a")];
/// let refs: Vec<&Value> = keys.iter().collect();
/// assert_eq!(find_duplicate_hashed(&refs), Some((1, 2)));
/// ```
#[must_use]
pub fn find_duplicate_hashed(values: &[&Value]) -> Option<(usize, usize)> {
    let mut buckets: HashMap<u32, Vec<usize>> = HashMap::with_capacity(values.len());

    for (j, value) in values.iter().enumerate() {
        let bucket = buckets.entry(hash(value)).or_default();
        if let Some(&i) = bucket.iter().find(|&&i| equals(values[i], value)) {
            return Some((i, j));
        }
        bucket.push(j);
    }
    None
}

/// Returns `true` if no two values are structurally equal.
#[inline]
#[must_use]
pub fn unique(values: &[&Value]) -> bool {
    find_duplicate(values).is_none()
}

/// Like [`unique`], but uses [`find_duplicate_hashed`].
#[inline]
#[must_use]
pub fn unique_hashed(values: &[&Value]) -> bool {
    find_duplicate_hashed(values).is_none()
}
