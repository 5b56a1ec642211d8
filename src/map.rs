//! Insertion-ordered map type for EDN maps.
//!
//! [`EdnMap`] wraps an [`IndexMap`] keyed by [`Value`], so keys may be strings
//! or whole maps. Key identity is structural: two keys are the same key when
//! they are equal under [`hash::equals`](crate::hash::equals), regardless of
//! the order of entries inside map-valued keys.
//!
//! The map memoizes its structural hash. Every mutating method invalidates
//! the memo, and [`EdnMap::rehash`] recomputes it.
//!
//! ## Examples
//!
//! ```rust
//! use serde_ednb::{EdnMap, Value};
//!
//! let mut map = EdnMap::new();
//! map.insert(Value::from("name"), Value::from("Alice"));
//! map.insert(Value::from("role"), Value::from("admin"));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get_str("name").and_then(Value::as_str), Some("Alice"));
//! ```

use crate::{hash, Value};
use indexmap::{Equivalent, IndexMap};
use std::hash::{Hash, Hasher};

/// A key/value pair of an EDN map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapEntry {
    pub key: Value,
    pub value: Value,
}

impl MapEntry {
    #[must_use]
    pub fn new(key: Value, value: Value) -> Self {
        MapEntry { key, value }
    }
}

/// An insertion-ordered EDN map with structurally unique keys and a memoized hash.
///
/// # Examples
///
/// ```rust
/// use serde_ednb::{EdnMap, Value};
///
/// let mut map = EdnMap::new();
/// map.insert(Value::from("first"), Value::from("1"));
/// map.insert(Value::from("second"), Value::from("2"));
///
/// // Iteration keeps insertion order
/// let keys: Vec<_> = map.keys().filter_map(Value::as_str).collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct EdnMap {
    entries: IndexMap<Value, Value>,
    hash: Option<u32>,
}

/// Borrowed string key that looks up `Value::String` entries without allocating.
struct StrKey<'a>(&'a str);

impl Hash for StrKey<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(hash::hash_str(self.0));
    }
}

impl Equivalent<Value> for StrKey<'_> {
    fn equivalent(&self, key: &Value) -> bool {
        key.as_str() == Some(self.0)
    }
}

impl EdnMap {
    /// Creates an empty `EdnMap`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_ednb::EdnMap;
    ///
    /// let map = EdnMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        EdnMap {
            entries: IndexMap::new(),
            hash: None,
        }
    }

    /// Creates an empty `EdnMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        EdnMap {
            entries: IndexMap::with_capacity(capacity),
            hash: None,
        }
    }

    /// Builds a map from entries whose keys are already known to be unique,
    /// and memoizes its hash.
    pub(crate) fn from_unique_entries(entries: Vec<MapEntry>) -> Self {
        let mut map = EdnMap::with_capacity(entries.len());
        for entry in entries {
            map.entries.insert(entry.key, entry.value);
        }
        map.rehash(false);
        map
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained a structurally equal key, its value is
    /// replaced (keeping the original position) and the old value is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_ednb::{EdnMap, Value};
    ///
    /// let mut map = EdnMap::new();
    /// assert!(map.insert(Value::from("key"), Value::from("a")).is_none());
    /// assert_eq!(map.insert(Value::from("key"), Value::from("b")), Some(Value::from("a")));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, mut key: Value, mut value: Value) -> Option<Value> {
        key.rehash(false);
        value.rehash(false);
        self.hash = None;
        self.entries.insert(key, value)
    }

    /// Removes a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        let removed = self.entries.shift_remove(key);
        if removed.is_some() {
            self.hash = None;
        }
        removed
    }

    /// Returns a reference to the value stored under a structurally equal key.
    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns the value stored under the string key `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_ednb::parse;
    ///
    /// let value = parse(r#"{"key" "value"}"#).unwrap();
    /// let map = value.as_map().unwrap();
    /// assert_eq!(map.get_str("key").and_then(|v| v.as_str()), Some("value"));
    /// assert!(map.get_str("missing").is_none());
    /// ```
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.entries.get(&StrKey(key))
    }

    /// Returns a mutable reference to a value; invalidates the hash memo.
    pub fn get_mut(&mut self, key: &Value) -> Option<&mut Value> {
        self.hash = None;
        self.entries.get_mut(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &Value) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of entries; this is the map's size.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the keys, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, Value, Value> {
        self.entries.keys()
    }

    /// Returns an iterator over the values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, Value, Value> {
        self.entries.values()
    }

    /// Returns a mutable iterator over the values; invalidates the hash memo.
    pub fn values_mut(&mut self) -> indexmap::map::ValuesMut<'_, Value, Value> {
        self.hash = None;
        self.entries.values_mut()
    }

    /// Returns an iterator over the key-value pairs, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Value, Value> {
        self.entries.iter()
    }

    /// Consumes the map, returning its entries in insertion order.
    #[must_use]
    pub fn into_entries(self) -> Vec<MapEntry> {
        self.entries
            .into_iter()
            .map(|(key, value)| MapEntry { key, value })
            .collect()
    }

    /// Returns the memoized hash, if it reflects the current contents.
    #[must_use]
    pub fn cached_hash(&self) -> Option<u32> {
        self.hash
    }

    /// Returns the structural hash, computing it without storing when the memo is stale.
    #[must_use]
    pub fn structural_hash(&self) -> u32 {
        match self.hash {
            Some(hash) => hash,
            None => hash::combine_entries(
                self.entries
                    .iter()
                    .map(|(k, v)| (k.structural_hash(), v.structural_hash())),
            ),
        }
    }

    /// Recomputes and stores the hash memo.
    ///
    /// With `refresh == false` a valid memo is returned as is; with
    /// `refresh == true` the whole subtree is hashed again.
    pub fn rehash(&mut self, refresh: bool) -> u32 {
        if let (Some(hash), false) = (self.hash, refresh) {
            return hash;
        }
        let hash = hash::combine_entries(self.entries.iter_mut().map(|(k, v)| {
            // keys are immutable inside the index; their memos were taken on insert
            let key_hash = if refresh {
                k.fresh_hash()
            } else {
                k.structural_hash()
            };
            (key_hash, v.rehash(refresh))
        }));
        self.hash = Some(hash);
        hash
    }

    /// Hash of the subtree computed from scratch, ignoring every memo.
    pub(crate) fn fresh_hash(&self) -> u32 {
        hash::combine_entries(
            self.entries
                .iter()
                .map(|(k, v)| (k.fresh_hash(), v.fresh_hash())),
        )
    }
}

impl PartialEq for EdnMap {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        if self.structural_hash() != other.structural_hash() {
            return false;
        }
        // keys are unique on both sides and sizes match, so inclusion is set equality
        self.entries
            .iter()
            .all(|(key, value)| other.entries.get(key).map_or(false, |other| other == value))
    }
}

impl Eq for EdnMap {}

impl IntoIterator for EdnMap {
    type Item = (Value, Value);
    type IntoIter = indexmap::map::IntoIter<Value, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a EdnMap {
    type Item = (&'a Value, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Value, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Later pairs replace earlier pairs with an equal key.
impl FromIterator<(Value, Value)> for EdnMap {
    fn from_iter<T: IntoIterator<Item = (Value, Value)>>(iter: T) -> Self {
        let mut map = EdnMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map.rehash(false);
        map
    }
}

impl FromIterator<MapEntry> for EdnMap {
    fn from_iter<T: IntoIterator<Item = MapEntry>>(iter: T) -> Self {
        iter.into_iter()
            .map(|entry| (entry.key, entry.value))
            .collect()
    }
}
