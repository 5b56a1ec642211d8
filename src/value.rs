//! The in-memory EDN value tree.
//!
//! A [`Value`] is either a string or a map. Each node exclusively owns its
//! payload: a map owns its keys and values, and the root is owned by whoever
//! called [`parse`](crate::parse) or [`from_bytes`](crate::from_bytes).
//! Dropping the root releases the whole tree.
//!
//! ## Creating Values
//!
//! ```rust
//! use serde_ednb::{edn, parse, Value};
//!
//! let text = Value::from("hello");
//! let parsed = parse(r#"{"name" "Alice"}"#).unwrap();
//! let built = edn!({ "name": "Alice" });
//!
//! assert!(text.is_string());
//! assert_eq!(parsed, built);
//! ```
//!
//! ## Size
//!
//! [`Value::size`] is the exact byte length of a string and the entry count
//! of a map. These are the sizes written into EDNB headers.
//!
//! ```rust
//! use serde_ednb::{parse, Value};
//!
//! assert_eq!(Value::from("héllo").size(), 6);
//! assert_eq!(parse(r#"{"a" "b" "c" "d"}"#).unwrap().size(), 2);
//! ```

use crate::EdnMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A parsed EDN value: an owned string or an owned map.
///
/// Equality is structural. Maps compare as sets of entries, so entry order
/// does not matter; the memoized hash is only used to reject unequal maps
/// early.
///
/// # Examples
///
/// ```rust
/// use serde_ednb::{parse, Value};
///
/// let a = parse(r#"{"x" "1" "y" "2"}"#).unwrap();
/// let b = parse(r#"{"y" "2" "x" "1"}"#).unwrap();
/// assert_eq!(a, b);
/// assert_ne!(a, Value::from("x"));
/// ```
#[derive(Clone, Debug)]
pub enum Value {
    String(String),
    Map(EdnMap),
}

impl Value {
    /// Returns the EDNB size of this value: byte length for strings, entry count for maps.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Value::String(s) => s.len(),
            Value::Map(map) => map.len(),
        }
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if the value is a map.
    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Short name of the variant, used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Map(_) => "map",
        }
    }

    /// If the value is a string, returns a reference to it. Otherwise returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_ednb::{EdnMap, Value};
    ///
    /// assert_eq!(Value::from("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::Map(EdnMap::new()).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Map(_) => None,
        }
    }

    /// If the value is a map, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&EdnMap> {
        match self {
            Value::Map(map) => Some(map),
            Value::String(_) => None,
        }
    }

    /// If the value is a map, returns a mutable reference to it. Otherwise returns `None`.
    #[inline]
    pub fn as_map_mut(&mut self) -> Option<&mut EdnMap> {
        match self {
            Value::Map(map) => Some(map),
            Value::String(_) => None,
        }
    }

    /// Looks up a string key when this value is a map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_ednb::parse;
    ///
    /// let value = parse(r#"{"user" {"name" "Alice"}}"#).unwrap();
    /// let name = value.get("user").and_then(|u| u.get("name")).and_then(|n| n.as_str());
    /// assert_eq!(name, Some("Alice"));
    /// ```
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get_str(key))
    }

    /// Returns the structural hash; see [`crate::hash`].
    #[must_use]
    pub fn structural_hash(&self) -> u32 {
        match self {
            Value::String(s) => crate::hash::hash_str(s),
            Value::Map(map) => map.structural_hash(),
        }
    }

    /// Recomputes and stores map hash memos in this subtree.
    ///
    /// Pass `refresh = true` to discard every existing memo.
    pub fn rehash(&mut self, refresh: bool) -> u32 {
        match self {
            Value::String(s) => crate::hash::hash_str(s),
            Value::Map(map) => map.rehash(refresh),
        }
    }

    pub(crate) fn fresh_hash(&self) -> u32 {
        match self {
            Value::String(s) => crate::hash::hash_str(s),
            Value::Map(map) => map.fresh_hash(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a.len() == b.len() && a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

/// Feeds the structural hash, so the `Hash`/`Eq` contract holds for map keys.
impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.structural_hash());
    }
}

/// Renders values in EDN notation for diagnostics. Strings are written
/// between quotes without escaping.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{} {}", key, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Map(map) => {
                use serde::ser::SerializeMap;
                let mut state = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    state.serialize_entry(k, v)?;
                }
                state.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an EDN string or map")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut map = EdnMap::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<Value, Value>()? {
                    let rendered = key.to_string();
                    if map.insert(key, value).is_some() {
                        return Err(de::Error::custom(format!("duplicate key {}", rendered)));
                    }
                }
                map.rehash(false);
                Ok(Value::Map(map))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(crate::Error::custom(format!(
                "expected string, found {}",
                other.type_name()
            ))),
        }
    }
}

impl TryFrom<Value> for EdnMap {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Map(map) => Ok(map),
            other => Err(crate::Error::custom(format!(
                "expected map, found {}",
                other.type_name()
            ))),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<EdnMap> for Value {
    fn from(value: EdnMap) -> Self {
        Value::Map(value)
    }
}
