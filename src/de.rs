//! Conversion from [`Value`] trees to Rust data.
//!
//! [`ValueDeserializer`] consumes a tree and drives any `Deserialize`
//! implementation with it:
//!
//! - **Strings** are offered as owned strings (and as unit enum variants)
//! - **Maps** are offered entry by entry, in entry order, to maps and structs
//! - **Enums** with data are read from single-entry maps `{"Variant" payload}`
//! - **Options** are always `Some`; an absent struct field becomes `None`
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_ednb::from_str;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Endpoint {
//!     host: String,
//!     port: String,
//!     tls: Option<String>,
//! }
//!
//! let endpoint: Endpoint = from_str(r#"{"host" "localhost" "port" "8080"}"#).unwrap();
//! assert_eq!(endpoint.port, "8080");
//! assert_eq!(endpoint.tls, None);
//! ```

use crate::{EdnMap, Error, Result, Value};
use serde::{de, forward_to_deserialize_any};

/// Deserializer that reads from an owned [`Value`].
pub struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    #[must_use]
    pub fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_string(s),
            Value::Map(map) => visitor.visit_map(MapDeserializer::new(map)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(variant) => visitor.visit_enum(EnumDeserializer::new(variant, None)),
            Value::Map(map) if map.len() == 1 => {
                let mut entries = map.into_iter();
                match entries.next() {
                    Some((Value::String(variant), payload)) => {
                        visitor.visit_enum(EnumDeserializer::new(variant, Some(payload)))
                    }
                    _ => Err(Error::custom(format!(
                        "expected a string variant name for enum {}",
                        name
                    ))),
                }
            }
            other => Err(Error::custom(format!(
                "expected a string or single-entry map for enum {}, found {}",
                name, other
            ))),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<Value, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: EdnMap) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(ValueDeserializer::new(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumDeserializer {
    variant: String,
    value: Option<Value>,
}

impl EnumDeserializer {
    fn new(variant: String, value: Option<Value>) -> Self {
        EnumDeserializer { variant, value }
    }
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(ValueDeserializer::new(Value::String(self.variant)))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Option<Value>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            None => Ok(()),
            Some(_) => Err(Error::custom("expected unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("expected newtype variant")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type("tuple variants"))
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Map(map)) => visitor.visit_map(MapDeserializer::new(map)),
            _ => Err(Error::custom("expected struct variant")),
        }
    }
}

/// Builds any `T: Deserialize` from a [`Value`].
///
/// # Examples
///
/// ```rust
/// use std::collections::HashMap;
/// use serde_ednb::{from_value, parse};
///
/// let value = parse(r#"{"a" "1" "b" "2"}"#).unwrap();
/// let map: HashMap<String, String> = from_value(value).unwrap();
/// assert_eq!(map["b"], "2");
/// ```
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: de::DeserializeOwned,
{
    T::deserialize(ValueDeserializer::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse, to_value};
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Service {
        name: String,
        owner: Owner,
        state: State,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Owner {
        team: String,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    enum State {
        Running,
        Failed(String),
        Paused { reason: String },
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Label(String);

    fn from_text<T: de::DeserializeOwned>(text: &str) -> Result<T> {
        from_value(parse(text).unwrap())
    }

    #[test]
    fn test_struct() {
        let service: Service = from_text(
            r#"{"name" "api" "owner" {"team" "core"} "state" "Running"}"#,
        )
        .unwrap();
        assert_eq!(
            service,
            Service {
                name: "api".into(),
                owner: Owner {
                    team: "core".into()
                },
                state: State::Running,
                note: None,
            }
        );
    }

    #[test]
    fn test_enum_payloads() {
        let state: State = from_text(r#"{"Failed" "disk full"}"#).unwrap();
        assert_eq!(state, State::Failed("disk full".into()));

        let state: State = from_text(r#"{"Paused" {"reason" "deploy"}}"#).unwrap();
        assert_eq!(
            state,
            State::Paused {
                reason: "deploy".into()
            }
        );

        assert!(from_text::<State>(r#"{"Running" "x"}"#).is_err());
        assert!(from_text::<State>(r#"{"Failed" "a" "Paused" "b"}"#).is_err());
        assert!(from_text::<State>(r#"{{"k" "v"} "x"}"#).is_err());
    }

    #[test]
    fn test_option_and_newtype() {
        let note: Option<String> = from_value(Value::from("n")).unwrap();
        assert_eq!(note, Some("n".into()));

        let label: Label = from_value(Value::from("blue")).unwrap();
        assert_eq!(label, Label("blue".into()));
    }

    #[test]
    fn test_map_keys_in_order() {
        let map: BTreeMap<String, String> = from_text(r#"{"b" "2" "a" "1"}"#).unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_type_mismatch() {
        assert!(from_value::<String>(parse("{}").unwrap()).is_err());
        assert!(from_value::<i32>(Value::from("42")).is_err());
        assert!(from_text::<Owner>(r#"{"name" "x"}"#).is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let service = Service {
            name: "db".into(),
            owner: Owner {
                team: "storage".into(),
            },
            state: State::Paused {
                reason: "backup".into(),
            },
            note: Some("weekly".into()),
        };
        let value = to_value(&service).unwrap();
        let back: Service = from_value(value).unwrap();
        assert_eq!(back, service);
    }

    #[test]
    fn test_value_from_value() {
        let value = parse(r#"{{"id" "1"} "x"}"#).unwrap();
        let back: Value = from_value(value.clone()).unwrap();
        assert_eq!(back, value);
    }
}
