//! Conversion from Rust data to [`Value`] trees.
//!
//! [`ValueSerializer`] maps the serde data model onto the two EDN forms this
//! crate supports:
//!
//! - **Strings**: `str`, `String`, `char` and unit enum variants
//! - **Maps**: maps, structs, and single-entry maps `{variant payload}` for
//!   newtype and struct enum variants
//! - **Transparent**: `Some(x)` and newtype structs serialize as their content
//!
//! Everything else (numbers, booleans, `None`, unit, bytes, sequences and
//! tuples) has no representation and fails with
//! [`Error::UnsupportedType`]. Use `#[serde(skip_serializing_if =
//! "Option::is_none")]` for optional fields.
//!
//! ```rust
//! use serde::Serialize;
//! use serde_ednb::{to_value, Value};
//!
//! #[derive(Serialize)]
//! struct User {
//!     name: String,
//!     role: Role,
//! }
//!
//! #[derive(Serialize)]
//! enum Role {
//!     Admin,
//! }
//!
//! let value = to_value(&User { name: "Alice".into(), role: Role::Admin }).unwrap();
//! assert_eq!(value.get("role"), Some(&Value::from("Admin")));
//! ```

use crate::{EdnMap, Error, Result, Value};
use serde::ser::{self, Impossible, Serialize};

/// Serializer whose output is a [`Value`].
pub struct ValueSerializer;

/// Collects map and struct entries.
pub struct SerializeMap {
    map: EdnMap,
    current_key: Option<Value>,
}

/// Collects struct variant fields, then wraps them as `{variant fields}`.
pub struct SerializeStructVariant {
    variant: &'static str,
    inner: SerializeMap,
}

/// `{variant payload}`
fn single_entry(variant: &str, payload: Value) -> Value {
    let mut map = EdnMap::with_capacity(1);
    map.insert(Value::from(variant), payload);
    map.rehash(false);
    Value::Map(map)
}

fn unsupported<T>(what: &str) -> Result<T> {
    Err(Error::unsupported_type(what))
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = Impossible<Value, Error>;
    type SerializeTuple = Impossible<Value, Error>;
    type SerializeTupleStruct = Impossible<Value, Error>;
    type SerializeTupleVariant = Impossible<Value, Error>;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, _v: bool) -> Result<Value> {
        unsupported("bool")
    }

    fn serialize_i8(self, _v: i8) -> Result<Value> {
        unsupported("i8")
    }

    fn serialize_i16(self, _v: i16) -> Result<Value> {
        unsupported("i16")
    }

    fn serialize_i32(self, _v: i32) -> Result<Value> {
        unsupported("i32")
    }

    fn serialize_i64(self, _v: i64) -> Result<Value> {
        unsupported("i64")
    }

    fn serialize_u8(self, _v: u8) -> Result<Value> {
        unsupported("u8")
    }

    fn serialize_u16(self, _v: u16) -> Result<Value> {
        unsupported("u16")
    }

    fn serialize_u32(self, _v: u32) -> Result<Value> {
        unsupported("u32")
    }

    fn serialize_u64(self, _v: u64) -> Result<Value> {
        unsupported("u64")
    }

    fn serialize_f32(self, _v: f32) -> Result<Value> {
        unsupported("f32")
    }

    fn serialize_f64(self, _v: f64) -> Result<Value> {
        unsupported("f64")
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Value> {
        unsupported("byte array")
    }

    fn serialize_none(self) -> Result<Value> {
        unsupported("None")
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        unsupported("unit")
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Value> {
        unsupported(&format!("unit struct {}", name))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(single_entry(variant, to_value(value)?))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        unsupported("sequence")
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        unsupported("tuple")
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        unsupported(&format!("tuple struct {}", name))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        unsupported(&format!("tuple variant {}", variant))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len.unwrap_or(0)))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            variant,
            inner: SerializeMap::new(len),
        })
    }
}

impl SerializeMap {
    fn new(capacity: usize) -> Self {
        SerializeMap {
            map: EdnMap::with_capacity(capacity),
            current_key: None,
        }
    }

    fn insert_unique(&mut self, key: Value, value: Value) -> Result<()> {
        if self.map.contains_key(&key) {
            return Err(Error::custom(format!("duplicate key {}", key)));
        }
        self.map.insert(key, value);
        Ok(())
    }

    fn finish(mut self) -> EdnMap {
        self.map.rehash(false);
        self.map
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.current_key = Some(to_value(key)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.insert_unique(key, to_value(value)?)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Map(self.finish()))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert_unique(Value::from(key), to_value(value)?)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Map(self.finish()))
    }
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.inner.insert_unique(Value::from(key), to_value(value)?)
    }

    fn end(self) -> Result<Value> {
        Ok(single_entry(self.variant, Value::Map(self.inner.finish())))
    }
}

/// Converts any `T: Serialize` into a [`Value`].
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] if `value` contains data with no EDN
/// string or map representation.
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}
