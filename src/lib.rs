//! # serde_ednb
//!
//! A parser for the string-and-map subset of EDN (Extensible Data Notation)
//! together with EDNB, a compact length-prefixed binary encoding of the same
//! values.
//!
//! ## What is supported?
//!
//! EDN text such as `{"user" {"name" "Alice"} {"id" "1"} "row"}`: maps whose
//! keys and values are strings or other maps, nested to any configured depth.
//! Vectors, numbers, keywords and the rest of EDN are rejected with an error
//! that names the form.
//!
//! ## Key Features
//!
//! - **Structural keys**: maps may be keys, and duplicate keys are detected by
//!   structure (entry order does not matter)
//! - **Memoized hashing**: every map caches its order-independent hash, so
//!   comparisons reject mismatches in constant time
//! - **EDNB**: a pre-order binary encoding with 4-byte headers and a hardened
//!   decoder for untrusted input
//! - **Serde Compatible**: convert between [`Value`] and your own types with
//!   `#[derive(Serialize, Deserialize)]`
//! - **Bounded**: nesting depth is limited in both the parser and the decoder
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! serde_ednb = "0.1"
//! ```
//!
//! ### Parsing and Encoding
//!
//! ```rust
//! use serde_ednb::{from_bytes, parse, to_bytes};
//!
//! let value = parse(r#"{"name" "Alice" "address" {"city" "Oslo"}}"#).unwrap();
//! assert_eq!(value.size(), 2);
//!
//! let bytes = to_bytes(&value).unwrap();
//! let back = from_bytes(&bytes).unwrap();
//! assert_eq!(back, value);
//! ```
//!
//! ### Typed Data
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_ednb::{from_str, to_value};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     name: String,
//!     city: String,
//! }
//!
//! let user: User = from_str(r#"{"name" "Alice" "city" "Oslo"}"#).unwrap();
//! assert_eq!(user.city, "Oslo");
//!
//! let value = to_value(&user).unwrap();
//! assert_eq!(value.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```
//!
//! ### Errors
//!
//! ```rust
//! use serde_ednb::{parse, ErrorKind};
//!
//! let err = parse(r#"{"a" "b" "a" "c"}"#).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::DuplicateKey);
//! assert_eq!(err.to_string(), r#"Duplicate key "a" in map at line 1, column 10"#);
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events: `debug` when a parse, encode or decode
//! starts and finishes, `trace` for every map entry and binary header. No
//! subscriber is installed; the demos show how to enable one.
//!
//! ## Format Specification
//!
//! See [`format`] for the accepted grammar and the EDNB layout.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - parse, inspect, encode and decode
//! - **`macro.rs`** - building values with the edn! macro
//! - **`binary_roundtrip.rs`** - EDNB bytes and decoder errors
//! - **`typed_values.rs`** - serde structs and enums
//! - **`custom_options.rs`** - depth limits and key-check strategies
//!
//! Run any example with: `cargo run --example <name>`

pub mod de;
pub mod decode;
pub mod encode;
pub mod error;
pub mod format;
pub mod hash;
pub mod lexer;
pub mod macros;
pub mod map;
pub mod options;
pub mod parser;
pub mod ser;
pub mod value;

pub use de::{from_value, ValueDeserializer};
pub use decode::Decoder;
pub use error::{Error, ErrorKind, Location, Result};
pub use map::{EdnMap, MapEntry};
pub use options::{KeyCheck, ParseOptions, DEFAULT_MAX_DEPTH};
pub use parser::Parser;
pub use ser::{to_value, ValueSerializer};
pub use value::Value;

use serde::de::DeserializeOwned;
use std::io;

/// Parses EDN text into a [`Value`] with default options.
///
/// # Examples
///
/// ```rust
/// use serde_ednb::parse;
///
/// let value = parse(r#"{"a" {"b" "c"}}"#).unwrap();
/// assert_eq!(value.get("a").unwrap().size(), 1);
/// ```
///
/// # Errors
///
/// Returns an error for malformed text, unsupported forms, duplicate keys or
/// nesting deeper than [`DEFAULT_MAX_DEPTH`]. Errors carry the line and column.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse(input: &str) -> Result<Value> {
    Parser::new(input).parse()
}

/// Parses EDN text into a [`Value`] with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_ednb::{parse_with_options, KeyCheck, ParseOptions};
///
/// let options = ParseOptions::new()
///     .with_max_depth(32)
///     .with_key_check(KeyCheck::Hashed);
/// let value = parse_with_options(r#"{"k" "v"}"#, options).unwrap();
/// assert_eq!(value.size(), 1);
/// ```
///
/// # Errors
///
/// See [`parse`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_with_options(input: &str, options: ParseOptions) -> Result<Value> {
    Parser::with_options(input, options).parse()
}

/// Parses EDN text given as bytes.
///
/// # Errors
///
/// Returns [`Error::InvalidUtf8`] if the bytes are not UTF-8, otherwise see
/// [`parse`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_slice(input: &[u8]) -> Result<Value> {
    let text = std::str::from_utf8(input).map_err(|e| Error::InvalidUtf8 {
        at: Location::in_text(input, e.valid_up_to()),
    })?;
    parse(text)
}

/// Encodes a [`Value`] as EDNB.
///
/// # Examples
///
/// ```rust
/// use serde_ednb::{to_bytes, Value};
///
/// let bytes = to_bytes(&Value::from("hi")).unwrap();
/// assert_eq!(bytes, [0x02, 0x00, 0x00, 0x30, b'h', b'i']);
/// ```
///
/// # Errors
///
/// Returns [`Error::SizeOverflow`] if a string or map is too large for the
/// 28-bit size field, and [`Error::NestingTooDeep`] if maps nest deeper than
/// [`DEFAULT_MAX_DEPTH`], the limit [`from_bytes`] applies when reading.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_bytes(value: &Value) -> Result<Vec<u8>> {
    encode::to_bytes(value)
}

/// Encodes a [`Value`] with custom options.
///
/// Use the same options with [`from_bytes_with_options`] to read the result
/// back.
///
/// # Examples
///
/// ```rust
/// use serde_ednb::{from_bytes_with_options, to_bytes_with_options, edn, ParseOptions};
///
/// let value = edn!({ "a": { "b": "c" } });
/// let options = ParseOptions::new().with_max_depth(2);
/// let bytes = to_bytes_with_options(&value, &options).unwrap();
/// assert_eq!(from_bytes_with_options(&bytes, options).unwrap(), value);
/// ```
///
/// # Errors
///
/// See [`to_bytes`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_bytes_with_options(value: &Value, options: &ParseOptions) -> Result<Vec<u8>> {
    encode::to_bytes_with_options(value, options)
}

/// Writes the EDNB encoding of a [`Value`] to a writer.
///
/// # Examples
///
/// ```rust
/// use serde_ednb::{parse, to_writer};
///
/// let value = parse(r#"{"k" "v"}"#).unwrap();
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &value).unwrap();
/// assert_eq!(buffer.len(), 14);
/// ```
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(mut writer: W, value: &Value) -> Result<()>
where
    W: io::Write,
{
    let bytes = to_bytes(value)?;
    writer
        .write_all(&bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Decodes one EDNB value with default options.
///
/// # Errors
///
/// Returns an error for truncated input, unknown tags, invalid UTF-8,
/// duplicate keys, excessive nesting or trailing bytes.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_bytes(input: &[u8]) -> Result<Value> {
    decode::decode(input)
}

/// Decodes one EDNB value with custom options.
///
/// # Errors
///
/// See [`from_bytes`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_bytes_with_options(input: &[u8], options: ParseOptions) -> Result<Value> {
    decode::decode_with_options(input, options)
}

/// Reads a reader to the end and decodes the bytes as one EDNB value.
///
/// # Examples
///
/// ```rust
/// use serde_ednb::{from_reader, parse, to_bytes};
/// use std::io::Cursor;
///
/// let value = parse(r#"{"k" "v"}"#).unwrap();
/// let cursor = Cursor::new(to_bytes(&value).unwrap());
/// assert_eq!(from_reader(cursor).unwrap(), value);
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, otherwise see [`from_bytes`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(mut reader: R) -> Result<Value>
where
    R: io::Read,
{
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_bytes(&bytes)
}

/// Parses EDN text and deserializes it into `T`.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use serde_ednb::from_str;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Pair { left: String, right: String }
///
/// let pair: Pair = from_str(r#"{"left" "l" "right" "r"}"#).unwrap();
/// assert_eq!(pair, Pair { left: "l".into(), right: "r".into() });
/// ```
///
/// # Errors
///
/// Returns an error if the text does not parse or does not match `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(input: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(parse(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Account {
        id: String,
        owner: String,
    }

    #[test]
    fn test_parse_encode_decode() {
        let value = parse(r#"{"a" "b" "c" {"d" "e"}}"#).unwrap();
        let bytes = to_bytes(&value).unwrap();
        assert_eq!(from_bytes(&bytes).unwrap(), value);
    }

    #[test]
    fn test_parse_slice() {
        assert_eq!(parse_slice(br#"{"k" "v"}"#).unwrap().size(), 1);

        let err = parse_slice(&[b'"', 0xC3, b'"']).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidUtf8);
        assert_eq!(err.location(), Some(Location::Text { line: 1, column: 2 }));

        let err = parse_slice(b"{\"k\"\n \"\xFF\"}").unwrap_err();
        assert_eq!(err.location(), Some(Location::Text { line: 2, column: 3 }));
        assert!(err.to_string().contains("line 2, column 3"));
    }

    #[test]
    fn test_writer_and_reader() {
        let value = parse(r#"{"k" {"x" "y"}}"#).unwrap();
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &value).unwrap();
        assert_eq!(buffer, to_bytes(&value).unwrap());
        assert_eq!(from_reader(io::Cursor::new(buffer)).unwrap(), value);
    }

    #[test]
    fn test_typed_round_trip() {
        let account = Account {
            id: "7".into(),
            owner: "ops".into(),
        };
        let bytes = to_bytes(&to_value(&account).unwrap()).unwrap();
        let back: Account = from_value(from_bytes(&bytes).unwrap()).unwrap();
        assert_eq!(back, account);
    }

    #[test]
    fn test_from_str_reports_parse_errors() {
        let err = from_str::<Account>(r#"{"id" "7""#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnterminatedMap);
    }

    #[test]
    fn test_options_apply_to_decoding() {
        let value = parse(r#"{"a" {"b" "c"}}"#).unwrap();
        let bytes = to_bytes(&value).unwrap();
        let options = ParseOptions::new().with_max_depth(1);
        let err = from_bytes_with_options(&bytes, options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NestingTooDeep);
    }
}
