//! EDNB encoder.
//!
//! Walks a [`Value`] tree in pre-order and appends one frame per node; see
//! [`crate::format`] for the layout. Map entries are written in the map's
//! iteration order, key frame first.
//!
//! Nesting is bounded by [`ParseOptions::max_depth`] on this side as well,
//! so every buffer produced with a given set of options decodes with the
//! same options.
//!
//! ```rust
//! use serde_ednb::{encode, parse};
//!
//! let value = parse(r#"{"k" "v"}"#).unwrap();
//! let mut buffer = Vec::new();
//! encode::encode(&value, &mut buffer).unwrap();
//! assert_eq!(buffer.len(), encode::encoded_len(&value));
//! ```

use crate::format::{self, Tag, HEADER_LEN};
use crate::options::ParseOptions;
use crate::parser::PathDisplay;
use crate::{Error, Location, Result, Value};

/// Appends frames to a byte buffer.
struct Encoder<'b, 'v> {
    buffer: &'b mut Vec<u8>,
    start: usize,
    depth: usize,
    path: Vec<&'v Value>,
    max_depth: usize,
}

impl<'v> Encoder<'_, 'v> {
    fn write_value(&mut self, value: &'v Value) -> Result<()> {
        match value {
            Value::String(s) => {
                self.write_header(Tag::String, s.len(), "string length")?;
                self.buffer.extend_from_slice(s.as_bytes());
            }
            Value::Map(map) => {
                self.depth += 1;
                if self.depth > self.max_depth {
                    let keys: Vec<Value> = self.path.iter().map(|&key| key.clone()).collect();
                    return Err(Error::NestingTooDeep {
                        at: Location::Binary {
                            offset: self.buffer.len() - self.start,
                        },
                        max: self.max_depth,
                        path: PathDisplay(&keys).to_string(),
                    });
                }

                self.write_header(Tag::Map, map.len(), "map entry count")?;
                for (key, value) in map.iter() {
                    self.write_value(key)?;
                    self.path.push(key);
                    self.write_value(value)?;
                    self.path.pop();
                }
                self.depth -= 1;
            }
        }
        Ok(())
    }

    fn write_header(&mut self, tag: Tag, size: usize, what: &'static str) -> Result<()> {
        let header = format::pack_header(tag, size).ok_or(Error::SizeOverflow { what, size })?;
        tracing::trace!(offset = self.buffer.len() - self.start, %tag, size, "writing EDNB header");
        self.write_u32(header);
        Ok(())
    }

    fn write_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }
}

/// Appends the EDNB encoding of `value` to `buffer` with default options.
///
/// # Errors
///
/// Fails with [`Error::SizeOverflow`] if a string is longer than, or a map has
/// more entries than, [`format::MAX_SIZE`], and with
/// [`Error::NestingTooDeep`] if maps nest deeper than
/// [`DEFAULT_MAX_DEPTH`](crate::DEFAULT_MAX_DEPTH). On error `buffer` is
/// restored to its previous length.
pub fn encode(value: &Value, buffer: &mut Vec<u8>) -> Result<()> {
    encode_with_options(value, buffer, &ParseOptions::default())
}

/// Like [`encode`], with the nesting limit taken from `options`.
///
/// # Errors
///
/// See [`encode`].
pub fn encode_with_options(value: &Value, buffer: &mut Vec<u8>, options: &ParseOptions) -> Result<()> {
    let start = buffer.len();
    let result = Encoder {
        buffer: &mut *buffer,
        start,
        depth: 0,
        path: Vec::new(),
        max_depth: options.max_depth,
    }
    .write_value(value);
    match result {
        Ok(()) => {
            tracing::debug!(bytes = buffer.len() - start, "encoded EDNB value");
            Ok(())
        }
        Err(err) => {
            buffer.truncate(start);
            Err(err)
        }
    }
}

/// Encodes `value` into a new buffer of exactly the right size.
pub fn to_bytes(value: &Value) -> Result<Vec<u8>> {
    to_bytes_with_options(value, &ParseOptions::default())
}

/// Like [`to_bytes`], with the nesting limit taken from `options`.
pub fn to_bytes_with_options(value: &Value, options: &ParseOptions) -> Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(encoded_len(value));
    encode_with_options(value, &mut buffer, options)?;
    Ok(buffer)
}

/// Number of bytes [`encode`] writes for `value`.
#[must_use]
pub fn encoded_len(value: &Value) -> usize {
    HEADER_LEN
        + match value {
            Value::String(s) => s.len(),
            Value::Map(map) => map
                .iter()
                .map(|(key, value)| encoded_len(key) + encoded_len(value))
                .sum(),
        }
}
