//! EDNB decoder.
//!
//! Reads exactly one root frame from a byte slice and rebuilds the [`Value`]
//! tree. The input is untrusted: every declared size is checked against the
//! remaining bytes before it is used, allocations are capped by what the
//! input could actually hold, and nesting is bounded by
//! [`ParseOptions::max_depth`].
//!
//! Decoded maps are held to the same rules as parsed ones, so a buffer with
//! repeated keys is rejected.
//!
//! ```rust
//! use serde_ednb::{decode, parse, to_bytes};
//!
//! let value = parse(r#"{"a" {"b" "c"}}"#).unwrap();
//! let bytes = to_bytes(&value).unwrap();
//! assert_eq!(decode::decode(&bytes).unwrap(), value);
//!
//! // a header that promises more than the buffer holds
//! let err = decode::decode(&[0x05, 0, 0, 0x30, b'a']).unwrap_err();
//! assert_eq!(err.kind(), serde_ednb::ErrorKind::TruncatedInput);
//! ```

use crate::format::{self, Tag, HEADER_LEN};
use crate::hash;
use crate::map::MapEntry;
use crate::options::{KeyCheck, ParseOptions};
use crate::parser::PathDisplay;
use crate::{EdnMap, Error, Location, Result, Value};

/// Cursor over an EDNB buffer.
pub struct Decoder<'b> {
    input: &'b [u8],
    offset: usize,
    depth: usize,
    path: Vec<Value>,
    options: ParseOptions,
}

impl<'b> Decoder<'b> {
    pub fn new(input: &'b [u8]) -> Self {
        Self::with_options(input, ParseOptions::default())
    }

    pub fn with_options(input: &'b [u8], options: ParseOptions) -> Self {
        Decoder {
            input,
            offset: 0,
            depth: 0,
            path: Vec::new(),
            options,
        }
    }

    /// Decodes the root frame and checks that nothing follows it.
    pub fn decode(mut self) -> Result<Value> {
        tracing::debug!(len = self.input.len(), "decoding EDNB buffer");

        let value = self.read_value()?;
        if self.offset != self.input.len() {
            return Err(Error::TrailingBytes {
                offset: self.offset,
            });
        }

        tracing::debug!(kind = value.type_name(), size = value.size(), "decoded EDNB value");
        Ok(value)
    }

    fn remaining(&self) -> usize {
        self.input.len() - self.offset
    }

    fn take(&mut self, len: usize) -> Result<&'b [u8]> {
        let available = self.remaining();
        if len > available {
            return Err(Error::truncated(self.offset, len, available));
        }
        let bytes = &self.input[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(HEADER_LEN)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_value(&mut self) -> Result<Value> {
        let header_offset = self.offset;
        let (bits, size) = format::unpack_header(self.read_u32()?);

        let tag = match Tag::from_bits(bits) {
            Some(tag @ (Tag::Map | Tag::String)) => tag,
            _ => {
                return Err(Error::UnknownTag {
                    offset: header_offset,
                    tag: bits,
                })
            }
        };
        tracing::trace!(offset = header_offset, %tag, size, "read EDNB header");

        match tag {
            Tag::String => self.read_string(size).map(Value::String),
            _ => self.read_map(header_offset, size).map(Value::Map),
        }
    }

    fn read_string(&mut self, size: usize) -> Result<String> {
        let start = self.offset;
        let bytes = self.take(size)?;
        match std::str::from_utf8(bytes) {
            Ok(s) => Ok(s.to_string()),
            Err(e) => Err(Error::InvalidUtf8 {
                at: Location::Binary {
                    offset: start + e.valid_up_to(),
                },
            }),
        }
    }

    fn read_map(&mut self, header_offset: usize, size: usize) -> Result<EdnMap> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(Error::NestingTooDeep {
                at: Location::Binary {
                    offset: header_offset,
                },
                max: self.options.max_depth,
                path: self.path_string(),
            });
        }

        // every entry takes at least two headers
        let capacity = size.min(self.remaining() / (2 * HEADER_LEN));
        let mut entries = Vec::with_capacity(capacity);
        let mut key_offsets = Vec::with_capacity(capacity);

        for _ in 0..size {
            let key_offset = self.offset;
            let key = self.read_value()?;
            self.path.push(key.clone());
            let value = self.read_value()?;
            self.path.pop();

            entries.push(MapEntry::new(key, value));
            key_offsets.push(key_offset);
        }

        let duplicate = {
            let keys: Vec<&Value> = entries.iter().map(|entry| &entry.key).collect();
            match self.options.key_check {
                KeyCheck::Pairwise => hash::find_duplicate(&keys),
                KeyCheck::Hashed => hash::find_duplicate_hashed(&keys),
            }
        };
        if let Some((_, later)) = duplicate {
            return Err(Error::duplicate_key(
                Location::Binary {
                    offset: key_offsets[later],
                },
                &entries[later].key.to_string(),
                &self.path_string(),
            ));
        }

        self.depth -= 1;
        Ok(EdnMap::from_unique_entries(entries))
    }

    fn path_string(&self) -> String {
        PathDisplay(&self.path).to_string()
    }
}

/// Decodes one EDNB root frame with default options.
pub fn decode(input: &[u8]) -> Result<Value> {
    Decoder::new(input).decode()
}

/// Decodes one EDNB root frame with custom options.
pub fn decode_with_options(input: &[u8], options: ParseOptions) -> Result<Value> {
    Decoder::with_options(input, options).decode()
}
