//! EDN Text Subset and EDNB Binary Format
//!
//! This module documents both formats as implemented by this library and
//! holds the constants shared by the encoder and decoder.
//!
//! # Text
//!
//! The accepted text is the string-and-map subset of EDN:
//!
//! ```text
//! value  := string | map
//! map    := '{' entry* '}'
//! entry  := value value
//! string := '"' byte* '"'
//! ```
//!
//! **Rules**:
//! - Whitespace is space, tab, `\n`, `\r` and `,`; it may appear between any
//!   two tokens
//! - Keys and values may be strings or maps, so `{{"id" "1"} "row"}` is valid
//! - The keys of one map must be pairwise distinct under structural equality
//! - Entry order is kept for iteration and encoding but ignored by equality
//! - Exactly one value per input; trailing non-whitespace is an error
//! - Strings have no escape sequences: the first `"` after the opening quote
//!   closes the string, so `"a\"b"` reads as `a\` followed by stray input
//!
//! Vectors, lists, sets, numbers, keywords, symbols, booleans, `nil`, tagged
//! literals and comments are not part of the subset. The lexer recognizes
//! them only to name them in errors.
//!
//! # EDNB
//!
//! EDNB is a pre-order, length-prefixed encoding. Every value is one *frame*:
//!
//! ```text
//! +----------------------------+------------------------------+
//! | header: u32 little-endian  | payload                      |
//! +----------------------------+------------------------------+
//!   bits 28..32 = tag
//!   bits  0..28 = size
//! ```
//!
//! | Tag | Type | Size | Payload |
//! |-----|------|------|---------|
//! | `0x1` | Map | number of entries | `size` x (key frame, value frame) |
//! | `0x2` | Vector | reserved | rejected by the decoder |
//! | `0x3` | String | byte length | exactly `size` bytes of UTF-8 |
//!
//! A buffer holds exactly one root frame. Sizes above [`MAX_SIZE`] cannot be
//! represented.
//!
//! ## Example
//!
//! `{"a" "bc"}` encodes as:
//!
//! ```text
//! 01 00 00 10   map, 1 entry
//! 01 00 00 30   string, 1 byte
//! 61            "a"
//! 02 00 00 30   string, 2 bytes
//! 62 63         "bc"
//! ```
//!
//! ```rust
//! use serde_ednb::{parse, to_bytes};
//!
//! let bytes = to_bytes(&parse(r#"{"a" "bc"}"#).unwrap()).unwrap();
//! assert_eq!(
//!     bytes,
//!     [0x01, 0, 0, 0x10, 0x01, 0, 0, 0x30, b'a', 0x02, 0, 0, 0x30, b'b', b'c']
//! );
//! ```

use std::fmt;

/// Size of a frame header in bytes.
pub const HEADER_LEN: usize = 4;

/// Mask selecting the size bits of a header.
pub const SIZE_MASK: u32 = 0x0FFF_FFFF;

/// Position of the tag bits in a header.
pub const TAG_SHIFT: u32 = 28;

/// Mask selecting the tag bits of a header.
pub const TAG_MASK: u32 = !SIZE_MASK;

/// Largest size a header can carry.
pub const MAX_SIZE: usize = SIZE_MASK as usize;

/// Frame type tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Tag {
    Map = 0x1,
    /// Reserved; never written, rejected when read.
    Vector = 0x2,
    String = 0x3,
}

impl Tag {
    /// Maps raw tag bits to a tag, `None` if unassigned.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Option<Tag> {
        match bits {
            0x1 => Some(Tag::Map),
            0x2 => Some(Tag::Vector),
            0x3 => Some(Tag::String),
            _ => None,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tag::Map => "map",
            Tag::Vector => "vector",
            Tag::String => "string",
        };
        f.write_str(name)
    }
}

/// Packs a tag and size into a header word.
///
/// Returns `None` if `size` exceeds [`MAX_SIZE`].
///
/// ```rust
/// use serde_ednb::format::{pack_header, Tag};
///
/// assert_eq!(pack_header(Tag::String, 5), Some(0x3000_0005));
/// assert_eq!(pack_header(Tag::Map, 1 << 28), None);
/// ```
#[inline]
#[must_use]
pub fn pack_header(tag: Tag, size: usize) -> Option<u32> {
    let size = u32::try_from(size).ok().filter(|&s| s <= SIZE_MASK)?;
    Some(((tag as u32) << TAG_SHIFT) | size)
}

/// Splits a header word into raw tag bits and size.
#[inline]
#[must_use]
pub const fn unpack_header(header: u32) -> (u32, usize) {
    ((header & TAG_MASK) >> TAG_SHIFT, (header & SIZE_MASK) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        assert_eq!(pack_header(Tag::Map, 0), Some(0x1000_0000));
        assert_eq!(pack_header(Tag::String, MAX_SIZE), Some(0x3FFF_FFFF));
        assert_eq!(unpack_header(0x3FFF_FFFF), (0x3, MAX_SIZE));
        assert_eq!(unpack_header(0x1000_0002), (0x1, 2));
    }

    #[test]
    fn test_size_overflow() {
        assert_eq!(pack_header(Tag::String, MAX_SIZE + 1), None);
        assert_eq!(pack_header(Tag::String, usize::MAX), None);
    }

    #[test]
    fn test_tag_bits() {
        assert_eq!(Tag::from_bits(0x1), Some(Tag::Map));
        assert_eq!(Tag::from_bits(0x2), Some(Tag::Vector));
        assert_eq!(Tag::from_bits(0x3), Some(Tag::String));
        assert_eq!(Tag::from_bits(0x0), None);
        assert_eq!(Tag::from_bits(0xF), None);
        assert_eq!(Tag::Vector.to_string(), "vector");
    }

    #[test]
    fn test_masks_partition_the_word() {
        assert_eq!(TAG_MASK | SIZE_MASK, u32::MAX);
        assert_eq!(TAG_MASK & SIZE_MASK, 0);
    }
}
