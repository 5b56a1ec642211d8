//! Error types for EDN parsing and EDNB encoding/decoding.
//!
//! Every failure aborts the whole call: there are no partial trees and no
//! error recovery. Errors carry enough context to find the problem:
//!
//! - **Text errors** report a line/column [`Location`] and the nesting path of
//!   map keys that were open when the error was detected
//! - **Binary errors** report the byte offset into the EDNB buffer
//!
//! Use [`Error::kind`] to match on the category without destructuring.
//!
//! ## Examples
//!
//! ```rust
//! use serde_ednb::{parse, ErrorKind};
//!
//! let err = parse(r#"{"user" {"name" "a" "name" "b"}}"#).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::DuplicateKey);
//!
//! // Messages include the position and the path of open keys
//! let msg = err.to_string();
//! assert!(msg.contains("line 1"));
//! assert!(msg.contains(r#""user""#));
//! ```

use std::fmt;
use thiserror::Error;

/// Where in the input an error was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// A position in EDN text (1-based line and column).
    Text { line: usize, column: usize },
    /// A byte offset into an EDNB buffer.
    Binary { offset: usize },
}

impl Location {
    /// Computes the line/column of a byte offset in `input`.
    pub(crate) fn in_text(input: &[u8], offset: usize) -> Self {
        let offset = offset.min(input.len());
        let before = &input[..offset];
        let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
        let column = match before.iter().rposition(|&b| b == b'\n') {
            Some(newline) => offset - newline,
            None => offset + 1,
        };
        Location::Text { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Text { line, column } => write!(f, "line {}, column {}", line, column),
            Location::Binary { offset } => write!(f, "byte offset {}", offset),
        }
    }
}

/// Represents all possible errors that can occur while parsing, encoding or decoding.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A token appears where the grammar does not allow it
    #[error("Unexpected token at {at}: expected {expected}, found {found}{}", render_path(.path))]
    UnexpectedToken {
        at: Location,
        expected: String,
        found: String,
        path: String,
    },

    /// A map's closing brace follows a key with no value
    #[error("Map literal must contain an even number of forms at {at}{}", render_path(.path))]
    OddMapArity { at: Location, path: String },

    /// The input ended, or an unsupported form appeared, before a map's closing brace
    #[error("Expected map terminator at {at}{}", render_path(.path))]
    UnterminatedMap { at: Location, path: String },

    /// A string literal has no closing quote
    #[error("Unterminated string starting at {at}{}", render_path(.path))]
    UnterminatedString { at: Location, path: String },

    /// Two keys of the same map are structurally equal
    #[error("Duplicate key {key} in map at {at}{}", render_path(.path))]
    DuplicateKey {
        at: Location,
        key: String,
        path: String,
    },

    /// Maps are nested deeper than the configured maximum
    #[error("Nesting depth exceeds the maximum of {max} at {at}{}", render_path(.path))]
    NestingTooDeep {
        at: Location,
        max: usize,
        path: String,
    },

    /// An EDNB header or payload declares more bytes than remain
    #[error("Truncated input at byte offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// An EDNB header carries a tag outside the supported set
    #[error("Unknown type tag {tag:#x} at byte offset {offset}")]
    UnknownTag { offset: usize, tag: u32 },

    /// Input text or an EDNB string payload is not valid UTF-8
    #[error("Invalid UTF-8 at {at}")]
    InvalidUtf8 { at: Location },

    /// Bytes remain after the root EDNB frame
    #[error("Trailing bytes after root value at byte offset {offset}")]
    TrailingBytes { offset: usize },

    /// A size does not fit the 28-bit EDNB size field
    #[error("{what} of {size} exceeds the 28-bit size field")]
    SizeOverflow { what: &'static str, size: usize },

    /// A Rust type that has no EDN representation
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

/// The category of an [`Error`], for matching without destructuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnexpectedToken,
    OddMapArity,
    UnterminatedMap,
    UnterminatedString,
    DuplicateKey,
    NestingTooDeep,
    TruncatedInput,
    UnknownTag,
    InvalidUtf8,
    TrailingBytes,
    SizeOverflow,
    UnsupportedType,
    Io,
    Custom,
}

fn render_path(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" (in {})", path)
    }
}

impl Error {
    /// Returns the category of this error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_ednb::{parse, ErrorKind};
    ///
    /// assert_eq!(parse(r#"{"a"}"#).unwrap_err().kind(), ErrorKind::OddMapArity);
    /// assert_eq!(parse(r#"{"a" "b""#).unwrap_err().kind(), ErrorKind::UnterminatedMap);
    /// ```
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnexpectedToken { .. } => ErrorKind::UnexpectedToken,
            Error::OddMapArity { .. } => ErrorKind::OddMapArity,
            Error::UnterminatedMap { .. } => ErrorKind::UnterminatedMap,
            Error::UnterminatedString { .. } => ErrorKind::UnterminatedString,
            Error::DuplicateKey { .. } => ErrorKind::DuplicateKey,
            Error::NestingTooDeep { .. } => ErrorKind::NestingTooDeep,
            Error::TruncatedInput { .. } => ErrorKind::TruncatedInput,
            Error::UnknownTag { .. } => ErrorKind::UnknownTag,
            Error::InvalidUtf8 { .. } => ErrorKind::InvalidUtf8,
            Error::TrailingBytes { .. } => ErrorKind::TrailingBytes,
            Error::SizeOverflow { .. } => ErrorKind::SizeOverflow,
            Error::UnsupportedType(_) => ErrorKind::UnsupportedType,
            Error::Io(_) => ErrorKind::Io,
            Error::Custom(_) => ErrorKind::Custom,
        }
    }

    /// Returns the location the error was detected at, if it has one.
    #[must_use]
    pub fn location(&self) -> Option<Location> {
        match self {
            Error::UnexpectedToken { at, .. }
            | Error::OddMapArity { at, .. }
            | Error::UnterminatedMap { at, .. }
            | Error::UnterminatedString { at, .. }
            | Error::DuplicateKey { at, .. }
            | Error::NestingTooDeep { at, .. }
            | Error::InvalidUtf8 { at } => Some(*at),
            Error::TruncatedInput { offset, .. }
            | Error::UnknownTag { offset, .. }
            | Error::TrailingBytes { offset } => Some(Location::Binary { offset: *offset }),
            Error::SizeOverflow { .. }
            | Error::UnsupportedType(_)
            | Error::Io(_)
            | Error::Custom(_) => None,
        }
    }

    /// Creates an unexpected-token error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_ednb::{Error, Location};
    ///
    /// let at = Location::Text { line: 2, column: 7 };
    /// let err = Error::unexpected_token(at, "string or map", "keyword", "");
    /// assert!(err.to_string().contains("line 2, column 7"));
    /// ```
    pub fn unexpected_token(at: Location, expected: &str, found: &str, path: &str) -> Self {
        Error::UnexpectedToken {
            at,
            expected: expected.to_string(),
            found: found.to_string(),
            path: path.to_string(),
        }
    }

    /// Creates a duplicate-key error; `key` is the rendered offending key.
    pub fn duplicate_key(at: Location, key: &str, path: &str) -> Self {
        Error::DuplicateKey {
            at,
            key: key.to_string(),
            path: path.to_string(),
        }
    }

    /// Creates a truncated-input error for a binary read at `offset`.
    pub fn truncated(offset: usize, needed: usize, available: usize) -> Self {
        Error::TruncatedInput {
            offset,
            needed,
            available,
        }
    }

    /// Creates an unsupported type error for Rust types that have no EDN form.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_ednb::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader/writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
