//! Tokenizer for EDN text.
//!
//! The lexer classifies the next significant character of the input and
//! advances a byte cursor. Whitespace (space, `\n`, `\r`) and commas are
//! insignificant. Tab is accepted as whitespace too, as EDN itself does,
//! which widens the minimal separator set. Every advance is bounded by the input length; running out of
//! input is reported as [`TokenKind::Eof`].
//!
//! Only map delimiters and strings are consumed as tokens. The other EDN forms
//! (vectors, numbers, keywords, ...) are recognized so errors can name them,
//! but the cursor stays on them.
//!
//! ```rust
//! use serde_ednb::lexer::{Lexer, TokenKind};
//!
//! let mut lexer = Lexer::new(br#" { "a" } "#);
//! assert_eq!(lexer.next_token().kind, TokenKind::MapOpen);
//! assert_eq!(lexer.next_token().kind, TokenKind::StringStart);
//! let range = lexer.scan_string().unwrap();
//! assert_eq!(range, 4..5);
//! assert_eq!(lexer.next_token().kind, TokenKind::MapClose);
//! assert_eq!(lexer.next_token().kind, TokenKind::Eof);
//! ```

use std::fmt;
use std::ops::Range;

/// Classes of token the lexer can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `{`, consumed
    MapOpen,
    /// `}`, consumed
    MapClose,
    /// `"`, the cursor stays on the quote for [`Lexer::scan_string`]
    StringStart,
    VectorOpen,
    /// `#` (sets, tagged literals, discard)
    Dispatch,
    Number,
    Keyword,
    Boolean,
    Symbol,
    Unknown,
    Eof,
}

impl TokenKind {
    /// Human-readable name used in error messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            TokenKind::MapOpen => "'{'",
            TokenKind::MapClose => "'}'",
            TokenKind::StringStart => "string",
            TokenKind::VectorOpen => "vector (unsupported)",
            TokenKind::Dispatch => "dispatch form (unsupported)",
            TokenKind::Number => "number (unsupported)",
            TokenKind::Keyword => "keyword (unsupported)",
            TokenKind::Boolean => "boolean (unsupported)",
            TokenKind::Symbol => "symbol (unsupported)",
            TokenKind::Unknown => "unknown character",
            TokenKind::Eof => "end of input",
        }
    }

    /// Returns `true` if this kind is a member of `set`.
    #[inline]
    #[must_use]
    pub fn is_one_of(self, set: &[TokenKind]) -> bool {
        set.contains(&self)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A classified token and the byte offset where it starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

/// Byte cursor over EDN text.
pub struct Lexer<'a> {
    input: &'a [u8],
    position: usize,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Lexer { input, position: 0 }
    }

    /// Current cursor offset.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn input(&self) -> &'a [u8] {
        self.input
    }

    /// Returns `true` for bytes that separate tokens: space, `\n`, `\r`,
    /// `,` and tab.
    #[inline]
    #[must_use]
    pub const fn is_whitespace(byte: u8) -> bool {
        matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | b',')
    }

    fn skip_whitespace(&mut self) {
        while let Some(&byte) = self.input.get(self.position) {
            if !Self::is_whitespace(byte) {
                break;
            }
            self.position += 1;
        }
    }

    /// Skips whitespace and classifies the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        let offset = self.position;

        let kind = match self.input.get(offset) {
            None => TokenKind::Eof,
            Some(b'{') => {
                self.position += 1;
                TokenKind::MapOpen
            }
            Some(b'}') => {
                self.position += 1;
                TokenKind::MapClose
            }
            Some(b'"') => TokenKind::StringStart,
            Some(&byte) => self.classify_unsupported(byte, offset),
        };

        Token { kind, offset }
    }

    fn classify_unsupported(&self, byte: u8, offset: usize) -> TokenKind {
        let next = self.input.get(offset + 1).copied();
        match byte {
            b'[' => TokenKind::VectorOpen,
            b'#' => TokenKind::Dispatch,
            b':' => TokenKind::Keyword,
            b'0'..=b'9' => TokenKind::Number,
            b'+' | b'-' if next.map_or(false, |b| b.is_ascii_digit()) => TokenKind::Number,
            _ if self.is_word_at(offset, b"true") || self.is_word_at(offset, b"false") => {
                TokenKind::Boolean
            }
            _ if byte.is_ascii_alphabetic() || b".*+!-_?$%&=<>/'".contains(&byte) => {
                TokenKind::Symbol
            }
            _ => TokenKind::Unknown,
        }
    }

    fn is_word_at(&self, offset: usize, word: &[u8]) -> bool {
        let rest = &self.input[offset..];
        rest.starts_with(word)
            && rest
                .get(word.len())
                .map_or(true, |&b| Self::is_whitespace(b) || b"{}[]()\"".contains(&b))
    }

    /// Scans a string literal whose opening quote is under the cursor.
    ///
    /// Returns the byte range of the contents (quotes excluded) and moves the
    /// cursor past the closing quote. There is no escape processing: the next
    /// `"` byte always closes the string. Returns `None`, leaving the cursor
    /// in place, if the cursor is not on a quote or no closing quote exists.
    pub fn scan_string(&mut self) -> Option<Range<usize>> {
        if self.input.get(self.position) != Some(&b'"') {
            return None;
        }
        let start = self.position + 1;
        let len = self.input[start..].iter().position(|&b| b == b'"')?;
        let end = start + len;
        self.position = end + 1;
        Some(start..end)
    }
}
