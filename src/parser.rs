//! Recursive-descent parser from EDN text to a [`Value`] tree.
//!
//! ## Overview
//!
//! The parser pulls tokens from the [`Lexer`] and builds the tree depth first:
//!
//! - **Maps** are read key, value, key, value, ... until `}`; keys and values
//!   may each be a string or a nested map
//! - **Uniqueness** is checked once a map is complete, using the structural
//!   hash and structural equality
//! - **Depth** is bounded by [`ParseOptions::max_depth`]; exceeding it is an
//!   error instead of unbounded recursion
//! - **Nesting path**: the keys of the entries currently being parsed are
//!   kept on a stack, reported in errors, logged at `TRACE` and passed to an
//!   optional hook
//!
//! Any error aborts the whole parse.
//!
//! ## Usage
//!
//! Most users should call [`parse`](crate::parse). The parser can be used
//! directly to observe the nesting path:
//!
//! ```rust
//! use serde_ednb::Parser;
//!
//! let mut paths = Vec::new();
//! let value = Parser::new(r#"{"a" {"b" "c"}}"#)
//!     .on_entry(|path| {
//!         let keys: Vec<String> = path.iter().map(|k| k.to_string()).collect();
//!         paths.push(keys.join("/"));
//!     })
//!     .parse()
//!     .unwrap();
//!
//! assert_eq!(value.size(), 1);
//! assert_eq!(paths, vec![r#""a"/"b""#, r#""a""#]);
//! ```

use crate::hash;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::map::MapEntry;
use crate::options::{KeyCheck, ParseOptions};
use crate::{EdnMap, Error, Location, Result, Value};
use std::fmt;

/// Tokens that may start a key or a value.
const FORM_START: &[TokenKind] = &[TokenKind::StringStart, TokenKind::MapOpen];

/// Renders a nesting path as `"a" > {"k" "v"} > "b"`.
pub struct PathDisplay<'p>(pub &'p [Value]);

impl fmt::Display for PathDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" > ")?;
            }
            write!(f, "{}", key)?;
        }
        Ok(())
    }
}

type EntryHook<'a> = Box<dyn FnMut(&[Value]) + 'a>;

/// The EDN text parser.
///
/// Created via [`Parser::new`] or [`Parser::with_options`] and consumed by
/// [`Parser::parse`].
pub struct Parser<'a> {
    input: &'a str,
    lexer: Lexer<'a>,
    options: ParseOptions,
    depth: usize,
    path: Vec<Value>,
    on_entry: Option<EntryHook<'a>>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_options(input, ParseOptions::default())
    }

    pub fn with_options(input: &'a str, options: ParseOptions) -> Self {
        Parser {
            input,
            lexer: Lexer::new(input.as_bytes()),
            options,
            depth: 0,
            path: Vec::new(),
            on_entry: None,
        }
    }

    /// Installs a hook called after every map entry with the current nesting
    /// path; the last element is the key of the entry just parsed.
    #[must_use]
    pub fn on_entry<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&[Value]) + 'a,
    {
        self.on_entry = Some(Box::new(hook));
        self
    }

    /// Parses the whole input as exactly one value.
    pub fn parse(mut self) -> Result<Value> {
        tracing::debug!(len = self.input.len(), "parsing EDN text");

        let token = self.lexer.next_token();
        let value = self.parse_value(token, "string or map")?;

        let trailing = self.lexer.next_token();
        if trailing.kind != TokenKind::Eof {
            return Err(self.unexpected(trailing, "end of input"));
        }

        tracing::debug!(kind = value.type_name(), size = value.size(), "parsed EDN value");
        Ok(value)
    }

    /// Reads the next token and checks it against `expected`.
    fn advance(&mut self, expected: &[TokenKind]) -> std::result::Result<Token, Token> {
        let token = self.lexer.next_token();
        if token.kind.is_one_of(expected) {
            Ok(token)
        } else {
            Err(token)
        }
    }

    fn parse_value(&mut self, token: Token, expected: &str) -> Result<Value> {
        match token.kind {
            TokenKind::MapOpen => self.parse_map(token).map(Value::Map),
            TokenKind::StringStart => self.parse_string(token).map(Value::String),
            _ => Err(self.unexpected(token, expected)),
        }
    }

    fn parse_map(&mut self, open: Token) -> Result<EdnMap> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(Error::NestingTooDeep {
                at: self.location(open.offset),
                max: self.options.max_depth,
                path: self.path_string(),
            });
        }

        let mut entries = Vec::new();
        let mut key_offsets = Vec::new();

        loop {
            let key_token = match self.advance(FORM_START) {
                Ok(token) => token,
                Err(token) if token.kind == TokenKind::MapClose => break,
                Err(token) => {
                    return Err(Error::UnterminatedMap {
                        at: self.location(token.offset),
                        path: self.path_string(),
                    })
                }
            };
            let key = self.parse_value(key_token, "map key")?;
            self.path.push(key.clone());

            let value_token = match self.advance(FORM_START) {
                Ok(token) => token,
                Err(token) => return Err(self.value_position_error(token)),
            };
            let value = self.parse_value(value_token, "map value (string or map)")?;

            self.report_entry();
            self.path.pop();

            entries.push(MapEntry::new(key, value));
            key_offsets.push(key_token.offset);
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
                self.location(key_offsets[later]),
                &entries[later].key.to_string(),
                &self.path_string(),
            ));
        }

        self.depth -= 1;
        Ok(EdnMap::from_unique_entries(entries))
    }

    fn parse_string(&mut self, token: Token) -> Result<String> {
        match self.lexer.scan_string() {
            Some(range) => Ok(self.input[range].to_string()),
            None => Err(Error::UnterminatedString {
                at: self.location(token.offset),
                path: self.path_string(),
            }),
        }
    }

    fn value_position_error(&self, token: Token) -> Error {
        let at = self.location(token.offset);
        match token.kind {
            TokenKind::MapClose => Error::OddMapArity {
                at,
                path: self.path_string(),
            },
            TokenKind::Eof => Error::UnterminatedMap {
                at,
                path: self.path_string(),
            },
            _ => self.unexpected(token, "map value (string or map)"),
        }
    }

    fn report_entry(&mut self) {
        tracing::trace!(depth = self.depth, path = %PathDisplay(&self.path), "parsed map entry");
        if let Some(hook) = self.on_entry.as_mut() {
            hook(&self.path);
        }
    }

    fn unexpected(&self, token: Token, expected: &str) -> Error {
        Error::unexpected_token(
            self.location(token.offset),
            expected,
            token.kind.describe(),
            &self.path_string(),
        )
    }

    fn location(&self, offset: usize) -> Location {
        Location::in_text(self.input.as_bytes(), offset)
    }

    fn path_string(&self) -> String {
        PathDisplay(&self.path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn parse(input: &str) -> Result<Value> {
        Parser::new(input).parse()
    }

    fn nested(depth: usize) -> String {
        let mut text = String::from("\"leaf\"");
        for _ in 0..depth {
            text = format!("{{\"k\" {}}}", text);
        }
        text
    }

    #[test]
    fn test_empty_map() {
        let value = parse("{}").unwrap();
        assert_eq!(value.size(), 0);
        assert!(value.as_map().unwrap().is_empty());
    }

    #[test]
    fn test_single_entry() {
        let value = parse(r#"{"a" "b"}"#).unwrap();
        assert_eq!(value.size(), 1);
        assert_eq!(value.get("a"), Some(&Value::from("b")));
    }

    #[test]
    fn test_root_string() {
        assert_eq!(parse(r#"  "just text"  "#).unwrap(), Value::from("just text"));
    }

    #[test]
    fn test_entry_order_is_preserved() {
        let value = parse(r#"{"z" "1", "a" "2", "m" "3"}"#).unwrap();
        let keys: Vec<_> = value
            .as_map()
            .unwrap()
            .keys()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_map_as_key() {
        let value = parse(r#"{{"id" "1"} "first" {"id" "2"} "second"}"#).unwrap();
        let map = value.as_map().unwrap();
        let key = parse(r#"{"id" "2"}"#).unwrap();
        assert_eq!(map.get(&key), Some(&Value::from("second")));
    }

    #[test]
    fn test_duplicate_key() {
        let err = parse(r#"{"a" "b" "a" "c"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateKey);
        // reported at the second occurrence
        assert_eq!(err.location(), Some(Location::Text { line: 1, column: 10 }));
        assert!(err.to_string().contains(r#"Duplicate key "a""#));
    }

    #[test]
    fn test_duplicate_map_keys_in_any_order() {
        let err = parse(r#"{{"x" "1" "y" "2"} "a" {"y" "2" "x" "1"} "b"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateKey);
    }

    #[test]
    fn test_colliding_hashes_are_not_duplicates() {
        // both keys hash to 0
        let value = parse(r#"{{"a" "a"} "1" {"b" "b"} "2"}"#).unwrap();
        assert_eq!(value.size(), 2);
    }

    #[test]
    fn test_duplicate_reporting_by_strategy() {
        let input = r#"{"a" "1" "b" "2" "b" "3" "a" "4"}"#;

        let err = Parser::new(input).parse().unwrap_err();
        assert!(err.to_string().contains(r#"Duplicate key "a""#));

        let options = ParseOptions::new().with_key_check(KeyCheck::Hashed);
        let err = Parser::with_options(input, options).parse().unwrap_err();
        assert!(err.to_string().contains(r#"Duplicate key "b""#));
    }

    #[test]
    fn test_unterminated_map() {
        let err = parse(r#"{"a" "b""#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnterminatedMap);

        let err = parse("{").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnterminatedMap);

        // an unsupported form where a key should be
        let err = parse(r#"{"a" "b" :c "d"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnterminatedMap);
    }

    #[test]
    fn test_eof_after_key_is_unterminated() {
        let err = parse(r#"{"a""#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnterminatedMap);
    }

    #[test]
    fn test_odd_arity() {
        let err = parse(r#"{"a"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OddMapArity);
        assert!(err.to_string().contains(r#"(in "a")"#));

        let err = parse(r#"{"a" "b" "c"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OddMapArity);
    }

    #[test]
    fn test_unexpected_value_token() {
        let err = parse(r#"{"a" 42}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedToken);
        let msg = err.to_string();
        assert!(msg.contains("number (unsupported)"));
        assert!(msg.contains("line 1, column 6"));
    }

    #[test]
    fn test_unexpected_root_token() {
        for input in ["", "   ", "[]", "}", "@", "true"] {
            let err = parse(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnexpectedToken, "input {:?}", input);
        }
    }

    #[test]
    fn test_trailing_content() {
        let err = parse(r#"{} {}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedToken);
        assert!(err.to_string().contains("expected end of input"));
        assert!(parse("{}  ,\n").is_ok());
    }

    #[test]
    fn test_unterminated_string() {
        let err = parse(r#"{"a" "b}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnterminatedString);
        assert_eq!(err.location(), Some(Location::Text { line: 1, column: 6 }));
    }

    #[test]
    fn test_nested_map() {
        let value = parse(r#"{"a" {"b" "c"}}"#).unwrap();
        assert_eq!(value.size(), 1);
        let inner = value.get("a").unwrap();
        assert_eq!(inner.size(), 1);
        assert_eq!(inner.get("b"), Some(&Value::from("c")));
    }

    #[test]
    fn test_depth_limit() {
        assert!(parse(&nested(10)).is_ok());

        let err = parse(&nested(11)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NestingTooDeep);
        assert!(err.to_string().contains("maximum of 10"));
    }

    #[test]
    fn test_depth_limit_counts_key_maps() {
        let options = ParseOptions::new().with_max_depth(2);
        assert!(Parser::with_options(r#"{{"a" "b"} "c"}"#, options.clone())
            .parse()
            .is_ok());
        let err = Parser::with_options(r#"{{{"a" "b"} "c"} "d"}"#, options)
            .parse()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NestingTooDeep);
    }

    #[test]
    fn test_configured_depth() {
        let options = ParseOptions::new().with_max_depth(20);
        assert!(Parser::with_options(&nested(20), options).parse().is_ok());

        let options = ParseOptions::new().with_max_depth(0);
        let err = Parser::with_options("{}", options).parse().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NestingTooDeep);
        // strings need no depth
        let options = ParseOptions::new().with_max_depth(0);
        assert!(Parser::with_options(r#""s""#, options).parse().is_ok());
    }

    #[test]
    fn test_error_path_names_open_keys() {
        let err = parse(r#"{"outer" {"inner" {"x" "1" "x" "2"}}}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateKey);
        assert!(err.to_string().ends_with(r#"(in "outer" > "inner")"#));
    }

    #[test]
    fn test_entry_hook_sees_path() {
        let mut seen = Vec::new();
        Parser::new(r#"{"a" "1" "b" {"c" "2"}}"#)
            .on_entry(|path| seen.push(PathDisplay(path).to_string()))
            .parse()
            .unwrap();
        assert_eq!(seen, vec![r#""a""#, r#""b" > "c""#, r#""b""#]);
    }

    #[test]
    fn test_multiline_location() {
        let err = parse("{\"a\" \"b\"\n \"c\"\n}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OddMapArity);
        assert_eq!(err.location(), Some(Location::Text { line: 3, column: 1 }));
    }

    #[test]
    fn test_parsed_maps_are_hashed() {
        let value = parse(r#"{"a" {"b" "c"}}"#).unwrap();
        let map = value.as_map().unwrap();
        assert!(map.cached_hash().is_some());
        assert!(map.get_str("a").unwrap().as_map().unwrap().cached_hash().is_some());
    }
}
