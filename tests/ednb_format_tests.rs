//! Byte-level checks of the EDNB layout and of decoder error reporting.

use serde_ednb::format::{pack_header, unpack_header, Tag, MAX_SIZE, SIZE_MASK};
use serde_ednb::{
    edn, from_bytes, from_bytes_with_options, parse, to_bytes, to_bytes_with_options, EdnMap,
    Error, ErrorKind, ParseOptions, Value, DEFAULT_MAX_DEPTH,
};

fn header(tag: u32, size: u32) -> [u8; 4] {
    ((tag << 28) | size).to_le_bytes()
}

fn string_frame(s: &str) -> Vec<u8> {
    let mut out = header(0x3, s.len() as u32).to_vec();
    out.extend_from_slice(s.as_bytes());
    out
}

#[test]
fn test_header_is_little_endian() {
    let bytes = to_bytes(&Value::from("abcde")).unwrap();
    assert_eq!(&bytes[..4], &[0x05, 0x00, 0x00, 0x30]);
    assert_eq!(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]), 0x3000_0005);
}

#[test]
fn test_string_size_is_byte_length() {
    let bytes = to_bytes(&Value::from("ñ")).unwrap();
    assert_eq!(bytes, [0x02, 0, 0, 0x30, 0xC3, 0xB1]);
}

#[test]
fn test_map_size_is_entry_count() {
    let value = parse(r#"{"a" "1" "b" "2" "c" "3"}"#).unwrap();
    let bytes = to_bytes(&value).unwrap();
    assert_eq!(&bytes[..4], &header(0x1, 3));
}

#[test]
fn test_full_layout() {
    let value = parse(r#"{"k" {"x" "yz"}}"#).unwrap();
    let mut expected = header(0x1, 1).to_vec();
    expected.extend(string_frame("k"));
    expected.extend(header(0x1, 1));
    expected.extend(string_frame("x"));
    expected.extend(string_frame("yz"));
    assert_eq!(to_bytes(&value).unwrap(), expected);
}

#[test]
fn test_map_key_frames() {
    let value = edn!({ {"id": "1"}: "row" });
    let mut expected = header(0x1, 1).to_vec();
    expected.extend(header(0x1, 1));
    expected.extend(string_frame("id"));
    expected.extend(string_frame("1"));
    expected.extend(string_frame("row"));
    assert_eq!(to_bytes(&value).unwrap(), expected);
    assert_eq!(from_bytes(&expected).unwrap(), value);
}

#[test]
fn test_pack_unpack() {
    let word = pack_header(Tag::Map, 12).unwrap();
    assert_eq!(unpack_header(word), (Tag::Map as u32, 12));
    assert_eq!(SIZE_MASK as usize, MAX_SIZE);
}

#[test]
fn test_decode_reads_handwritten_frames() {
    let mut bytes = header(0x1, 2).to_vec();
    bytes.extend(string_frame("b"));
    bytes.extend(string_frame("2"));
    bytes.extend(string_frame("a"));
    bytes.extend(header(0x1, 0));

    let value = from_bytes(&bytes).unwrap();
    assert_eq!(value, parse(r#"{"a" {} "b" "2"}"#).unwrap());
    // entry order follows the buffer
    let first = value.as_map().unwrap().keys().next().unwrap();
    assert_eq!(first, &Value::from("b"));
}

#[test]
fn test_vector_tag_rejected() {
    let bytes = header(0x2, 0);
    let err = from_bytes(&bytes).unwrap_err();
    match err {
        Error::UnknownTag { offset, tag } => {
            assert_eq!(offset, 0);
            assert_eq!(tag, 0x2);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_unknown_tag_in_nested_frame() {
    let mut bytes = header(0x1, 1).to_vec();
    bytes.extend(string_frame("k"));
    bytes.extend(header(0x7, 0));
    let err = from_bytes(&bytes).unwrap_err();
    match err {
        Error::UnknownTag { offset, tag } => {
            assert_eq!(offset, 9);
            assert_eq!(tag, 0x7);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_every_truncation_fails() {
    let value = parse(r#"{"alpha" {"beta" "gamma"} "delta" "epsilon"}"#).unwrap();
    let bytes = to_bytes(&value).unwrap();
    for len in 0..bytes.len() {
        let err = from_bytes(&bytes[..len]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput, "prefix length {}", len);
    }
}

#[test]
fn test_trailing_bytes_rejected() {
    let mut bytes = to_bytes(&parse("{}").unwrap()).unwrap();
    bytes.extend(to_bytes(&parse("{}").unwrap()).unwrap());
    let err = from_bytes(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TrailingBytes);
}

#[test]
fn test_invalid_utf8_rejected() {
    let mut bytes = header(0x3, 2).to_vec();
    bytes.extend([0xC3, 0x28]);
    let err = from_bytes(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidUtf8);
}

#[test]
fn test_duplicate_keys_in_buffer_rejected() {
    let mut bytes = header(0x1, 2).to_vec();
    for s in ["k", "1", "k", "2"] {
        bytes.extend(string_frame(s));
    }
    let err = from_bytes(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateKey);
}

#[test]
fn test_oversized_declarations_fail_cleanly() {
    let err = from_bytes(&header(0x3, SIZE_MASK)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TruncatedInput);

    let err = from_bytes(&header(0x1, SIZE_MASK)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TruncatedInput);
}

fn map_chain(depth: usize) -> Value {
    let mut value = Value::from("leaf");
    for i in 0..depth {
        let mut map = EdnMap::new();
        map.insert(Value::from(format!("k{}", i).as_str()), value);
        value = Value::Map(map);
    }
    value
}

#[test]
fn test_encoded_trees_always_decode() {
    let value = map_chain(DEFAULT_MAX_DEPTH);
    assert_eq!(from_bytes(&to_bytes(&value).unwrap()).unwrap(), value);

    // a tree built in memory can be deeper than the parser allows
    let deep = map_chain(DEFAULT_MAX_DEPTH + 1);
    let err = to_bytes(&deep).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NestingTooDeep);

    let options = ParseOptions::new().with_max_depth(DEFAULT_MAX_DEPTH + 1);
    let bytes = to_bytes_with_options(&deep, &options).unwrap();
    assert_eq!(from_bytes_with_options(&bytes, options).unwrap(), deep);
}

#[test]
fn test_map_keys_count_toward_encoder_depth() {
    let mut root = EdnMap::new();
    root.insert(map_chain(DEFAULT_MAX_DEPTH), Value::from("v"));
    let err = to_bytes(&Value::Map(root)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NestingTooDeep);

    let mut root = EdnMap::new();
    root.insert(map_chain(DEFAULT_MAX_DEPTH - 1), Value::from("v"));
    let value = Value::Map(root);
    assert_eq!(from_bytes(&to_bytes(&value).unwrap()).unwrap(), value);
}
