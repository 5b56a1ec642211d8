//! The EDNB layout, and what the decoder does with damaged input.
//!
//! Run with: cargo run --example binary_roundtrip

use serde_ednb::format::{unpack_header, Tag, HEADER_LEN};
use serde_ednb::{from_bytes, parse, to_writer};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let value = parse(r#"{"k" {"x" "yz"}}"#)?;

    let mut bytes = Vec::new();
    to_writer(&mut bytes, &value)?;

    println!("{} encodes to {} bytes:", value, bytes.len());
    let mut offset = 0;
    while offset + HEADER_LEN <= bytes.len() {
        let word = u32::from_le_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ]);
        let (tag, size) = unpack_header(word);
        let payload = if Tag::from_bits(tag) == Some(Tag::String) { size } else { 0 };
        println!(
            "  @{:<3} tag {:#x} size {:<2} {:02x?}",
            offset,
            tag,
            size,
            &bytes[offset..offset + HEADER_LEN + payload]
        );
        offset += HEADER_LEN + payload;
    }
    println!();

    // Damaged buffers
    let truncated = &bytes[..bytes.len() - 1];
    println!("Truncated:  {}", from_bytes(truncated).unwrap_err());

    let mut trailing = bytes.clone();
    trailing.push(0);
    println!("Trailing:   {}", from_bytes(&trailing).unwrap_err());

    let mut vector = bytes.clone();
    vector[3] = 0x20;
    println!("Vector tag: {}", from_bytes(&vector).unwrap_err());

    Ok(())
}
