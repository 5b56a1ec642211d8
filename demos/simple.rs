//! Parse EDN text, inspect it, and round-trip it through EDNB.
//!
//! Run with: cargo run --example simple

use serde_ednb::{from_bytes, parse, to_bytes};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let text = r#"{"name" "Alice Johnson"
                  "email" "alice@example.com"
                  "address" {"city" "Oslo" "zip" "0150"}}"#;

    let value = parse(text)?;
    println!("Parsed: {}", value);
    println!("Entries: {}", value.size());

    if let Some(city) = value.get("address").and_then(|a| a.get("city")) {
        println!("City: {}\n", city);
    }

    // Encode to EDNB
    let bytes = to_bytes(&value)?;
    println!("EDNB ({} bytes): {:02x?}\n", bytes.len(), &bytes[..8]);

    // Decode back
    let back = from_bytes(&bytes)?;
    assert_eq!(value, back);
    println!("✓ Round-trip successful");

    Ok(())
}
