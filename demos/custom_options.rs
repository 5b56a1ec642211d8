//! Tuning the parser with ParseOptions, and watching it with tracing.
//!
//! Run with: cargo run --example custom_options

use serde_ednb::{
    from_bytes_with_options, parse, parse_with_options, to_bytes, to_bytes_with_options, KeyCheck,
    ParseOptions, Parser,
};
use std::error::Error;

fn nested(depth: usize) -> String {
    let mut text = String::from("\"leaf\"");
    for i in 0..depth {
        text = format!("{{\"level{}\" {}}}", i, text);
    }
    text
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_target(false)
        .init();

    // Default depth limit is 10
    let deep = nested(12);
    println!("Default options:");
    println!("  {}\n", parse(&deep).unwrap_err());

    println!("max_depth = 16:");
    let options = ParseOptions::new().with_max_depth(16);
    let value = parse_with_options(&deep, options.clone())?;
    println!("  parsed {} top-level entry", value.size());

    // Encoding uses the same limit, so deep trees need the options on both sides
    println!("  to_bytes: {}", to_bytes(&value).unwrap_err());
    let bytes = to_bytes_with_options(&value, &options)?;
    let back = from_bytes_with_options(&bytes, options)?;
    assert_eq!(back, value);
    println!("  round trip with options: {} bytes\n", bytes.len());

    // Duplicate detection strategies report different pairs
    let text = r#"{"a" "1" "b" "2" "b" "3" "a" "4"}"#;
    println!("Pairwise key check:");
    println!("  {}", parse(text).unwrap_err());
    println!("Hashed key check:");
    let options = ParseOptions::new().with_key_check(KeyCheck::Hashed);
    println!("  {}\n", parse_with_options(text, options).unwrap_err());

    // Entry hook
    println!("Entry paths:");
    Parser::new(r#"{"db" {"host" "localhost" "port" "5432"}}"#)
        .on_entry(|path| {
            let keys: Vec<String> = path.iter().map(|k| k.to_string()).collect();
            println!("  {}", keys.join(" > "));
        })
        .parse()?;

    Ok(())
}
