//! Using the edn! macro for dynamic value construction.
//!
//! Run with: cargo run --example macro

use serde_ednb::{edn, parse, EdnMap, Value};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let text = edn!("Hello, EDN!");
    let empty = edn!({});

    println!("Basics:");
    println!("  string: {}", text);
    println!("  map:    {}\n", empty);

    let region = "eu-north";
    let config = edn!({
        "service": { "name": "api", "port": "8080" },
        "region": region,
        { "shard": "1" }: "primary",
    });

    println!("Nested:");
    println!("  {}\n", config);

    // Same value as the parsed text, regardless of entry order
    let parsed = parse(
        r#"{{"shard" "1"} "primary" "region" "eu-north" "service" {"port" "8080" "name" "api"}}"#,
    )?;
    assert_eq!(config, parsed);
    println!("✓ Matches parsed text");

    // Values built by hand
    let mut map = EdnMap::new();
    map.insert(Value::from("built"), Value::from("by hand"));
    let wrapped = edn!({ "inner": map });
    println!("  {}", wrapped);

    Ok(())
}
