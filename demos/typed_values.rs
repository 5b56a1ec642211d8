//! Converting between EDN values and Rust types with serde.
//!
//! Run with: cargo run --example typed_values

use serde::{Deserialize, Serialize};
use serde_ednb::{from_bytes, from_str, from_value, to_bytes, to_value};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Deployment {
    service: String,
    image: String,
    strategy: Strategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    owner: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
enum Strategy {
    Recreate,
    Canary { weight: String },
}

fn main() -> Result<(), Box<dyn Error>> {
    let deployment = Deployment {
        service: "checkout".to_string(),
        image: "registry.local/checkout:1.4".to_string(),
        strategy: Strategy::Canary {
            weight: "10".to_string(),
        },
        owner: None,
    };

    let value = to_value(&deployment)?;
    println!("As EDN: {}\n", value);

    let bytes = to_bytes(&value)?;
    let back: Deployment = from_value(from_bytes(&bytes)?)?;
    assert_eq!(back, deployment);
    println!("✓ Binary round-trip successful");

    let text = r#"{"service" "search" "image" "search:2.0" "strategy" "Recreate" "owner" "team-a"}"#;
    let parsed: Deployment = from_str(text)?;
    println!("From text: {:?}\n", parsed);

    // Numbers have no EDN form in this subset
    match to_value(&42u32) {
        Ok(_) => unreachable!(),
        Err(e) => println!("Unsupported: {}", e),
    }

    Ok(())
}
