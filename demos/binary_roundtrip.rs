//! Converting text KV3 to LZ4-compressed binary and back.
//!
//! Run with: cargo run --example binary_roundtrip

use keyvalues3::{from_slice, from_str, to_vec, Encoding, WriteOptions};
use std::error::Error;

const INPUT: &str = r#"{
	default =
	{
		reaction_time = 0.12
		model = resource:"models/npc/guard.vmdl"
		patrol = [ "gate", "tower", "gate", "tower", "yard" ]
	}
}"#;

fn main() -> Result<(), Box<dyn Error>> {
    let doc = from_str(INPUT)?;

    for encoding in [Encoding::BINARY_UNCOMPRESSED, Encoding::BINARY_LZ4] {
        let bytes = to_vec(&doc, &WriteOptions::new().with_encoding(encoding.clone()))?;
        println!("{:>10}: {} bytes", encoding.name, bytes.len());

        let back = from_slice(&bytes)?;
        assert_eq!(back.original_encoding, Some(encoding));
        assert!(back.value.deep_eq(&doc.value));
    }

    let bytes = to_vec(&doc, &WriteOptions::new().with_encoding(Encoding::BINARY_LZ4))?;
    let back = from_slice(&bytes)?;
    println!(
        "reaction_time after the round trip: {}",
        back.value["default"]["reaction_time"]
    );

    // Writing text again uses the binary document's format with a header
    let text = to_vec(&back, &WriteOptions::new().with_encoding(Encoding::TEXT))?;
    println!("\n{}", String::from_utf8(text)?);
    println!("✓ Round-trip successful");

    Ok(())
}
