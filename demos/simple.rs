//! Reading a KV3 text document and writing it back.
//!
//! Run with: cargo run --example simple

use keyvalues3::{from_str, to_string};
use std::error::Error;

const INPUT: &str = r#"<!-- kv3 encoding:text:version{e21c7f3c-8a33-41c5-9977-a76d3a32aa0d} format:generic:version{7412167c-06e9-4698-aff2-e63eb59037e7} -->
{
	name = "Alice Johnson"
	id = 42
	email = "alice@example.com"
}
"#;

fn main() -> Result<(), Box<dyn Error>> {
    let doc = from_str(INPUT)?;
    println!("Encoding: {:?}", doc.original_encoding.as_ref().map(|e| &e.name));
    println!("Format:   {}", doc.format.name);
    println!("Name:     {}", doc.value["name"]);

    // Write back in the encoding it was read from
    let text = to_string(&doc)?;
    println!("\nKV3 output:\n{}", text);

    let doc_back = from_str(&text)?;
    assert_eq!(doc, doc_back);
    println!("✓ Round-trip successful");

    Ok(())
}
