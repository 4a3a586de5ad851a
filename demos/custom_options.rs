//! Customizing text output with TextOptions and WriteOptions.
//!
//! Run with: cargo run --example custom_options

use keyvalues3::{from_str, to_vec, Encoding, TextOptions, WriteOptions};
use std::error::Error;

const INPUT: &str = r#"// squad layout
{
	// members in spawn order
	members = [1, 2, 3, 4, 5, 6]
	leader = 1
}"#;

fn main() -> Result<(), Box<dyn Error>> {
    let doc = from_str(INPUT)?;

    // Default: the document was headerless, so it stays headerless
    println!("Default:");
    let default = to_vec(&doc, &WriteOptions::new())?;
    println!("{}", String::from_utf8(default)?);

    // Force a header line
    println!("With header:");
    let header = WriteOptions::new().with_encoding(Encoding::TEXT);
    println!("{}", String::from_utf8(to_vec(&doc, &header)?)?);

    // Keep comments and break arrays longer than 4 items over several lines
    println!("Comments, narrow arrays:");
    let text = TextOptions::new()
        .with_comments(true)
        .with_max_inline_array(4);
    let narrow = WriteOptions::new().with_text(text);
    println!("{}", String::from_utf8(to_vec(&doc, &narrow)?)?);

    // Everything the document came with, comments included
    println!("Original encoding:");
    let original = WriteOptions::new().with_use_original_encoding(true);
    println!("{}", String::from_utf8(to_vec(&doc, &original)?)?);

    Ok(())
}
