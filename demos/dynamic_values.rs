//! Inspecting and editing a value tree without a fixed schema.
//!
//! Run with: cargo run --example dynamic_values

use keyvalues3::{from_str, to_string, Flag, Value};
use std::error::Error;

const INPUT: &str = r#"{
	// spawn groups for the courtyard
	spawns =
	[
		{ class = subclass:"npc_guard" count = 3 },
		{ class = subclass:"npc_dog" count = 1 },
	]
	ambient = soundevent:"Courtyard.Wind"
	seed = #[de ad be ef]
}"#;

fn main() -> Result<(), Box<dyn Error>> {
    let mut doc = from_str(INPUT)?;

    if let Some(spawns) = doc.value["spawns"].as_array() {
        for spawn in spawns {
            println!(
                "{} x{} ({})",
                spawn["class"].as_str().unwrap_or("?"),
                spawn["count"].as_i64().unwrap_or(0),
                spawn["class"].flags()
            );
        }
    }
    println!("Seed: {} bytes", doc.value["seed"].as_bytes().map_or(0, <[u8]>::len));
    println!("Comments on spawns: {:?}", doc.value.as_object().map(|o| o.comments("spawns")));

    let root = doc.value.as_object_mut().ok_or("root is not an object")?;
    root.insert("difficulty".to_string(), Value::from(2));
    root.insert(
        "music".to_string(),
        Value::from("Courtyard.Theme").with_flag(Flag::SoundEvent),
    );
    root.remove("seed");

    match root.try_get("seed") {
        Ok(_) => println!("seed still present"),
        Err(e) => println!("Expected miss: {}", e),
    }

    println!("\nEdited document:\n{}", to_string(&doc)?);

    Ok(())
}
