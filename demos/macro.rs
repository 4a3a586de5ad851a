//! Building KV3 values with the kv3! macro.
//!
//! Run with: cargo run --example macro

use keyvalues3::{kv3, to_string, Flag};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let name = "npc_guard";
    let health = 150;

    let value = kv3!({
        "name": name,
        "health": health,
        "model": (resource: "models/npc/guard.vmdl"),
        "class": (subclass: "npc_base"),
        "weapons": ["pistol", "smg"],
        "squad": {
            "leader": false,
            "size": 4
        },
        "target": null
    });

    println!("Built value:\n{}", to_string(&value)?);

    assert_eq!(value["health"], 150);
    assert!(value["model"].has_flag(&Flag::Resource));
    assert!(value["target"].is_null());
    println!("✓ Macro values look right");

    Ok(())
}
