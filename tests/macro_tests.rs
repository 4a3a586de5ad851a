use keyvalues3::{kv3, Flag, KvMap, Value};

#[test]
fn test_kv3_macro_null() {
    let value = kv3!(null);
    assert_eq!(value, Value::Null);
}

#[test]
fn test_kv3_macro_booleans() {
    assert_eq!(kv3!(true), Value::Bool(true));
    assert_eq!(kv3!(false), Value::Bool(false));
}

#[test]
fn test_kv3_macro_numbers() {
    assert!(kv3!(42).deep_eq(&Value::Int64(42)));
    assert!(kv3!(-123).deep_eq(&Value::Int64(-123)));
    assert!(kv3!(3.5).deep_eq(&Value::Double(3.5)));
    assert!(kv3!(u64::MAX).deep_eq(&Value::UInt64(u64::MAX)));
}

#[test]
fn test_kv3_macro_strings() {
    assert_eq!(kv3!("hello"), Value::String("hello".to_string()));
}

#[test]
fn test_kv3_macro_blob() {
    assert_eq!(kv3!(vec![1u8, 2, 3]), Value::Blob(vec![1, 2, 3]));
}

#[test]
fn test_kv3_macro_arrays() {
    assert_eq!(kv3!([]), Value::Array(vec![]));

    let arr = kv3!([1, "two", null, [true]]);
    let items = arr.as_array().unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(items[1], "two");
    assert!(items[2].is_null());
    assert_eq!(items[3][0], true);
}

#[test]
fn test_kv3_macro_objects() {
    assert_eq!(kv3!({}), Value::Object(KvMap::new()));

    let obj = kv3!({
        "name": "Alice",
        "age": 30,
        "address": {
            "city": "Bellevue"
        }
    });

    let map = obj.as_object().unwrap();
    let keys: Vec<_> = map.keys().cloned().collect();
    assert_eq!(keys, vec!["name", "age", "address"]);
    assert_eq!(obj["address"]["city"], "Bellevue");
}

#[test]
fn test_kv3_macro_trailing_commas() {
    let arr = kv3!([1, 2,]);
    assert_eq!(arr.as_array().map(Vec::len), Some(2));

    let obj = kv3!({ "a": 1, });
    assert_eq!(obj.as_object().map(KvMap::len), Some(1));
}

#[test]
fn test_kv3_macro_flags() {
    let model = kv3!(resource: "models/a.vmdl");
    assert!(model.has_flag(&Flag::Resource));
    assert_eq!(model, "models/a.vmdl");

    let obj = kv3!({
        "sound": (soundevent: "Weapon.Fire"),
        "layout": (panorama: "file://{resources}/hud.xml"),
        "custom": (vmap_only: 1)
    });
    assert!(obj["sound"].has_flag(&Flag::SoundEvent));
    assert!(obj["layout"].has_flag(&Flag::Panorama));
    assert!(obj["custom"].has_flag(&Flag::Other("vmap_only".to_string())));
}

#[test]
fn test_kv3_macro_variables() {
    let name = "Bob";
    let age = 25;
    let value = kv3!({ "name": name, "age": age });
    assert_eq!(value["name"], "Bob");
    assert_eq!(value["age"], 25);
}
