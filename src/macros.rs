/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Object keys are string literals; a value may be prefixed with a flag name
/// (`resource: "a.vmdl"`), in parentheses when it sits inside an object or array.
///
/// ```rust
/// use keyvalues3::{kv3, Flag};
///
/// let value = kv3!({
///     "name": "Alice",
///     "model": (resource: "models/alice.vmdl"),
///     "scores": [1, 2, 3]
/// });
/// assert_eq!(value["scores"][2], 3);
/// assert!(value["model"].has_flag(&Flag::Resource));
/// ```
#[macro_export]
macro_rules! kv3 {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::kv3!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::KvMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::KvMap::new();
        $(
            object.insert($key.to_string(), $crate::kv3!($value));
        )*
        $crate::Value::Object(object)
    }};

    // flag: value
    ($flag:ident : $($value:tt)+) => {
        $crate::Value::from($crate::kv3!($($value)+))
            .with_flag($crate::Flag::from_name(stringify!($flag)))
    };

    (( $($inner:tt)+ )) => {
        $crate::kv3!($($inner)+)
    };

    ($s:expr) => {
        $crate::Value::from($s)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Flag, KvMap, Value};

    #[test]
    fn test_kv3_macro_primitives() {
        assert_eq!(kv3!(null), Value::Null);
        assert_eq!(kv3!(true), Value::Bool(true));
        assert_eq!(kv3!(false), Value::Bool(false));
        assert!(kv3!(42).deep_eq(&Value::Int64(42)));
        assert!(kv3!(3.5).deep_eq(&Value::Double(3.5)));
        assert_eq!(kv3!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_kv3_macro_arrays() {
        assert_eq!(kv3!([]), Value::Array(vec![]));

        let arr = kv3!([1, 2, 3]);
        match arr {
            Value::Array(vec) => {
                assert_eq!(vec.len(), 3);
                assert_eq!(vec[0], Value::Int64(1));
                assert_eq!(vec[2], Value::Int64(3));
            }
            _ => panic!("Expected array"),
        }
    }

    #[test]
    fn test_kv3_macro_objects() {
        assert_eq!(kv3!({}), Value::Object(KvMap::new()));

        let obj = kv3!({
            "name": "Alice",
            "age": 30
        });

        match obj {
            Value::Object(map) => {
                assert_eq!(map.len(), 2);
                assert_eq!(map.get("name"), Some(&Value::String("Alice".to_string())));
                assert_eq!(map.get("age"), Some(&Value::Int64(30)));
            }
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn test_kv3_macro_flags() {
        let value = kv3!(subclass: "npc_guard");
        assert!(value.has_flag(&Flag::SubClass));
        assert_eq!(value, "npc_guard");

        let nested = kv3!({ "list": [(resource: "a"), "b"] });
        assert!(nested["list"][0].has_flag(&Flag::Resource));
        assert!(!nested["list"][1].is_flagged());
    }

    #[test]
    fn test_kv3_macro_expressions() {
        let name = String::from("dynamic");
        assert_eq!(kv3!(name), Value::from("dynamic"));
        assert!(kv3!((1 + 2)).deep_eq(&Value::Int64(3)));
    }
}
