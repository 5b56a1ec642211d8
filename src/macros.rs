/// Builds a [`Value`](crate::Value) from EDN-like syntax.
///
/// Keys and values are string literals, nested `{...}` maps, or any single
/// token tree that converts with `Value::from` (a `&str`, `String`,
/// `EdnMap` or `Value` variable). A repeated key replaces the earlier value.
///
/// ```rust
/// use serde_ednb::{edn, parse};
///
/// let id = "42";
/// let value = edn!({
///     "user": { "id": id },
///     { "kind": "composite" }: "key",
/// });
/// assert_eq!(
///     value,
///     parse(r#"{"user" {"id" "42"} {"kind" "composite"} "key"}"#).unwrap()
/// );
/// ```
#[macro_export]
macro_rules! edn {
    ({}) => {
        $crate::Value::Map($crate::EdnMap::new())
    };

    ({ $($key:tt : $value:tt),* $(,)? }) => {{
        let mut map = $crate::EdnMap::new();
        $(
            map.insert($crate::edn!($key), $crate::edn!($value));
        )*
        map.rehash(false);
        $crate::Value::Map(map)
    }};

    ($s:expr) => {
        $crate::Value::from($s)
    };
}

#[cfg(test)]
mod tests {
    use crate::{parse, EdnMap, Value};

    #[test]
    fn test_edn_macro_strings() {
        assert_eq!(edn!("hello"), Value::String("hello".to_string()));
        let owned = String::from("owned");
        assert_eq!(edn!(owned), Value::from("owned"));
    }

    #[test]
    fn test_edn_macro_maps() {
        assert_eq!(edn!({}), Value::Map(EdnMap::new()));

        let value = edn!({
            "name": "Alice",
            "address": { "city": "Oslo" }
        });
        match &value {
            Value::Map(map) => {
                assert_eq!(map.len(), 2);
                assert_eq!(map.get_str("name"), Some(&Value::from("Alice")));
                assert!(map.cached_hash().is_some());
            }
            _ => panic!("Expected map"),
        }
        assert_eq!(value.get("address").and_then(|a| a.get("city")), Some(&Value::from("Oslo")));
    }

    #[test]
    fn test_edn_macro_map_keys() {
        let value = edn!({ {"id": "1"}: "first", {}: "empty" });
        assert_eq!(
            value,
            parse(r#"{{"id" "1"} "first" {} "empty"}"#).unwrap()
        );
    }

    #[test]
    fn test_edn_macro_repeated_key() {
        let value = edn!({ "k": "1", "k": "2" });
        assert_eq!(value.size(), 1);
        assert_eq!(value.get("k"), Some(&Value::from("2")));
    }
}
