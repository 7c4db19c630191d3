//! Case-insensitive helpers over generic maps.
//!
//! SCIM attribute names are case-insensitive; generic maps keep whatever
//! casing the resource serialized with, so all key access goes through
//! these helpers. Writes reuse the existing key's casing when one matches.

use serde_json::{Map, Value};

pub(crate) fn find_key<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.keys()
        .find(|k| k.eq_ignore_ascii_case(key))
        .map(String::as_str)
}

pub(crate) fn get_ci<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    let k = find_key(map, key)?;
    map.get(k)
}

pub(crate) fn insert_ci(map: &mut Map<String, Value>, key: &str, value: Value) {
    match find_key(map, key).map(str::to_string) {
        Some(existing) => {
            map.insert(existing, value);
        }
        None => {
            map.insert(key.to_string(), value);
        }
    }
}

pub(crate) fn remove_ci(map: &mut Map<String, Value>, key: &str) -> Option<Value> {
    let k = find_key(map, key)?.to_string();
    map.remove(&k)
}
