//! Merge helpers over generic resource maps.
//!
//! The dispatcher builds a transient resource from the patch value and hands
//! both sides here as generic maps: `merge_replace` carries overwrite
//! semantics, `merge_add` additive semantics (lists append), and
//! `delete_by_path` removes the attribute a plain path names. All three
//! return a fresh map; the inputs are never mutated.

use serde_json::{Map, Value};

use crate::error::PatchError;
use crate::path::split_path;
use crate::schema::ResourceSchema;
use crate::util::{find_key, get_ci, insert_ci, remove_ci};

/// Overwrite-semantics merge: every attribute of `incoming` replaces its
/// counterpart in `original`; nested maps merge recursively, lists and
/// scalars replace wholesale.
pub fn merge_replace(incoming: &Map<String, Value>, original: &Map<String, Value>) -> Map<String, Value> {
    let mut result = original.clone();
    for (key, value) in incoming {
        let merged = match (get_ci(&result, key), value) {
            (Some(Value::Object(existing)), Value::Object(inner)) => {
                Value::Object(merge_replace(inner, existing))
            }
            _ => value.clone(),
        };
        insert_ci(&mut result, key, merged);
    }
    result
}

/// Additive merge: nested maps merge recursively, lists append the incoming
/// entries after the original ones, scalars overwrite.
pub fn merge_add(incoming: &Map<String, Value>, original: &Map<String, Value>) -> Map<String, Value> {
    let mut result = original.clone();
    for (key, value) in incoming {
        let merged = match (get_ci(&result, key), value) {
            (Some(Value::Object(existing)), Value::Object(inner)) => {
                Value::Object(merge_add(inner, existing))
            }
            (Some(Value::Array(existing)), Value::Array(items)) => {
                let mut list = existing.clone();
                list.extend(items.iter().cloned());
                Value::Array(list)
            }
            _ => value.clone(),
        };
        insert_ci(&mut result, key, merged);
    }
    result
}

/// Remove the attribute named by a plain `path` from the resource map.
///
/// The path must name a schema-declared attribute (`UnrecognizedAttribute`
/// otherwise) and must be non-empty (`InvalidPath`). When an intermediate
/// level holds a list of entries, the removal applies to every entry.
/// Removing an attribute that is already absent is a no-op.
pub fn delete_by_path(
    resource: &Map<String, Value>,
    path: &str,
    schema: &ResourceSchema,
) -> Result<Map<String, Value>, PatchError> {
    if path.is_empty() {
        return Err(PatchError::InvalidPath(
            "remove operation requires a path".to_string(),
        ));
    }
    let segments = split_path(path, &schema.extension_urns());
    if schema.attribute_at(&segments).is_none() {
        return Err(PatchError::UnrecognizedAttribute(path.to_string()));
    }
    let mut result = resource.clone();
    remove_segments(&mut result, &segments);
    Ok(result)
}

fn remove_segments(map: &mut Map<String, Value>, segments: &[String]) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };
    if rest.is_empty() {
        remove_ci(map, first);
        return;
    }
    let Some(key) = find_key(map, first).map(str::to_string) else {
        return;
    };
    match map.get_mut(&key) {
        Some(Value::Object(inner)) => remove_segments(inner, rest),
        Some(Value::Array(entries)) => {
            for entry in entries {
                if let Value::Object(inner) = entry {
                    remove_segments(inner, rest);
                }
            }
        }
        _ => {}
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────
