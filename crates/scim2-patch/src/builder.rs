//! Generic map builder.
//!
//! Turns a `(path, value)` pair from a PATCH operation into the nested
//! generic mapping a resource of that shape would serialize to, consulting
//! attribute metadata to decide where an intermediate level must be wrapped
//! as a single-element list (multi-valued complex attribute).
//!
//! A fresh map is allocated at every nesting level - sibling branches never
//! alias a shared instance.

use serde_json::{Map, Value};

use crate::error::PatchError;
use crate::path::split_path;
use crate::schema::ResourceSchema;

/// Build the nested generic map for `value` stored at `path`.
///
/// A mapping value is used directly as the innermost content, with the full
/// path (possibly empty) as the nesting prefix. A scalar or list value
/// requires a non-empty path; its last segment becomes the key of a
/// single-entry innermost map and the remaining prefix drives the nesting.
///
/// Every non-empty path must name a schema-declared attribute, and a
/// whole-resource mapping may only carry declared attributes or extension
/// URNs (`UnrecognizedAttribute` otherwise).
///
/// # Example
///
/// ```
/// use scim2_patch::builder::build_generic_map;
/// use scim2_patch::schema::user_schema;
/// use serde_json::json;
///
/// let map = build_generic_map("name.givenName", &json!("Jo"), user_schema()).unwrap();
/// assert_eq!(serde_json::Value::Object(map), json!({"name": {"givenName": "Jo"}}));
///
/// // emails is multi-valued complex: the content is wrapped in a list
/// let map = build_generic_map("emails.value", &json!("a@b.co"), user_schema()).unwrap();
/// assert_eq!(
///     serde_json::Value::Object(map),
///     json!({"emails": [{"value": "a@b.co"}]})
/// );
/// ```
pub fn build_generic_map(
    path: &str,
    value: &Value,
    schema: &ResourceSchema,
) -> Result<Map<String, Value>, PatchError> {
    let extension_urns = schema.extension_urns();

    let (mut map, prefix) = match value {
        Value::Object(inner) => {
            if path.is_empty() {
                // Whole-resource values may only carry schema-declared
                // attributes or registered extension namespaces; anything
                // else would be absorbed by the resource's flattened
                // extension map instead of failing.
                for key in inner.keys() {
                    if schema.attribute(key).is_none() {
                        return Err(PatchError::UnrecognizedAttribute(key.clone()));
                    }
                }
                (inner.clone(), Vec::new())
            } else {
                let segments = split_path(path, &extension_urns);
                if schema.attribute_at(&segments).is_none() {
                    return Err(PatchError::UnrecognizedAttribute(path.to_string()));
                }
                (inner.clone(), segments)
            }
        }
        scalar_or_list => {
            if path.is_empty() {
                return Err(PatchError::ValueNotParseable);
            }
            let mut segments = split_path(path, &extension_urns);
            if schema.attribute_at(&segments).is_none() {
                return Err(PatchError::UnrecognizedAttribute(path.to_string()));
            }
            let last = segments.pop().expect("split of non-empty path");
            let mut innermost = Map::new();
            innermost.insert(last, scalar_or_list.clone());
            (innermost, segments)
        }
    };

    // Visit backwards, wrapping into one-entry maps; a multi-valued complex
    // level turns its content into a single-element list.
    for i in (0..prefix.len()).rev() {
        let multi_valued_complex = schema
            .attribute_at(&prefix[..=i])
            .is_some_and(|meta| meta.is_multivalued_complex());
        let content = if multi_valued_complex {
            Value::Array(vec![Value::Object(map)])
        } else {
            Value::Object(map)
        };
        let mut outer = Map::new();
        outer.insert(prefix[i].clone(), content);
        map = outer;
    }

    Ok(map)
}

// ── Tests ──────────────────────────────────────────────────────────────────
