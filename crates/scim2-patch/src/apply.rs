//! PATCH operation application (RFC 7644 §3.5.2).
//!
//! `apply_patch_operation` is the single entry point: it classifies the
//! operation's path, routes bracket-filtered paths to the value-filter
//! applier, and otherwise stages the patch value as a generic map, converts
//! it into a transient resource, and merges it into the original.
//!
//! One documented deviation from the RFC (§3.5.2.3/4): a filtered patch
//! whose filter matches zero entries is a silent no-op instead of a
//! `noTarget` client error.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::builder::build_generic_map;
use crate::error::PatchError;
use crate::merge::{delete_by_path, merge_add, merge_replace};
use crate::path::{classify, FilteredPath, PathKind};
use crate::resource::{from_generic, to_generic, ScimResource};
use crate::util::{get_ci, insert_ci, remove_ci};

/// The closed set of PATCH operation types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOperationType {
    Add,
    Replace,
    Remove,
}

// The wire form is case-insensitive ("add", "Add", "ADD" are all accepted,
// per RFC 7644 errata).
impl<'de> Deserialize<'de> for PatchOperationType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.to_ascii_lowercase().as_str() {
            "add" => Ok(PatchOperationType::Add),
            "replace" => Ok(PatchOperationType::Replace),
            "remove" => Ok(PatchOperationType::Remove),
            other => Err(serde::de::Error::custom(format!(
                "unknown patch operation type '{other}'"
            ))),
        }
    }
}

/// One PATCH instruction: an operation type, an optional attribute path,
/// and an optional value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOperationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PatchOperation {
    pub fn add(path: impl Into<Option<String>>, value: Value) -> Self {
        PatchOperation {
            op: PatchOperationType::Add,
            path: path.into(),
            value: Some(value),
        }
    }

    pub fn replace(path: impl Into<Option<String>>, value: Value) -> Self {
        PatchOperation {
            op: PatchOperationType::Replace,
            path: path.into(),
            value: Some(value),
        }
    }

    pub fn remove(path: &str) -> Self {
        PatchOperation {
            op: PatchOperationType::Remove,
            path: Some(path.to_string()),
            value: None,
        }
    }
}

/// Apply one PATCH operation to `resource`, returning the patched copy.
///
/// The original resource is never mutated; on error nothing is returned, so
/// the caller observes either a fully applied result or the untouched
/// original.
///
/// # Example
///
/// ```
/// use scim2_patch::{apply_patch_operation, PatchOperation, User};
/// use serde_json::json;
///
/// let user = User::new("jdoe");
/// let op = PatchOperation::replace("displayName".to_string(), json!("Jo Doe"));
/// let patched = apply_patch_operation(&user, &op).unwrap();
/// assert_eq!(patched.display_name.as_deref(), Some("Jo Doe"));
/// ```
pub fn apply_patch_operation<R: ScimResource>(
    resource: &R,
    operation: &PatchOperation,
) -> Result<R, PatchError> {
    let schema = R::schema();
    let op = operation.op;
    let path = operation.path.as_deref().unwrap_or("");

    debug!(?op, path, "applying patch operation");

    // Value-selection filters never apply to add: an add with a bracketed
    // path is treated as plain and lands on the whole attribute.
    if !path.is_empty() && op != PatchOperationType::Add {
        if let PathKind::Filtered(filtered) = classify(path)? {
            return apply_with_value_filter(resource, operation, &filtered);
        }
    }

    let original = to_generic(resource)?;
    let result = match op {
        PatchOperationType::Remove => delete_by_path(&original, path, schema)?,
        PatchOperationType::Add | PatchOperationType::Replace => {
            let value = operation.value.as_ref().ok_or(PatchError::ValueNotParseable)?;
            let generic = build_generic_map(path, value, schema)?;
            debug!(map = ?generic, "staged generic map");
            // Round through the typed resource so mistyped values are
            // rejected before any merge happens.
            let alter: R = from_generic(generic)?;
            let alter = to_generic(&alter)?;
            match op {
                PatchOperationType::Replace => merge_replace(&alter, &original),
                _ => merge_add(&alter, &original),
            }
        }
    };
    from_generic(result)
}

/// Apply an operation whose path carries a value-selection filter, e.g.
/// `emails[type eq "work"].primary`.
fn apply_with_value_filter<R: ScimResource>(
    resource: &R,
    operation: &PatchOperation,
    filtered: &FilteredPath,
) -> Result<R, PatchError> {
    let schema = R::schema();
    let attribute = &filtered.attribute;

    let meta = schema
        .attribute(attribute)
        .ok_or_else(|| PatchError::UnrecognizedAttribute(attribute.clone()))?;
    if !meta.is_multivalued_complex() {
        return Err(PatchError::NotMultivaluedComplex(attribute.clone()));
    }

    let mut resource_map = to_generic(resource)?;
    let mut entries = match get_ci(&resource_map, attribute) {
        Some(Value::Array(list)) => list.clone(),
        _ => {
            info!(attribute = %attribute, "no current values, filtered operation has no effect");
            return Ok(resource.clone());
        }
    };

    let normalized = scim2_filter::preprocess(&filtered.filter, &schema.all_urns());
    let filter = scim2_filter::parse(&normalized)?;

    // Collect matches in descending index order so removals below never
    // invalidate an index that is still pending.
    let mut matching = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        if let Value::Object(entry) = entry {
            if scim2_filter::matches(&filter, entry, attribute) {
                matching.insert(0, index);
            }
        }
    }
    info!(
        count = matching.len(),
        filter = %filtered.filter,
        "entries matching value selection filter"
    );

    for &index in &matching {
        match (operation.op, filtered.sub_attribute.as_deref()) {
            (PatchOperationType::Remove, None) => {
                entries.remove(index);
            }
            (PatchOperationType::Remove, Some(sub)) => {
                if let Value::Object(entry) = &mut entries[index] {
                    remove_ci(entry, sub);
                }
            }
            (_, None) => {
                let value = operation.value.clone().ok_or(PatchError::ValueNotParseable)?;
                entries[index] = value;
            }
            (_, Some(sub)) => {
                let value = operation.value.clone().ok_or(PatchError::ValueNotParseable)?;
                if let Value::Object(entry) = &mut entries[index] {
                    insert_ci(entry, sub, value);
                }
            }
        }
    }

    let updated = if entries.is_empty() {
        Value::Null
    } else {
        Value::Array(entries)
    };
    insert_ci(&mut resource_map, attribute, updated);
    from_generic(resource_map)
}

// ── Tests ──────────────────────────────────────────────────────────────────
