//! Evaluate a parsed filter against one entry of a multi-valued complex
//! attribute.
//!
//! The entry is a generic map (one element of e.g. the `emails` list). Bare
//! attribute names in the filter resolve against the entry's keys
//! case-insensitively; a path whose first segment names the parent attribute
//! itself (`emails.type`) resolves through its sub-attribute. URN prefixes
//! are ignored at match time - they are normalized away beforehand by
//! [`crate::preprocess`].

use serde_json::{Map, Value};

use crate::ast::{AttrPath, CompareOp, Filter};

/// Case-insensitive key lookup, per SCIM attribute-name semantics.
fn get_ci<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v)
}

/// Resolve an attribute path against the entry map.
fn resolve<'a>(
    path: &AttrPath,
    entry: &'a Map<String, Value>,
    parent_attribute: &str,
) -> Option<&'a Value> {
    // `emails[emails.type eq "work"]` and `emails[type eq "work"]` are
    // equivalent: a first segment naming the parent collapses onto the entry.
    if path.attribute.eq_ignore_ascii_case(parent_attribute) {
        return match &path.sub_attribute {
            Some(sub) => get_ci(entry, sub),
            None => None,
        };
    }
    let value = get_ci(entry, &path.attribute)?;
    match &path.sub_attribute {
        Some(sub) => value.as_object().and_then(|m| get_ci(m, sub)),
        None => Some(value),
    }
}

/// Evaluate `filter` against a single entry map.
///
/// # Example
///
/// ```
/// use scim2_filter::{matches, parse};
/// use serde_json::json;
///
/// let filter = parse("type eq \"work\"").unwrap();
/// let entry = json!({"type": "work", "value": "a@b.co"});
/// assert!(matches(&filter, entry.as_object().unwrap(), "emails"));
/// ```
pub fn matches(filter: &Filter, entry: &Map<String, Value>, parent_attribute: &str) -> bool {
    match filter {
        Filter::And(l, r) => {
            matches(l, entry, parent_attribute) && matches(r, entry, parent_attribute)
        }
        Filter::Or(l, r) => {
            matches(l, entry, parent_attribute) || matches(r, entry, parent_attribute)
        }
        Filter::Not(inner) => !matches(inner, entry, parent_attribute),
        Filter::Present(path) => is_present(resolve(path, entry, parent_attribute)),
        Filter::Compare { path, op, value } => {
            compare(resolve(path, entry, parent_attribute), *op, value)
        }
    }
}

fn is_present(target: Option<&Value>) -> bool {
    match target {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
        Some(_) => true,
    }
}

fn compare(target: Option<&Value>, op: CompareOp, literal: &Value) -> bool {
    // `eq null` matches an absent or null attribute.
    if literal.is_null() {
        let absent = matches!(target, None | Some(Value::Null));
        return match op {
            CompareOp::Eq => absent,
            CompareOp::Ne => !absent,
            _ => false,
        };
    }
    let Some(target) = target else { return false };

    match op {
        CompareOp::Eq => values_equal(target, literal),
        CompareOp::Ne => !values_equal(target, literal),
        CompareOp::Co => string_pair(target, literal)
            .is_some_and(|(t, l)| t.to_lowercase().contains(&l.to_lowercase())),
        CompareOp::Sw => string_pair(target, literal)
            .is_some_and(|(t, l)| t.to_lowercase().starts_with(&l.to_lowercase())),
        CompareOp::Ew => string_pair(target, literal)
            .is_some_and(|(t, l)| t.to_lowercase().ends_with(&l.to_lowercase())),
        CompareOp::Gt => ordering(target, literal).is_some_and(|o| o.is_gt()),
        CompareOp::Ge => ordering(target, literal).is_some_and(|o| o.is_ge()),
        CompareOp::Lt => ordering(target, literal).is_some_and(|o| o.is_lt()),
        CompareOp::Le => ordering(target, literal).is_some_and(|o| o.is_le()),
    }
}

/// Equality with SCIM's default `caseExact=false` string semantics.
fn values_equal(target: &Value, literal: &Value) -> bool {
    match (target, literal) {
        (Value::String(t), Value::String(l)) => t.eq_ignore_ascii_case(l),
        (Value::Number(t), Value::Number(l)) => {
            t.as_f64().zip(l.as_f64()).is_some_and(|(a, b)| a == b)
        }
        (t, l) => t == l,
    }
}

fn string_pair<'a>(target: &'a Value, literal: &'a Value) -> Option<(&'a str, &'a str)> {
    match (target, literal) {
        (Value::String(t), Value::String(l)) => Some((t.as_str(), l.as_str())),
        _ => None,
    }
}

fn ordering(target: &Value, literal: &Value) -> Option<std::cmp::Ordering> {
    match (target, literal) {
        (Value::Number(t), Value::Number(l)) => {
            t.as_f64().zip(l.as_f64()).and_then(|(a, b)| a.partial_cmp(&b))
        }
        (Value::String(t), Value::String(l)) => {
            Some(t.to_lowercase().cmp(&l.to_lowercase()))
        }
        _ => None,
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────
