//! Typed SCIM resources and the generic/typed conversion boundary.
//!
//! A resource is any serde round-trippable type with a static attribute
//! schema. The engine never mutates a typed resource in place: it converts
//! to the generic representation, merges there, and deserializes a fresh
//! resource back out.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PatchError;
use crate::schema::{user_schema, ResourceSchema, USER_SCHEMA_URN};

/// A SCIM resource the patch engine can operate on.
pub trait ScimResource: Serialize + DeserializeOwned + Clone {
    /// The immutable attribute schema of this resource type.
    fn schema() -> &'static ResourceSchema;
}

/// Serialize a resource into its generic map representation.
pub fn to_generic<R: ScimResource>(resource: &R) -> Result<Map<String, Value>, PatchError> {
    match serde_json::to_value(resource)? {
        Value::Object(map) => Ok(map),
        other => Err(PatchError::Conversion(serde::ser::Error::custom(format!(
            "resource serialized to non-object value: {other}"
        )))),
    }
}

/// Deserialize a resource from a generic map, preserving all fields the
/// patch did not touch.
pub fn from_generic<R: ScimResource>(map: Map<String, Value>) -> Result<R, PatchError> {
    Ok(serde_json::from_value(Value::Object(map))?)
}

// ── Core User resource ─────────────────────────────────────────────────────

/// SCIM core `User` (RFC 7643 §4.1).
///
/// Extension namespaces (keys starting with `urn:`) are captured by the
/// flattened `extended` map, so extension attributes survive the
/// generic/typed round trip untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub schemas: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Name>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nick_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<MultiValuedAttribute>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_numbers: Option<Vec<MultiValuedAttribute>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ims: Option<Vec<MultiValuedAttribute>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<MultiValuedAttribute>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<Address>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<MultiValuedAttribute>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entitlements: Option<Vec<MultiValuedAttribute>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<MultiValuedAttribute>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x509_certificates: Option<Vec<MultiValuedAttribute>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// Extension namespaces, keyed by URN.
    #[serde(flatten)]
    pub extended: Map<String, Value>,
}

impl User {
    pub fn new(user_name: &str) -> Self {
        User {
            schemas: vec![USER_SCHEMA_URN.to_string()],
            user_name: Some(user_name.to_string()),
            ..User::default()
        }
    }
}

impl ScimResource for User {
    fn schema() -> &'static ResourceSchema {
        user_schema()
    }
}

/// The `name` complex attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Name {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub honorific_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub honorific_suffix: Option<String>,
}

/// Canonical entry shape of `emails`, `ims`, `phoneNumbers`, etc.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MultiValuedAttribute {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub ref_: Option<String>,
}

/// Entry shape of the `addresses` attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
}

/// The common `meta` complex attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

// ── Tests ──────────────────────────────────────────────────────────────────
