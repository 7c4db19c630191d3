//! Attribute schema registry.
//!
//! A statically built, immutable table mapping dotted attribute paths to
//! their metadata (`simple`/`complex`, single/multi-valued), plus the
//! extension descriptors of a resource type. Built once per process and
//! exposed as pure lookups; the engine never inspects type information
//! directly.

use std::sync::OnceLock;

use indexmap::IndexMap;

/// Schema URN of the SCIM core `User` resource (RFC 7643 §4.1).
pub const USER_SCHEMA_URN: &str = "urn:ietf:params:scim:schemas:core:2.0:User";

/// Schema URN of the enterprise `User` extension (RFC 7643 §4.3).
pub const ENTERPRISE_USER_SCHEMA_URN: &str =
    "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";

/// Data type of an attribute (RFC 7643 §2.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Boolean,
    Decimal,
    Integer,
    DateTime,
    Reference,
    Complex,
}

impl AttributeType {
    pub fn is_complex(&self) -> bool {
        matches!(self, AttributeType::Complex)
    }
}

/// Metadata of one attribute: its type and multiplicity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeMetadata {
    pub kind: AttributeType,
    pub multi_valued: bool,
}

impl AttributeMetadata {
    /// True for attributes whose value is a list of structured entries -
    /// the only attributes a value-selection filter may target.
    pub fn is_multivalued_complex(&self) -> bool {
        self.multi_valued && self.kind.is_complex()
    }
}

/// Descriptor of a schema extension: its URN and attribute names.
#[derive(Debug, Clone)]
pub struct Extension {
    pub urn: String,
    pub attributes: Vec<String>,
}

/// Immutable attribute table of one resource type.
///
/// Keys are full dotted paths (`emails`, `name.givenName`,
/// `<extension-urn>.department`) stored lowercased; lookups are
/// case-insensitive per SCIM attribute-name semantics.
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    urn: String,
    attributes: IndexMap<String, AttributeMetadata>,
    extensions: Vec<Extension>,
}

impl ResourceSchema {
    pub fn new(urn: &str) -> Self {
        ResourceSchema {
            urn: urn.to_string(),
            attributes: IndexMap::new(),
            extensions: Vec::new(),
        }
    }

    /// Core schema URN of the resource type.
    pub fn urn(&self) -> &str {
        &self.urn
    }

    /// Register an attribute under its full dotted path.
    pub fn define(mut self, path: &str, kind: AttributeType, multi_valued: bool) -> Self {
        self.attributes.insert(
            path.to_ascii_lowercase(),
            AttributeMetadata { kind, multi_valued },
        );
        self
    }

    /// Register a multi-valued complex attribute with the canonical
    /// `value`/`display`/`type`/`primary` sub-attributes.
    pub fn define_multi_valued(self, name: &str) -> Self {
        self.define(name, AttributeType::Complex, true)
            .define(&format!("{name}.value"), AttributeType::String, false)
            .define(&format!("{name}.display"), AttributeType::String, false)
            .define(&format!("{name}.type"), AttributeType::String, false)
            .define(&format!("{name}.primary"), AttributeType::Boolean, false)
    }

    /// Register an extension: its attributes become addressable under
    /// `<urn>.<name>` and `<urn>:<name>` paths.
    pub fn define_extension(
        mut self,
        urn: &str,
        attributes: &[(&str, AttributeType, bool)],
    ) -> Self {
        // The URN itself acts as a single-valued complex container.
        self = self.define(urn, AttributeType::Complex, false);
        let mut names = Vec::with_capacity(attributes.len());
        for &(name, kind, multi_valued) in attributes {
            self = self.define(&format!("{urn}.{name}"), kind, multi_valued);
            names.push(name.to_string());
        }
        self.extensions.push(Extension {
            urn: urn.to_string(),
            attributes: names,
        });
        self
    }

    /// Look up attribute metadata by dotted path, case-insensitively.
    pub fn attribute(&self, path: &str) -> Option<AttributeMetadata> {
        self.attributes.get(&path.to_ascii_lowercase()).copied()
    }

    /// Metadata for a split path (segments joined back with `.`).
    pub fn attribute_at(&self, segments: &[String]) -> Option<AttributeMetadata> {
        self.attribute(&segments.join("."))
    }

    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    /// URNs of all registered extensions.
    pub fn extension_urns(&self) -> Vec<String> {
        self.extensions.iter().map(|e| e.urn.clone()).collect()
    }

    /// Core URN plus extension URNs - the namespaces a filter or path may
    /// use as a prefix.
    pub fn all_urns(&self) -> Vec<String> {
        let mut urns = vec![self.urn.clone()];
        urns.extend(self.extension_urns());
        urns
    }
}

/// Schema of the SCIM core `User` resource with the enterprise extension,
/// built once per process.
pub fn user_schema() -> &'static ResourceSchema {
    static SCHEMA: OnceLock<ResourceSchema> = OnceLock::new();
    SCHEMA.get_or_init(build_user_schema)
}

fn build_user_schema() -> ResourceSchema {
    use AttributeType::*;

    ResourceSchema::new(USER_SCHEMA_URN)
        .define("schemas", String, true)
        .define("id", String, false)
        .define("externalId", String, false)
        .define("userName", String, false)
        .define("displayName", String, false)
        .define("nickName", String, false)
        .define("profileUrl", Reference, false)
        .define("title", String, false)
        .define("userType", String, false)
        .define("preferredLanguage", String, false)
        .define("locale", String, false)
        .define("timezone", String, false)
        .define("active", Boolean, false)
        .define("password", String, false)
        .define("name", Complex, false)
        .define("name.formatted", String, false)
        .define("name.familyName", String, false)
        .define("name.givenName", String, false)
        .define("name.middleName", String, false)
        .define("name.honorificPrefix", String, false)
        .define("name.honorificSuffix", String, false)
        .define_multi_valued("emails")
        .define_multi_valued("phoneNumbers")
        .define_multi_valued("ims")
        .define_multi_valued("photos")
        .define_multi_valued("entitlements")
        .define_multi_valued("roles")
        .define_multi_valued("x509Certificates")
        .define_multi_valued("groups")
        .define("groups.$ref", Reference, false)
        .define("addresses", Complex, true)
        .define("addresses.formatted", String, false)
        .define("addresses.streetAddress", String, false)
        .define("addresses.locality", String, false)
        .define("addresses.region", String, false)
        .define("addresses.postalCode", String, false)
        .define("addresses.country", String, false)
        .define("addresses.type", String, false)
        .define("addresses.primary", Boolean, false)
        .define("meta", Complex, false)
        .define("meta.resourceType", String, false)
        .define("meta.created", DateTime, false)
        .define("meta.lastModified", DateTime, false)
        .define("meta.location", Reference, false)
        .define("meta.version", String, false)
        .define_extension(
            ENTERPRISE_USER_SCHEMA_URN,
            &[
                ("employeeNumber", String, false),
                ("costCenter", String, false),
                ("organization", String, false),
                ("division", String, false),
                ("department", String, false),
                ("manager", Complex, false),
            ],
        )
        .define(
            &format!("{ENTERPRISE_USER_SCHEMA_URN}.manager.value"),
            String,
            false,
        )
        .define(
            &format!("{ENTERPRISE_USER_SCHEMA_URN}.manager.displayName"),
            String,
            false,
        )
        .define(
            &format!("{ENTERPRISE_USER_SCHEMA_URN}.manager.$ref"),
            Reference,
            false,
        )
}

// ── Tests ──────────────────────────────────────────────────────────────────
