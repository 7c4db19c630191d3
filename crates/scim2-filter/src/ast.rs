//! Abstract syntax tree for SCIM filter expressions.

use serde_json::Value;

/// Comparison operator of an attribute expression (RFC 7644 §3.4.2.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Contains.
    Co,
    /// Starts with.
    Sw,
    /// Ends with.
    Ew,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Ne => "ne",
            CompareOp::Co => "co",
            CompareOp::Sw => "sw",
            CompareOp::Ew => "ew",
            CompareOp::Gt => "gt",
            CompareOp::Ge => "ge",
            CompareOp::Lt => "lt",
            CompareOp::Le => "le",
        }
    }

    /// Operator keywords are case-insensitive (`eq`, `EQ`, `eQ` …).
    pub(crate) fn from_ident(ident: &str) -> Option<Self> {
        match ident.to_ascii_lowercase().as_str() {
            "eq" => Some(CompareOp::Eq),
            "ne" => Some(CompareOp::Ne),
            "co" => Some(CompareOp::Co),
            "sw" => Some(CompareOp::Sw),
            "ew" => Some(CompareOp::Ew),
            "gt" => Some(CompareOp::Gt),
            "ge" => Some(CompareOp::Ge),
            "lt" => Some(CompareOp::Lt),
            "le" => Some(CompareOp::Le),
            _ => None,
        }
    }
}

/// An attribute reference inside a filter: an optional schema URN prefix,
/// the attribute name, and an optional sub-attribute.
///
/// # Example
///
/// ```
/// use scim2_filter::AttrPath;
///
/// let p = AttrPath::parse("name.givenName");
/// assert_eq!(p.attribute, "name");
/// assert_eq!(p.sub_attribute.as_deref(), Some("givenName"));
/// assert!(p.urn.is_none());
///
/// let q = AttrPath::parse("urn:ietf:params:scim:schemas:core:2.0:User:userName");
/// assert_eq!(q.urn.as_deref(), Some("urn:ietf:params:scim:schemas:core:2.0:User"));
/// assert_eq!(q.attribute, "userName");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrPath {
    pub urn: Option<String>,
    pub attribute: String,
    pub sub_attribute: Option<String>,
}

impl AttrPath {
    /// Split a raw attribute token into URN prefix, attribute and
    /// sub-attribute. The URN, when present, ends at the last `:`.
    pub fn parse(token: &str) -> Self {
        let (urn, rest) = match token.rfind(':') {
            Some(i) => (Some(token[..i].to_string()), &token[i + 1..]),
            None => (None, token),
        };
        let (attribute, sub_attribute) = match rest.find('.') {
            Some(i) => (rest[..i].to_string(), Some(rest[i + 1..].to_string())),
            None => (rest.to_string(), None),
        };
        AttrPath {
            urn,
            attribute,
            sub_attribute,
        }
    }
}

/// A parsed, immutable filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `attrPath op literal`, e.g. `type eq "work"`.
    Compare {
        path: AttrPath,
        op: CompareOp,
        value: Value,
    },
    /// `attrPath pr` - attribute is present (non-null, non-empty).
    Present(AttrPath),
    And(Box<Filter>, Box<Filter>),
    Or(Box<Filter>, Box<Filter>),
    Not(Box<Filter>),
}
