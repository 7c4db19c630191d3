//! SCIM 2.0 PATCH engine (RFC 7644 §3.5.2).
//!
//! Applies a single PATCH operation (add / replace / remove) to a typed
//! identity resource: attribute-path parsing (including bracketed
//! value-selection filters and extension-URN prefixes), metadata-driven
//! staging of patch values as nested generic maps, merge/delete semantics,
//! and reassembly of the typed resource.
//!
//! The engine is synchronous, stateless and reentrant: all working data is
//! local to one [`apply_patch_operation`] call, and a half-applied resource
//! is never observable.
//!
//! # Example
//!
//! ```
//! use scim2_patch::{apply_patch_operation, PatchOperation, User};
//! use serde_json::json;
//!
//! let user = User::new("jdoe");
//!
//! // Stage a work email, then flip its primary flag via a value filter.
//! let add = PatchOperation::add(
//!     "emails".to_string(),
//!     json!([{"value": "jo@example.com", "type": "work"}]),
//! );
//! let user = apply_patch_operation(&user, &add).unwrap();
//!
//! let flag = PatchOperation::replace(
//!     "emails[type eq \"work\"].primary".to_string(),
//!     json!(true),
//! );
//! let user = apply_patch_operation(&user, &flag).unwrap();
//! assert_eq!(user.emails.as_ref().unwrap()[0].primary, Some(true));
//! ```

pub mod apply;
pub mod builder;
pub mod error;
pub mod merge;
pub mod path;
pub mod resource;
pub mod schema;
mod util;

pub use apply::{apply_patch_operation, PatchOperation, PatchOperationType};
pub use builder::build_generic_map;
pub use error::PatchError;
pub use merge::{delete_by_path, merge_add, merge_replace};
pub use path::{classify, split_path, FilteredPath, PathKind};
pub use resource::{
    from_generic, to_generic, Address, Meta, MultiValuedAttribute, Name, ScimResource, User,
};
pub use schema::{
    user_schema, AttributeMetadata, AttributeType, Extension, ResourceSchema,
    ENTERPRISE_USER_SCHEMA_URN, USER_SCHEMA_URN,
};
