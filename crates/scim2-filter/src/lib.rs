//! SCIM 2.0 filter expressions (RFC 7644 §3.4.2.2).
//!
//! This crate implements the value-selection filter language used inside
//! bracketed PATCH paths such as `emails[type eq "work"]`: an AST, a
//! recursive-descent parser, an entry matcher, and a URN-prefix
//! preprocessor.
//!
//! # Example
//!
//! ```
//! use scim2_filter::{matches, parse};
//! use serde_json::json;
//!
//! let filter = parse("type eq \"work\" and primary eq true").unwrap();
//! let entry = json!({"type": "work", "primary": true, "value": "a@b.co"});
//! assert!(matches(&filter, entry.as_object().unwrap(), "emails"));
//! ```

pub mod ast;
pub mod error;
pub mod matcher;
pub mod parser;
pub mod preprocess;

pub use ast::{AttrPath, CompareOp, Filter};
pub use error::FilterError;
pub use matcher::matches;
pub use parser::parse;
pub use preprocess::preprocess;
