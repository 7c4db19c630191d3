use thiserror::Error;

/// The single error type raised by the patch engine.
///
/// Every failure kind surfaces synchronously through this enum; nothing is
/// retried internally. A zero-match filtered patch is deliberately *not* an
/// error (see [`crate::apply`]).
#[derive(Debug, Error)]
pub enum PatchError {
    /// Malformed bracket syntax in a value-selection path, or a remove
    /// operation without a target.
    #[error("invalid path '{0}'")]
    InvalidPath(String),

    /// A filtered path targets an attribute the schema does not declare.
    #[error("attribute '{0}' not recognized")]
    UnrecognizedAttribute(String),

    /// A filtered path targets an attribute that is not declared
    /// complex and multi-valued.
    #[error("attribute '{0}' expected to be complex multi-valued")]
    NotMultivaluedComplex(String),

    /// A scalar or list value was supplied without a path to anchor it.
    #[error("value(s) supplied for resource not parseable")]
    ValueNotParseable,

    /// The value-selection filter text failed to parse.
    #[error("invalid value selection filter: {0}")]
    FilterSyntax(#[from] scim2_filter::FilterError),

    /// Generic/typed conversion of the resource failed.
    #[error("resource conversion failed: {0}")]
    Conversion(#[from] serde_json::Error),
}
