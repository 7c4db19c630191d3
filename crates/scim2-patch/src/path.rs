//! Attribute path classification and splitting.
//!
//! A PATCH path is either *plain* (`name.givenName`, possibly prefixed by an
//! extension URN) or *filtered* (`emails[type eq "work"]`, optionally
//! followed by `.subAttribute`).

use crate::error::PatchError;

/// Outcome of classifying a raw path string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathKind {
    /// A dotted path with no value-selection filter.
    Plain,
    /// A bracket-filtered path.
    Filtered(FilteredPath),
}

/// The three pieces of a bracket-filtered path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredPath {
    /// Attribute name before the opening bracket.
    pub attribute: String,
    /// Filter text strictly between the brackets.
    pub filter: String,
    /// Sub-attribute after `].`, when present.
    pub sub_attribute: Option<String>,
}

/// Bare attribute identifier: letters, digits or `_`, starting with a letter.
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Decide whether `path` is plain or bracket-filtered.
///
/// The text before the first `[` must be a bare identifier for the bracket
/// to open a filter; otherwise the whole path is plain. The *last* `]` in
/// the path closes the filter, so brackets embedded in quoted filter values
/// are tolerated. The closing bracket must either end the path or be
/// followed by `.` and a letter (the sub-attribute); anything else is an
/// invalid path.
///
/// # Example
///
/// ```
/// use scim2_patch::path::{classify, FilteredPath, PathKind};
///
/// assert_eq!(classify("name.givenName").unwrap(), PathKind::Plain);
///
/// let kind = classify("ims[value eq \"hi\"].primary").unwrap();
/// assert_eq!(
///     kind,
///     PathKind::Filtered(FilteredPath {
///         attribute: "ims".to_string(),
///         filter: "value eq \"hi\"".to_string(),
///         sub_attribute: Some("primary".to_string()),
///     })
/// );
/// ```
pub fn classify(path: &str) -> Result<PathKind, PatchError> {
    let Some(lbracket) = path.find('[') else {
        return Ok(PathKind::Plain);
    };
    if !is_identifier(&path[..lbracket]) {
        return Ok(PathKind::Plain);
    }

    let rbracket = path
        .rfind(']')
        .ok_or_else(|| PatchError::InvalidPath(path.to_string()))?;
    if rbracket <= lbracket {
        return Err(PatchError::InvalidPath(path.to_string()));
    }

    let tail = &path[rbracket + 1..];
    let sub_attribute = if tail.is_empty() {
        None
    } else {
        let sub = tail
            .strip_prefix('.')
            .filter(|s| s.chars().next().is_some_and(|c| c.is_alphabetic()))
            .ok_or_else(|| PatchError::InvalidPath(path.to_string()))?;
        Some(sub.to_string())
    };

    Ok(PathKind::Filtered(FilteredPath {
        attribute: path[..lbracket].to_string(),
        filter: path[lbracket + 1..rbracket].to_string(),
        sub_attribute,
    }))
}

/// Split a plain dotted path into segments.
///
/// A leading extension URN (matched case-insensitively against
/// `extension_urns`) is kept as one opaque first segment; its `.` or `:`
/// separator is dropped and the remainder splits on `.`.
pub fn split_path(path: &str, extension_urns: &[String]) -> Vec<String> {
    for urn in extension_urns {
        // The prefix only counts as a namespace when a separator follows;
        // a path that merely begins with the URN's text stays dotted.
        if path.len() > urn.len()
            && path[..urn.len()].eq_ignore_ascii_case(urn)
            && matches!(path.as_bytes()[urn.len()], b'.' | b':')
        {
            let rest = &path[urn.len() + 1..];
            let mut segments = vec![path[..urn.len()].to_string()];
            if !rest.is_empty() {
                segments.extend(rest.split('.').map(str::to_string));
            }
            return segments;
        }
        if path.eq_ignore_ascii_case(urn) {
            return vec![path.to_string()];
        }
    }
    path.split('.').map(str::to_string).collect()
}

// ── Tests ──────────────────────────────────────────────────────────────────
