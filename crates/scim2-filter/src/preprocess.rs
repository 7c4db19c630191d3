//! Namespace normalization of filter text.
//!
//! Filters arriving over the wire may qualify attribute names with a schema
//! URN, e.g.
//! `urn:ietf:params:scim:schemas:core:2.0:User:type eq "work"`. The parser
//! and matcher work with bare names, so known URN prefixes (and their `:` or
//! `.` separator) are stripped before parsing. Text inside string literals
//! is left untouched.

/// Strip recognized schema URN prefixes from attribute tokens in `filter`.
///
/// `urns` holds the resource's core schema URN plus its extension URNs.
/// Matching is case-insensitive; longer URNs are tried first so a URN that
/// is a prefix of another cannot shadow it.
///
/// # Example
///
/// ```
/// use scim2_filter::preprocess;
///
/// let urns = vec!["urn:ietf:params:scim:schemas:core:2.0:User".to_string()];
/// let out = preprocess(
///     "urn:ietf:params:scim:schemas:core:2.0:User:type eq \"work\"",
///     &urns,
/// );
/// assert_eq!(out, "type eq \"work\"");
/// ```
pub fn preprocess(filter: &str, urns: &[String]) -> String {
    let mut ordered: Vec<&str> = urns.iter().map(String::as_str).collect();
    ordered.sort_by_key(|u| std::cmp::Reverse(u.len()));

    let mut out = String::with_capacity(filter.len());
    let mut in_string = false;
    let mut iter = filter.char_indices().peekable();

    while let Some((i, c)) = iter.next() {
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some((_, escaped)) = iter.next() {
                    out.push(escaped);
                }
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        if c == '"' {
            in_string = true;
            out.push(c);
            continue;
        }
        if let Some(skip) = urn_prefix_len(&filter[i..], &ordered) {
            while iter.peek().is_some_and(|&(j, _)| j < i + skip) {
                iter.next();
            }
            continue;
        }
        out.push(c);
    }
    out
}

/// Length of a recognized URN prefix (including its separator) at the start
/// of `rest`, or `None`.
fn urn_prefix_len(rest: &str, urns: &[&str]) -> Option<usize> {
    for urn in urns {
        if rest.len() > urn.len()
            && rest[..urn.len()].eq_ignore_ascii_case(urn)
            && matches!(rest.as_bytes()[urn.len()], b':' | b'.')
        {
            return Some(urn.len() + 1);
        }
    }
    None
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const USER_URN: &str = "urn:ietf:params:scim:schemas:core:2.0:User";
    const ENTERPRISE_URN: &str =
        "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";

    fn urns() -> Vec<String> {
        vec![USER_URN.to_string(), ENTERPRISE_URN.to_string()]
    }

    #[test]
    fn strips_core_urn_prefix() {
        let out = preprocess(&format!("{USER_URN}:type eq \"work\""), &urns());
        assert_eq!(out, "type eq \"work\"");
    }

    #[test]
    fn strips_dotted_urn_prefix() {
        let out = preprocess(&format!("{ENTERPRISE_URN}.department eq \"IT\""), &urns());
        assert_eq!(out, "department eq \"IT\"");
    }

    #[test]
    fn leaves_bare_names_alone() {
        assert_eq!(preprocess("type eq \"work\"", &urns()), "type eq \"work\"");
    }

    #[test]
    fn urn_matching_is_case_insensitive() {
        let upper = USER_URN.to_uppercase();
        let out = preprocess(&format!("{upper}:type pr"), &urns());
        assert_eq!(out, "type pr");
    }

    #[test]
    fn string_literals_are_untouched() {
        let text = format!("value eq \"{USER_URN}:type\"");
        assert_eq!(preprocess(&text, &urns()), text);
    }

    #[test]
    fn handles_multiple_occurrences() {
        let out = preprocess(
            &format!("{USER_URN}:type eq \"work\" or {USER_URN}:primary eq true"),
            &urns(),
        );
        assert_eq!(out, "type eq \"work\" or primary eq true");
    }
}
