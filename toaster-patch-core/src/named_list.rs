use crate::error::NamedListError;
use crate::list_literal::{parse_string_list, requirement_name, serialize_string_list};
use regex::Regex;

/// Result of [`rewrite_named_list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRewrite {
    pub text: String,
    pub elements: Vec<String>,
    pub removed: Vec<String>,
    pub added: Vec<String>,
    /// Allowlist entries that were already present.
    pub already_present: Vec<String>,
}

/// Rewrite the list assigned to `variable` inside `text`.
///
/// `locator` must match the whole assignment; its first capture group (or the
/// whole match when it has none) is the bracketed list literal. Elements whose
/// package name is in `denylist` are dropped, `allowlist` entries missing from
/// the original list are appended, and the match is replaced by
/// `{variable} = [...]`.
pub fn rewrite_named_list<D, A>(
    text: &str,
    locator: &Regex,
    denylist: &[D],
    allowlist: &[A],
    variable: &str,
) -> Result<ListRewrite, NamedListError>
where
    D: AsRef<str>,
    A: AsRef<str>,
{
    let captures = locator
        .captures(text)
        .ok_or_else(|| NamedListError::LocatorNotMatched {
            variable: variable.to_string(),
        })?;
    let Some(assignment) = captures.get(0) else {
        return Err(NamedListError::LocatorNotMatched {
            variable: variable.to_string(),
        });
    };
    let literal = captures.get(1).unwrap_or(assignment);

    let original = parse_string_list(literal.as_str())?;

    let (mut elements, removed): (Vec<String>, Vec<String>) =
        original.iter().cloned().partition(|element| {
            let name = requirement_name(element);
            !denylist.iter().any(|denied| denied.as_ref() == name)
        });

    let mut added = Vec::new();
    let mut already_present = Vec::new();
    for candidate in allowlist.iter().map(AsRef::as_ref) {
        if original.iter().any(|element| element == candidate) {
            already_present.push(candidate.to_string());
        } else {
            elements.push(candidate.to_string());
            added.push(candidate.to_string());
        }
    }

    let replacement = format!("{variable} = {}", serialize_string_list(&elements));
    let mut rewritten = String::with_capacity(text.len() + replacement.len());
    rewritten.push_str(&text[..assignment.start()]);
    rewritten.push_str(&replacement);
    rewritten.push_str(&text[assignment.end()..]);

    Ok(ListRewrite {
        text: rewritten,
        elements,
        removed,
        added,
        already_present,
    })
}
