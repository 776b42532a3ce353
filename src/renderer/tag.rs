//! Tag specifier parsing.
//!
//! ```text
//! spec      := tagname (classFrag | idFrag)*
//! classFrag := '.' token
//! idFrag    := '#' token
//! ```
//!
//! The first id fragment wins; class fragments accumulate in order.

use crate::error::{FragmentKind, TagParseError};

/// A parsed tag specifier, borrowing from the source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpec<'a> {
    pub tag: &'a str,
    pub id: Option<&'a str>,
    pub classes: Vec<&'a str>,
}

fn is_fragment_start(c: char) -> bool {
    c == '.' || c == '#'
}

fn is_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Split `spec` into tag name, id and classes.
pub fn parse_tag(spec: &str) -> Result<TagSpec<'_>, TagParseError> {
    let name_end = spec.find(is_fragment_start).unwrap_or(spec.len());
    let tag = &spec[..name_end];

    if tag.is_empty() {
        return Err(TagParseError::MissingTagName {
            spec: spec.to_string(),
        });
    }
    if !is_tag_name(tag) {
        return Err(TagParseError::InvalidTagName {
            spec: spec.to_string(),
            name: tag.to_string(),
        });
    }

    let mut parsed = TagSpec {
        tag,
        id: None,
        classes: Vec::new(),
    };

    let mut position = name_end;
    while position < spec.len() {
        let rest = &spec[position + 1..];
        let token_len = rest.find(is_fragment_start).unwrap_or(rest.len());
        let token = &rest[..token_len];
        let kind = if spec[position..].starts_with('#') {
            FragmentKind::Id
        } else {
            FragmentKind::Class
        };

        if token.is_empty() {
            return Err(TagParseError::EmptyFragment {
                spec: spec.to_string(),
                kind,
                position,
            });
        }

        match kind {
            FragmentKind::Id => {
                if parsed.id.is_none() {
                    parsed.id = Some(token);
                }
            }
            FragmentKind::Class => parsed.classes.push(token),
        }

        position += 1 + token_len;
    }

    Ok(parsed)
}
