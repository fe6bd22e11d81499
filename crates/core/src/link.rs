//! `Link` response header parsing
//!
//! GitHub advertises pagination through an RFC 8288 `Link` header:
//!
//! ```text
//! <https://api.github.com/user/1/repos?page=2>; rel="next", <https://api.github.com/user/1/repos?page=5>; rel="last"
//! ```
//!
//! Only the target URI and its `rel` parameter are extracted; other link
//! parameters are ignored.

use regex::Regex;
use std::sync::LazyLock;

static LINK_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([^>]*)>([^<]*)").expect("valid link-value regex"));

/// One `<uri>; rel="..."` entry of a `Link` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRelation {
    pub uri: String,
    /// Relation types, lowercased. `rel="next last"` yields two entries.
    pub rels: Vec<String>,
}

impl LinkRelation {
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rels.iter().any(|r| r.eq_ignore_ascii_case(rel))
    }
}

/// Parse every link-value in a `Link` header
///
/// Malformed fragments are skipped rather than rejected. Entries without a
/// `rel` parameter are kept with an empty relation list.
pub fn parse_link_header(header: &str) -> Vec<LinkRelation> {
    LINK_VALUE
        .captures_iter(header)
        .map(|caps| {
            let uri = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
            let params = caps.get(2).map_or("", |m| m.as_str());

            let rels = rel_value(params)
                .map(|value| {
                    value
                        .split_whitespace()
                        .map(str::to_ascii_lowercase)
                        .collect()
                })
                .unwrap_or_default();

            LinkRelation { uri, rels }
        })
        .collect()
}

/// Split link-params on `;`, skipping separators inside quoted strings
///
/// An unquoted `,` ends the link-value, so anything after it is dropped.
fn split_params(params: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in params.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                parts.push(&params[start..i]);
                start = i + 1;
            }
            ',' if !in_quotes => {
                parts.push(&params[start..i]);
                return parts;
            }
            _ => {}
        }
    }

    parts.push(&params[start..]);
    parts
}

/// Value of the first `rel` parameter, unquoted
fn rel_value(params: &str) -> Option<&str> {
    split_params(params).into_iter().find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("rel")
            .then(|| value.trim().trim_matches('"'))
    })
}

/// Find the first link carrying the given relation type
pub fn find_relation(header: &str, rel: &str) -> Option<LinkRelation> {
    parse_link_header(header)
        .into_iter()
        .find(|link| link.has_rel(rel))
}

/// True iff the header advertises a `rel="next"` link. No header means no next page.
pub fn has_next_page(header: Option<&str>) -> bool {
    header.is_some_and(|h| find_relation(h, "next").is_some())
}
