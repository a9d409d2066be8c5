//! Lenient parser for `Link`-style continuation headers.
//!
//! List responses may carry a `Link` header announcing related pages:
//!
//! ```text
//! <https://api.example/items?page=2>; rel="next", <https://api.example/items?page=9>; rel="last"
//! ```
//!
//! The header is advisory metadata, not critical payload, so parsing is
//! lenient: malformed entries are skipped and [`parse_link_header`] never
//! fails.

use url::Url;

/// One relation parsed from a `Link` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelLink {
    /// Relation name, e.g. `next`, `prev`, `first`, `last`.
    pub rel: String,
    /// Target of the relation.
    pub target: Url,
}

/// The ordered set of relations from one response's `Link` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSet {
    entries: Vec<RelLink>,
}

impl LinkSet {
    /// Returns `true` if any entry's relation is `next`.
    pub fn has_next(&self) -> bool {
        self.get("next").is_some()
    }

    /// Target of the `next` relation, if present.
    pub fn next(&self) -> Option<&Url> {
        self.get("next")
    }

    /// Target of the first entry with the given relation name.
    pub fn get(&self, rel: &str) -> Option<&Url> {
        self.entries
            .iter()
            .find(|entry| entry.rel == rel)
            .map(|entry| &entry.target)
    }

    /// Iterate over entries in header order.
    pub fn iter(&self) -> impl Iterator<Item = &RelLink> {
        self.entries.iter()
    }

    /// Number of well-formed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no well-formed entries were found.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse a `Link` header value into a [`LinkSet`].
///
/// Entries have the form `<target>; rel="name"[; other-params]` and are
/// separated by commas. Entries missing the angle-bracketed target, a
/// parseable URL, or a `rel` parameter are dropped.
pub fn parse_link_header(value: &str) -> LinkSet {
    let entries = value
        .split(',')
        .filter_map(|part| parse_entry(part.trim()))
        .collect();
    LinkSet { entries }
}

fn parse_entry(part: &str) -> Option<RelLink> {
    let rest = part.strip_prefix('<')?;
    let (target, params) = rest.split_once('>')?;
    let target = Url::parse(target).ok()?;

    let rel = params
        .split(';')
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim() == "rel")
        .map(|(_, value)| value.trim().trim_matches('"').to_string())?;

    if rel.is_empty() {
        return None;
    }

    Some(RelLink { rel, target })
}
