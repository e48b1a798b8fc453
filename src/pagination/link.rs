//! Link header parsing
//!
//! Format: `<https://acme.okta.com/api/v1/users?after=00u1&limit=200>; rel="next"`.
//! A response may send several `Link` headers, and one header may list
//! several comma-separated links.

use reqwest::header::{HeaderMap, LINK};

/// Relation followed to reach the next page
pub const NEXT_REL: &str = "next";

/// One parsed link: target URL and its relation types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRelation {
    /// Target URL between the angle brackets
    pub url: String,
    /// Relation types from the `rel` parameter
    pub rels: Vec<String>,
}

impl LinkRelation {
    /// Check if this link carries the given relation type
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rels.iter().any(|r| r.eq_ignore_ascii_case(rel))
    }
}

/// Parse every well-formed link in a single header value
///
/// Entries without a bracketed URL or without a `rel` parameter are skipped.
pub fn parse_links(header: &str) -> Vec<LinkRelation> {
    let mut links = Vec::new();
    let mut rest = header;

    while let Some(open) = rest.find('<') {
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find('>') else {
            break;
        };
        let url = after_open[..close].trim();
        let after_close = &after_open[close + 1..];

        // Parameters run up to the next link's opening bracket.
        let params_end = after_close.find('<').unwrap_or(after_close.len());
        let params = &after_close[..params_end];
        rest = &after_close[params_end..];

        let rels: Vec<String> = params
            .split(';')
            .filter_map(|segment| {
                let (key, value) = segment.split_once('=')?;
                if !key.trim().eq_ignore_ascii_case("rel") {
                    return None;
                }
                let value = value
                    .trim()
                    .trim_end_matches(',')
                    .trim()
                    .trim_matches('"')
                    .trim_matches('\'');
                Some(value.to_string())
            })
            .flat_map(|value| {
                value
                    .split_whitespace()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();

        if !url.is_empty() && !rels.is_empty() {
            links.push(LinkRelation {
                url: url.to_string(),
                rels,
            });
        }
    }

    links
}

/// Parse a Link header and extract the URL for the given rel
pub fn parse_link_header(header: &str, target_rel: &str) -> Option<String> {
    parse_links(header)
        .into_iter()
        .find(|link| link.has_rel(target_rel))
        .map(|link| link.url)
}

/// Find the `next` URL across all Link header values of one response
pub fn next_link<'a, I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    values
        .into_iter()
        .find_map(|value| parse_link_header(value, NEXT_REL))
}

/// Find the `next` URL in a response's headers
///
/// Header values that are not valid visible ASCII are ignored.
pub fn next_link_from_headers(headers: &HeaderMap) -> Option<String> {
    next_link(
        headers
            .get_all(LINK)
            .iter()
            .filter_map(|value| value.to_str().ok()),
    )
}
