//! Request URL construction

use crate::error::{Error, Result};
use crate::types::EntityKind;
use url::{form_urlencoded, Url};

/// API version used when the configuration does not name one
pub const DEFAULT_API_VERSION: &str = "v1";

/// Shortest encoded filter or search the source could accept, e.g. `id eq 1`
pub const MIN_EXPRESSION_LEN: usize = 7;

/// Filter applied to groups when the caller gives neither filter nor search.
/// Excludes built-in groups such as "Everyone".
pub const DEFAULT_GROUP_FILTER: &str = r#"type eq "OKTA_GROUP" or type eq "APP_GROUP""#;

const PAGE_SIZE_PARAM: &str = "limit";
const FILTER_PARAM: &str = "filter";
const SEARCH_PARAM: &str = "search";

/// Inputs for one page URL
#[derive(Debug, Clone, Copy)]
pub struct EndpointRequest<'a> {
    /// Base address, scheme included
    pub base_url: &'a str,
    /// API version path segment, e.g. "v1"
    pub api_version: &'a str,
    /// Kind of collection to page through
    pub entity: EntityKind,
    /// Page size sent as `limit`
    pub page_size: u32,
    /// Filter expression in the source's syntax
    pub filter: Option<&'a str>,
    /// Search expression in the source's syntax
    pub search: Option<&'a str>,
    /// Next-page link from a previous response
    pub item_cursor: Option<&'a str>,
    /// Group whose members are requested (GroupMember only)
    pub parent_id: Option<&'a str>,
}

impl<'a> EndpointRequest<'a> {
    /// Request for the first page of `entity`
    pub fn new(base_url: &'a str, entity: EntityKind, page_size: u32) -> Self {
        Self {
            base_url,
            api_version: DEFAULT_API_VERSION,
            entity,
            page_size,
            filter: None,
            search: None,
            item_cursor: None,
            parent_id: None,
        }
    }
}

/// Normalise `\"` to `"` and form-encode the expression
pub fn encode_expression(expression: &str) -> String {
    let normalized = expression.replace("\\\"", "\"");
    form_urlencoded::byte_serialize(normalized.as_bytes()).collect()
}

/// Check filter and search for an entity without building anything
///
/// Both set is an error. Either one shorter than [`MIN_EXPRESSION_LEN`]
/// once encoded is an error. The length check is a plausibility heuristic,
/// not a grammar.
pub fn validate_expressions(
    entity: EntityKind,
    filter: Option<&str>,
    search: Option<&str>,
) -> Result<()> {
    encoded_query(entity, filter, search).map(|_| ())
}

/// Build the URL of one page
pub fn build_endpoint(request: &EndpointRequest<'_>) -> Result<String> {
    let entity = request.entity;

    // Child pages are scoped by the parent, the caller's expression
    // belongs to the parent query instead.
    if entity.is_derived() && (request.filter.is_some() || request.search.is_some()) {
        return Err(Error::invalid_value(
            "filter",
            format!(
                "{entity} pages cannot be filtered directly; the expression applies to the parent query"
            ),
        ));
    }

    let query = encoded_query(entity, request.filter, request.search)?;

    if let Some(cursor) = request.item_cursor {
        return Ok(cursor.to_string());
    }

    let mut url = Url::parse(request.base_url)?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| Error::invalid_value("address", "address cannot be a base URL"))?;
        segments.pop_if_empty().extend(["api", request.api_version]);

        match entity {
            EntityKind::User => {
                segments.push("users");
            }
            EntityKind::Application => {
                segments.push("apps");
            }
            EntityKind::Group => {
                segments.push("groups");
            }
            EntityKind::GroupMember => {
                let parent_id = request
                    .parent_id
                    .filter(|id| !id.is_empty())
                    .ok_or_else(|| Error::MissingParentId {
                        entity: entity.as_str().to_string(),
                    })?;
                segments.extend(["groups", parent_id, "users"]);
            }
        }
    }

    // Already-encoded expressions are appended verbatim so the length check
    // above saw exactly what is sent.
    let mut query_string = format!("{PAGE_SIZE_PARAM}={}", request.page_size);
    if let Some((param, value)) = query {
        query_string.push('&');
        query_string.push_str(param);
        query_string.push('=');
        query_string.push_str(&value);
    }
    url.set_query(Some(&query_string));

    Ok(url.into())
}

/// Resolve and encode the expression sent for an entity, if any
fn encoded_query(
    entity: EntityKind,
    filter: Option<&str>,
    search: Option<&str>,
) -> Result<Option<(&'static str, String)>> {
    match (filter, search) {
        (Some(_), Some(_)) => Err(Error::FilterAndSearch {
            entity: entity.as_str().to_string(),
        }),
        (Some(filter), None) => {
            let encoded = encode_expression(filter);
            if encoded.len() < MIN_EXPRESSION_LEN {
                return Err(Error::InvalidFilter {
                    entity: entity.as_str().to_string(),
                    filter: filter.to_string(),
                });
            }
            Ok(Some((FILTER_PARAM, encoded)))
        }
        (None, Some(search)) => {
            let encoded = encode_expression(search);
            if encoded.len() < MIN_EXPRESSION_LEN {
                return Err(Error::InvalidSearch {
                    entity: entity.as_str().to_string(),
                    search: search.to_string(),
                });
            }
            Ok(Some((SEARCH_PARAM, encoded)))
        }
        (None, None) => Ok(match entity {
            EntityKind::Group => Some((FILTER_PARAM, encode_expression(DEFAULT_GROUP_FILTER))),
            EntityKind::User | EntityKind::Application | EntityKind::GroupMember => None,
        }),
    }
}
