//! Execution engine module
//!
//! Turns one page request into at most two sequential source requests.
//!
//! # Overview
//!
//! - `SyncEngine` - Traversal controller over a [`Datasource`]
//! - `PageRequest` / `PageResult` - Input and output of one step
//!
//! Flat kinds forward straight to the datasource. `GroupMember` walks the
//! group collection one group per parent page and, for the current group,
//! its users page by page, all behind one linear cursor:
//!
//! ```text
//!   Start ──► resolve group (limit=1) ──► Child{group, item?, groups?}
//!                   ▲                          │ users exhausted
//!                   │                          ▼
//!             NextParent{groups} ◄──── more groups? ── no ──► done
//! ```
//!
//! No state outlives a call. Everything needed to continue is in the
//! returned cursor.

mod types;

pub use types::{PageRequest, PageResult, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT};

use crate::cursor::ResumeToken;
use crate::endpoint::{build_endpoint, validate_expressions, EndpointRequest};
use crate::error::{Error, Result};
use crate::http::{Datasource, FetchRequest, FetchResponse, HttpClient};
use crate::types::{
    EntityKind, JsonObject, JsonValue, MEMBER_GROUP_ID_FIELD, MEMBER_ID_SEPARATOR,
    MEMBER_USER_ID_FIELD, UNIQUE_ID_FIELD,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Parents are resolved one at a time
const PARENT_PAGE_SIZE: u32 = 1;

/// Parent resolved for the current step
struct ResolvedParent {
    id: String,
    next_cursor: Option<String>,
}

/// Outcome of resolving the parent for a derived step
enum ParentStep {
    /// A parent to walk
    Resolved(ResolvedParent),
    /// The step ends here with this result
    Finished(PageResult),
}

/// Sync engine for stepping through entity collections
#[derive(Clone)]
pub struct SyncEngine {
    datasource: Arc<dyn Datasource>,
}

impl SyncEngine {
    /// Create an engine over any datasource
    pub fn new(datasource: Arc<dyn Datasource>) -> Self {
        Self { datasource }
    }

    /// Create an engine backed by the default HTTP client
    pub fn with_http() -> Result<Self> {
        Ok(Self::new(Arc::new(HttpClient::new()?)))
    }

    /// Fetch one page of the request's entity
    ///
    /// Configuration is fully checked before the first request is sent:
    /// page size, filter/search and cursor shape.
    pub async fn get_page(&self, request: &PageRequest) -> Result<PageResult> {
        if request.page_size == 0 {
            return Err(Error::InvalidPageSize { page_size: 0 });
        }
        validate_expressions(
            request.entity,
            request.filter.as_deref(),
            request.search.as_deref(),
        )?;
        request.cursor.validate_for(request.entity)?;

        match request.entity {
            EntityKind::User | EntityKind::Application | EntityKind::Group => {
                self.fetch_flat_page(request).await
            }
            EntityKind::GroupMember => self.fetch_member_page(request).await,
        }
    }

    /// One page of a flat collection
    async fn fetch_flat_page(&self, request: &PageRequest) -> Result<PageResult> {
        let url = build_endpoint(&EndpointRequest {
            api_version: &request.api_version,
            filter: request.filter.as_deref(),
            search: request.search.as_deref(),
            item_cursor: request.cursor.item_cursor(),
            ..EndpointRequest::new(&request.base_url, request.entity, request.page_size)
        })?;

        let response = self.fetch(request, url).await?;
        if !response.is_success() {
            return Ok(failed_step(response));
        }

        Ok(PageResult {
            status: response.status,
            retry_after: response.retry_after,
            objects: response.objects,
            next_cursor: response.next_cursor.map(ResumeToken::item),
        })
    }

    /// One page of group members, resolving the next group first if needed
    async fn fetch_member_page(&self, request: &PageRequest) -> Result<PageResult> {
        let (parent, item_cursor) = match &request.cursor {
            ResumeToken::Child {
                parent_id,
                item_cursor,
                parent_cursor,
            } => (
                ResolvedParent {
                    id: parent_id.clone(),
                    next_cursor: parent_cursor.clone(),
                },
                item_cursor.as_deref(),
            ),
            ResumeToken::Start => match self.fetch_parent_page(request, None).await? {
                ParentStep::Resolved(parent) => (parent, None),
                ParentStep::Finished(result) => return Ok(result),
            },
            ResumeToken::NextParent { parent_cursor } => {
                match self.fetch_parent_page(request, Some(parent_cursor)).await? {
                    ParentStep::Resolved(parent) => (parent, None),
                    ParentStep::Finished(result) => return Ok(result),
                }
            }
            ResumeToken::Item { .. } => {
                return Err(Error::invalid_cursor(
                    request.entity.as_str(),
                    "cursor has an item position but no group",
                ));
            }
        };

        let response = self
            .fetch_child_page(request, &parent.id, item_cursor)
            .await?;
        if !response.is_success() {
            return Ok(failed_step(response));
        }

        let objects = stamp_members(request.entity, &parent.id, response.objects)?;

        let next_cursor = match (response.next_cursor, parent.next_cursor) {
            (Some(item_cursor), parent_cursor) => Some(ResumeToken::Child {
                parent_id: parent.id,
                item_cursor: Some(item_cursor),
                parent_cursor,
            }),
            (None, Some(parent_cursor)) => {
                debug!("Group {} exhausted, moving to next group", parent.id);
                Some(ResumeToken::NextParent { parent_cursor })
            }
            (None, None) => {
                info!("Last group exhausted, {} sync complete", request.entity);
                None
            }
        };

        Ok(PageResult {
            status: response.status,
            retry_after: response.retry_after,
            objects,
            next_cursor,
        })
    }

    /// Fetch a single group to walk next
    async fn fetch_parent_page(
        &self,
        request: &PageRequest,
        parent_cursor: Option<&str>,
    ) -> Result<ParentStep> {
        let parent_kind = request
            .entity
            .parent()
            .ok_or_else(|| Error::config(format!("{} has no parent entity", request.entity)))?;

        let url = build_endpoint(&EndpointRequest {
            api_version: &request.api_version,
            filter: request.filter.as_deref(),
            search: request.search.as_deref(),
            item_cursor: parent_cursor,
            ..EndpointRequest::new(&request.base_url, parent_kind, PARENT_PAGE_SIZE)
        })?;

        let response = self.fetch(request, url).await?;
        if !response.is_success() {
            return Ok(ParentStep::Finished(failed_step(response)));
        }

        let FetchResponse {
            status,
            retry_after,
            objects,
            next_cursor,
        } = response;

        let parent = match objects.len() {
            0 => {
                let next_cursor = next_cursor.map(|cursor| {
                    debug!("Empty {parent_kind} page with a next link, skipping ahead");
                    ResumeToken::next_parent(cursor)
                });
                if next_cursor.is_none() {
                    info!("No more groups, {} sync complete", request.entity);
                }
                return Ok(ParentStep::Finished(PageResult {
                    status,
                    retry_after,
                    objects: Vec::new(),
                    next_cursor,
                }));
            }
            1 => &objects[0],
            got => {
                return Err(Error::TooManyCollectionObjects {
                    expected: PARENT_PAGE_SIZE as usize,
                    got,
                })
            }
        };

        let id = object_id(parent)
            .ok_or_else(|| Error::decode(format!("{parent_kind} object is missing a string id")))?
            .to_string();

        debug!("Resolved group {id} for {}", request.entity);

        Ok(ParentStep::Resolved(ResolvedParent { id, next_cursor }))
    }

    /// Fetch one page of the users of `parent_id`
    async fn fetch_child_page(
        &self,
        request: &PageRequest,
        parent_id: &str,
        item_cursor: Option<&str>,
    ) -> Result<FetchResponse> {
        let url = build_endpoint(&EndpointRequest {
            api_version: &request.api_version,
            item_cursor,
            parent_id: Some(parent_id),
            ..EndpointRequest::new(&request.base_url, request.entity, request.page_size)
        })?;

        self.fetch(request, url).await
    }

    async fn fetch(&self, request: &PageRequest, url: String) -> Result<FetchResponse> {
        let fetch = FetchRequest::new(url, request.auth.clone(), request.timeout);
        self.datasource.fetch(&fetch).await
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine").finish_non_exhaustive()
    }
}

/// Result for a step the source answered with a non-success status
fn failed_step(response: FetchResponse) -> PageResult {
    PageResult {
        status: response.status,
        retry_after: response.retry_after,
        objects: Vec::new(),
        next_cursor: None,
    }
}

fn object_id(object: &JsonObject) -> Option<&str> {
    object
        .get(UNIQUE_ID_FIELD)
        .and_then(JsonValue::as_str)
        .filter(|id| !id.is_empty())
}

/// Give each member a globally unique id and explicit foreign keys
///
/// A user's own id repeats across groups, so the member id is
/// `{userId}-{groupId}`.
fn stamp_members(
    entity: EntityKind,
    group_id: &str,
    objects: Vec<JsonObject>,
) -> Result<Vec<JsonObject>> {
    objects
        .into_iter()
        .map(|mut object| {
            let user_id = object_id(&object)
                .ok_or_else(|| Error::decode(format!("{entity} object is missing a string id")))?
                .to_string();

            object.insert(
                UNIQUE_ID_FIELD.to_string(),
                JsonValue::String(format!("{user_id}{MEMBER_ID_SEPARATOR}{group_id}")),
            );
            object.insert(
                MEMBER_USER_ID_FIELD.to_string(),
                JsonValue::String(user_id),
            );
            object.insert(
                MEMBER_GROUP_ID_FIELD.to_string(),
                JsonValue::String(group_id.to_string()),
            );
            Ok(object)
        })
        .collect()
}
