//! Tests for the adapter facade

use super::*;
use crate::cursor::{decode, encode, ResumeToken};
use crate::error::{Error, Result};
use crate::http::{FetchRequest, FetchResponse};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

const AUTH: &str = "SSWS test-token";

/// Replays canned responses and records the URLs it was asked for
#[derive(Default)]
struct ScriptedSource {
    responses: Mutex<VecDeque<Result<FetchResponse>>>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl ScriptedSource {
    fn new(responses: Vec<Result<FetchResponse>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::default(),
        })
    }

    fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.url.clone())
            .collect()
    }

    fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Datasource for ScriptedSource {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Other("no scripted response left".to_string())))
    }
}

fn ok(objects: serde_json::Value, next: Option<&str>) -> Result<FetchResponse> {
    let objects = objects
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o.as_object().unwrap().clone())
        .collect();
    Ok(FetchResponse {
        status: 200,
        retry_after: None,
        objects,
        next_cursor: next.map(str::to_string),
    })
}

fn status(status: u16, retry_after: Option<&str>) -> Result<FetchResponse> {
    Ok(FetchResponse {
        status,
        retry_after: retry_after.map(str::to_string),
        ..FetchResponse::default()
    })
}

fn request(entity: &str) -> AdapterRequest {
    AdapterRequest {
        address: "acme.okta.com".to_string(),
        auth: Some(AUTH.to_string()),
        config: None,
        entity: EntityConfig::new(entity).unique_attribute("id"),
        ordered: false,
        page_size: 2,
        cursor: String::new(),
    }
}

async fn expect_error(source: Arc<ScriptedSource>, request: &AdapterRequest) -> AdapterError {
    Adapter::new(source).get_page(request).await.unwrap_err()
}

// ============================================================================
// Validation Tests
// ============================================================================

#[tokio::test]
async fn test_http_address_is_rejected() {
    let source = ScriptedSource::new(vec![]);
    let mut req = request("User");
    req.address = "http://acme.okta.com".to_string();

    let err = expect_error(source.clone(), &req).await;
    assert_eq!(err.code, ErrorCode::InvalidDatasourceConfig);
    assert!(err.message.contains("https"));
    assert!(source.urls().is_empty());
}

#[tokio::test]
async fn test_address_without_scheme_gets_https() {
    let source = ScriptedSource::new(vec![ok(json!([]), None)]);
    Adapter::new(source.clone())
        .get_page(&request("User"))
        .await
        .unwrap();

    assert_eq!(
        source.urls(),
        vec!["https://acme.okta.com/api/v1/users?limit=2".to_string()]
    );
}

#[tokio::test]
async fn test_auth_is_required() {
    for auth in [None, Some(""), Some("Basic abc"), Some("token")] {
        let mut req = request("User");
        req.auth = auth.map(str::to_string);

        let err = expect_error(ScriptedSource::new(vec![]), &req).await;
        assert_eq!(err.code, ErrorCode::InvalidDatasourceConfig, "auth {auth:?}");
    }
}

#[tokio::test]
async fn test_bearer_auth_is_forwarded() {
    let source = ScriptedSource::new(vec![ok(json!([]), None)]);
    let mut req = request("Application");
    req.auth = Some("Bearer abc".to_string());

    Adapter::new(source.clone()).get_page(&req).await.unwrap();
    assert_eq!(source.requests()[0].auth, "Bearer abc");
}

#[tokio::test]
async fn test_unsupported_entity() {
    let err = expect_error(ScriptedSource::new(vec![]), &request("Role")).await;
    assert_eq!(err.code, ErrorCode::InvalidEntityConfig);
    assert!(err.message.contains("Role"));
}

#[tokio::test]
async fn test_unique_id_attribute_is_required() {
    let mut req = request("User");
    req.entity = EntityConfig::new("User").attribute("id").attribute("status");

    let err = expect_error(ScriptedSource::new(vec![]), &req).await;
    assert_eq!(err.code, ErrorCode::InvalidEntityConfig);
}

#[tokio::test]
async fn test_child_entities_are_rejected() {
    let mut req = request("Group");
    req.entity
        .child_entities
        .push(EntityConfig::new("GroupMember").unique_attribute("id"));

    let err = expect_error(ScriptedSource::new(vec![]), &req).await;
    assert_eq!(err.code, ErrorCode::InvalidEntityConfig);
}

#[tokio::test]
async fn test_ordered_is_rejected() {
    let mut req = request("User");
    req.ordered = true;

    let err = expect_error(ScriptedSource::new(vec![]), &req).await;
    assert_eq!(err.code, ErrorCode::InvalidPageRequestConfig);
}

#[tokio::test]
async fn test_page_size_must_be_positive() {
    for page_size in [0, -1, i64::from(u32::MAX) + 1] {
        let mut req = request("User");
        req.page_size = page_size;

        let err = expect_error(ScriptedSource::new(vec![]), &req).await;
        assert_eq!(err.code, ErrorCode::InvalidPageRequestConfig);
    }
}

#[tokio::test]
async fn test_config_is_checked_first() {
    let mut req = request("Role");
    req.address = "http://acme.okta.com".to_string();
    req.config = Some(json!({ "requestTimeoutSeconds": 0 }));

    let err = expect_error(ScriptedSource::new(vec![]), &req).await;
    assert_eq!(err.code, ErrorCode::InvalidDatasourceConfig);
    assert!(err.message.contains("config"));
}

#[tokio::test]
async fn test_filter_and_search_send_nothing() {
    let source = ScriptedSource::new(vec![]);
    let mut req = request("User");
    req.config = Some(json!({
        "filters": { "User": "status eq \"ACTIVE\"" },
        "search": { "User": "profile.lastName sw \"S\"" }
    }));

    let err = expect_error(source.clone(), &req).await;
    assert_eq!(err.code, ErrorCode::InvalidEntityConfig);
    assert!(source.urls().is_empty());
}

#[tokio::test]
async fn test_malformed_cursor() {
    let mut req = request("User");
    req.cursor = "not base64!".to_string();

    let err = expect_error(ScriptedSource::new(vec![]), &req).await;
    assert_eq!(err.code, ErrorCode::InvalidPageRequestConfig);
}

#[tokio::test]
async fn test_child_cursor_for_flat_entity_is_rejected() {
    let token = ResumeToken::Child {
        parent_id: "00g1".to_string(),
        item_cursor: None,
        parent_cursor: None,
    };
    let mut req = request("User");
    req.cursor = encode(&token).unwrap();

    let err = expect_error(ScriptedSource::new(vec![]), &req).await;
    assert_eq!(err.code, ErrorCode::InvalidPageRequestConfig);
}

#[tokio::test]
async fn test_plain_http_cursor_is_rejected() {
    let source = ScriptedSource::new(vec![ok(json!([{"id": "00u9"}]), None)]);
    let mut req = request("User");
    req.address = "https://acme.okta.com".to_string();
    req.cursor = encode(&ResumeToken::item("http://127.0.0.1:8080/steal")).unwrap();

    let err = expect_error(source.clone(), &req).await;
    assert_eq!(err.code, ErrorCode::InvalidPageRequestConfig);
    assert!(source.requests().is_empty());
}

#[tokio::test]
async fn test_cursor_for_another_host_is_rejected() {
    let source = ScriptedSource::new(vec![]);
    let mut req = request("GroupMember");
    req.cursor = encode(&ResumeToken::Child {
        parent_id: "00g1".to_string(),
        item_cursor: Some("https://acme.okta.com/api/v1/groups/00g1/users?after=00u1".to_string()),
        parent_cursor: Some("https://other.okta.com/api/v1/groups?after=00g1".to_string()),
    })
    .unwrap();

    let err = expect_error(source.clone(), &req).await;
    assert_eq!(err.code, ErrorCode::InvalidPageRequestConfig);
    assert!(err.message.contains("other.okta.com"));
    assert!(source.urls().is_empty());
}

#[tokio::test]
async fn test_scheme_check_ignores_case() {
    for address in ["HTTP://acme.okta.com", "Http://acme.okta.com"] {
        let mut req = request("User");
        req.address = address.to_string();

        let err = expect_error(ScriptedSource::new(vec![]), &req).await;
        assert_eq!(err.code, ErrorCode::InvalidDatasourceConfig);
        assert!(err.message.contains("must use https"), "address {address}");
    }

    let source = ScriptedSource::new(vec![ok(json!([]), None)]);
    let mut req = request("User");
    req.address = "HTTPS://acme.okta.com".to_string();
    Adapter::new(source.clone()).get_page(&req).await.unwrap();
    assert_eq!(
        source.urls(),
        vec!["https://acme.okta.com/api/v1/users?limit=2".to_string()]
    );
}

// ============================================================================
// Page Tests
// ============================================================================

#[tokio::test]
async fn test_flat_page_with_config() {
    let next = "https://acme.okta.com/api/v1/users?after=00u2&limit=2";
    let source = ScriptedSource::new(vec![ok(
        json!([{"id": "00u1", "status": "ACTIVE"}, {"id": "00u2", "status": "ACTIVE"}]),
        Some(next),
    )]);
    let mut req = request("User");
    req.config = Some(json!({
        "requestTimeoutSeconds": 7,
        "filters": { "User": "status eq \"ACTIVE\"" }
    }));

    let page = Adapter::new(source.clone()).get_page(&req).await.unwrap();

    assert_eq!(page.objects.len(), 2);
    assert_eq!(page.objects[0], json!({"id": "00u1"}).as_object().unwrap().clone());
    assert!(!page.is_last());
    assert_eq!(decode(&page.next_cursor, EntityKind::User).unwrap(), ResumeToken::item(next));

    let sent = &source.requests()[0];
    assert_eq!(
        sent.url,
        "https://acme.okta.com/api/v1/users?limit=2&filter=status+eq+%22ACTIVE%22"
    );
    assert_eq!(sent.timeout, Duration::from_secs(7));
}

#[tokio::test]
async fn test_resume_uses_cursor_url() {
    let next = "https://acme.okta.com/api/v1/users?after=00u2&limit=2";
    let source = ScriptedSource::new(vec![ok(json!([{"id": "00u3"}]), None)]);
    let mut req = request("User");
    req.cursor = encode(&ResumeToken::item(next)).unwrap();

    let page = Adapter::new(source.clone()).get_page(&req).await.unwrap();

    assert_eq!(source.urls(), vec![next.to_string()]);
    assert!(page.is_last());
    assert_eq!(page.next_cursor, "");
}

#[tokio::test]
async fn test_projection_resolves_dotted_paths() {
    let source = ScriptedSource::new(vec![ok(
        json!([{
            "id": "00u1",
            "status": "ACTIVE",
            "profile": { "email": "ada@acme.com", "login": "ada" }
        }]),
        None,
    )]);
    let mut req = request("User");
    req.entity = EntityConfig::new("User")
        .unique_attribute("id")
        .attribute("profile.email")
        .attribute("profile.missing")
        .attribute("lastLogin");

    let page = Adapter::new(source).get_page(&req).await.unwrap();

    assert_eq!(
        serde_json::Value::Object(page.objects[0].clone()),
        json!({"id": "00u1", "profile.email": "ada@acme.com"})
    );
}

#[tokio::test]
async fn test_group_member_page() {
    let groups_next = "https://acme.okta.com/api/v1/groups?after=00g1&limit=1";
    let source = ScriptedSource::new(vec![
        ok(json!([{"id": "00g1"}]), Some(groups_next)),
        ok(json!([{"id": "00u1"}, {"id": "00u2"}]), None),
    ]);
    let mut req = request("GroupMember");
    req.entity = EntityConfig::new("GroupMember")
        .unique_attribute("id")
        .attribute("userId")
        .attribute("groupId");

    let page = Adapter::new(source.clone()).get_page(&req).await.unwrap();

    assert_eq!(
        page.objects
            .iter()
            .map(|o| serde_json::Value::Object(o.clone()))
            .collect::<Vec<_>>(),
        vec![
            json!({"id": "00u1-00g1", "userId": "00u1", "groupId": "00g1"}),
            json!({"id": "00u2-00g1", "userId": "00u2", "groupId": "00g1"}),
        ]
    );
    assert_eq!(
        decode(&page.next_cursor, EntityKind::GroupMember).unwrap(),
        ResumeToken::next_parent(groups_next)
    );
    assert_eq!(source.urls()[1], "https://acme.okta.com/api/v1/groups/00g1/users?limit=2");
}

// ============================================================================
// Error Mapping Tests
// ============================================================================

#[tokio::test]
async fn test_rate_limited_carries_retry_after() {
    let source = ScriptedSource::new(vec![status(429, Some("30"))]);
    let err = expect_error(source, &request("User")).await;

    assert_eq!(err.code, ErrorCode::DatasourceRateLimited);
    assert_eq!(err.retry_after.as_deref(), Some("30"));
    assert!(err.code.is_retryable());
}

#[tokio::test]
async fn test_status_codes_are_classified() {
    for (code, expected) in [
        (401, ErrorCode::DatasourceAuthenticationFailed),
        (403, ErrorCode::DatasourceAuthenticationFailed),
        (404, ErrorCode::DatasourceFailed),
        (500, ErrorCode::DatasourceFailed),
    ] {
        let err = expect_error(ScriptedSource::new(vec![status(code, None)]), &request("Group")).await;
        assert_eq!(err.code, expected, "status {code}");
        assert!(err.message.contains(&code.to_string()));
    }
}

#[tokio::test]
async fn test_transport_failure() {
    let source = ScriptedSource::new(vec![Err(Error::Timeout { timeout_ms: 100 })]);
    let err = expect_error(source, &request("User")).await;

    assert_eq!(err.code, ErrorCode::DatasourceFailed);
    assert_eq!(
        err.message,
        "Failed to execute Okta request: Request timeout after 100ms"
    );
}

#[tokio::test]
async fn test_too_many_parents_is_internal() {
    let source = ScriptedSource::new(vec![ok(json!([{"id": "00g1"}, {"id": "00g2"}]), None)]);
    let err = expect_error(source, &request("GroupMember")).await;

    assert_eq!(err.code, ErrorCode::Internal);
    assert_eq!(
        err.message,
        "Too many collection objects returned in response; expected 1, got 2."
    );
}

#[test]
fn test_error_serializes_for_host() {
    let err = AdapterError::from_status(429, Some("10".to_string()));
    assert_eq!(
        serde_json::to_value(&err).unwrap(),
        json!({
            "code": "DATASOURCE_RATE_LIMITED",
            "message": "Datasource responded with an error status code: 429.",
            "retryAfter": "10"
        })
    );
}

#[test]
fn test_request_debug_redacts_auth() {
    let debug = format!("{:?}", request("User"));
    assert!(!debug.contains("test-token"));
}
