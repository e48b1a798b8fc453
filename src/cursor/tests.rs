//! Tests for the cursor module

use super::*;
use crate::error::Error;
use crate::types::EntityKind;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use pretty_assertions::assert_eq;
use url::Url;

fn raw(json: &str) -> String {
    STANDARD.encode(json)
}

// ============================================================================
// Token Accessor Tests
// ============================================================================

#[test]
fn test_start_token() {
    let token = ResumeToken::default();
    assert!(token.is_start());
    assert!(token.item_cursor().is_none());
    assert!(token.parent_id().is_none());
    assert!(token.parent_cursor().is_none());
}

#[test]
fn test_child_token_accessors() {
    let token = ResumeToken::Child {
        parent_id: "00g1".to_string(),
        item_cursor: Some("https://acme.okta.com/api/v1/groups/00g1/users?after=u2".to_string()),
        parent_cursor: Some("https://acme.okta.com/api/v1/groups?after=00g1".to_string()),
    };

    assert_eq!(token.parent_id(), Some("00g1"));
    assert_eq!(
        token.item_cursor(),
        Some("https://acme.okta.com/api/v1/groups/00g1/users?after=u2")
    );
    assert_eq!(
        token.parent_cursor(),
        Some("https://acme.okta.com/api/v1/groups?after=00g1")
    );
}

#[test]
fn test_validate_for_entity() {
    let item = ResumeToken::item("https://acme.okta.com/api/v1/users?after=1");
    let next_parent = ResumeToken::next_parent("https://acme.okta.com/api/v1/groups?after=1");

    assert!(ResumeToken::Start.validate_for(EntityKind::User).is_ok());
    assert!(ResumeToken::Start.validate_for(EntityKind::GroupMember).is_ok());
    assert!(item.validate_for(EntityKind::User).is_ok());
    assert!(next_parent.validate_for(EntityKind::GroupMember).is_ok());

    assert!(matches!(
        item.validate_for(EntityKind::GroupMember),
        Err(Error::InvalidCursor { .. })
    ));
    assert!(matches!(
        next_parent.validate_for(EntityKind::Group),
        Err(Error::InvalidCursor { .. })
    ));
}

// ============================================================================
// Codec Tests
// ============================================================================

#[test]
fn test_start_encodes_to_empty_string() {
    assert_eq!(encode(&ResumeToken::Start).unwrap(), "");
    assert_eq!(decode("", EntityKind::User).unwrap(), ResumeToken::Start);
    assert_eq!(decode("  ", EntityKind::GroupMember).unwrap(), ResumeToken::Start);
}

#[test]
fn test_encode_omits_absent_fields() {
    let token = ResumeToken::next_parent("https://acme.okta.com/api/v1/groups?after=g1");
    let encoded = encode(&token).unwrap();
    let json = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();

    assert_eq!(
        json,
        r#"{"collectionCursor":"https://acme.okta.com/api/v1/groups?after=g1"}"#
    );
}

#[test]
fn test_round_trip_every_derived_shape() {
    let tokens = [
        ResumeToken::Child {
            parent_id: "g1".to_string(),
            item_cursor: None,
            parent_cursor: None,
        },
        ResumeToken::Child {
            parent_id: "g1".to_string(),
            item_cursor: Some("https://acme.okta.com/api/v1/groups/g1/users?after=u9".to_string()),
            parent_cursor: Some("https://acme.okta.com/api/v1/groups?after=g1".to_string()),
        },
        ResumeToken::next_parent("https://acme.okta.com/api/v1/groups?after=g1"),
    ];

    for token in tokens {
        let encoded = encode(&token).unwrap();
        assert_eq!(decode(&encoded, EntityKind::GroupMember).unwrap(), token);
    }
}

#[test]
fn test_decode_classifies_wire_fields() {
    let decoded = decode(&raw(r#"{"cursor":"next"}"#), EntityKind::Application).unwrap();
    assert_eq!(decoded, ResumeToken::item("next"));

    let decoded = decode(&raw(r#"{"collectionId":"g1"}"#), EntityKind::GroupMember).unwrap();
    assert_eq!(
        decoded,
        ResumeToken::Child {
            parent_id: "g1".to_string(),
            item_cursor: None,
            parent_cursor: None,
        }
    );

    // empty fields count as absent
    let decoded = decode(
        &raw(r#"{"cursor":"","collectionCursor":"p2"}"#),
        EntityKind::GroupMember,
    )
    .unwrap();
    assert_eq!(decoded, ResumeToken::next_parent("p2"));

    assert_eq!(decode(&raw("{}"), EntityKind::User).unwrap(), ResumeToken::Start);
}

#[test]
fn test_decode_rejects_mixed_axes() {
    let err = decode(
        &raw(r#"{"cursor":"c","collectionCursor":"p"}"#),
        EntityKind::GroupMember,
    )
    .unwrap_err();

    assert!(matches!(err, Error::InvalidCursor { ref entity, .. } if entity == "GroupMember"));
}

#[test]
fn test_decode_rejects_flat_cursor_for_derived_entity() {
    let err = decode(&raw(r#"{"cursor":"c"}"#), EntityKind::GroupMember).unwrap_err();
    assert!(matches!(err, Error::InvalidCursor { .. }));
    assert!(err.is_config());
}

#[test]
fn test_decode_rejects_garbage() {
    assert!(matches!(
        decode("%%%not-base64%%%", EntityKind::User),
        Err(Error::InvalidCursor { .. })
    ));
    assert!(matches!(
        decode(&raw("[1, 2]"), EntityKind::User),
        Err(Error::InvalidCursor { .. })
    ));
}

#[test]
fn test_validate_origin() {
    let base = Url::parse("https://acme.okta.com").unwrap();

    assert!(ResumeToken::Start.validate_origin(EntityKind::User, &base).is_ok());
    assert!(ResumeToken::item("https://acme.okta.com/api/v1/users?after=00u2")
        .validate_origin(EntityKind::User, &base)
        .is_ok());
    assert!(ResumeToken::item("https://ACME.okta.com:443/api/v1/users")
        .validate_origin(EntityKind::User, &base)
        .is_ok());

    for link in [
        "http://acme.okta.com/api/v1/users",
        "https://acme.okta.com.evil.com/api/v1/users",
        "https://acme.okta.com:8443/api/v1/users",
        "/api/v1/users?after=00u2",
    ] {
        let err = ResumeToken::item(link)
            .validate_origin(EntityKind::User, &base)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCursor { .. }), "link {link}");
    }

    let err = ResumeToken::next_parent("http://acme.okta.com/api/v1/groups?after=00g1")
        .validate_origin(EntityKind::GroupMember, &base)
        .unwrap_err();
    assert!(err.is_config());
}
