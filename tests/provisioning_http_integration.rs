//! End-to-end tests through the full axum router.
//!
//! Storage, Plex, Stripe and session resolution are the in-memory and mock
//! adapters; everything between the router and the ports is real.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use plexgate::adapters::http::{api_router, AccessSettings, AppState};
use plexgate::adapters::{
    InMemoryAccessDirectory, MockBillingProvider, MockMediaAccessClient, MockSessionValidator,
};
use plexgate::config::ServerConfig;
use plexgate::domain::billing::{
    sign_payload, BillingCustomer, PLEX_EMAIL_METADATA_KEY, PLEX_USER_ID_METADATA_KEY,
};
use plexgate::domain::foundation::PlexUserId;

const WEBHOOK_SECRET: &str = "whsec_integration";
const ADMIN_TOKEN: &str = "owner-token";
const FRIEND_TOKEN: &str = "friend-token";
const OTHER_TOKEN: &str = "other-token";

struct Harness {
    router: Router,
    directory: InMemoryAccessDirectory,
    media: MockMediaAccessClient,
    billing: MockBillingProvider,
}

fn id(n: i64) -> PlexUserId {
    PlexUserId::new(n).unwrap()
}

fn harness() -> Harness {
    let directory = InMemoryAccessDirectory::new();
    let media = MockMediaAccessClient::new()
        .with_account("user7@test.example.com", id(7))
        .with_account("user8@test.example.com", id(8));
    let billing = MockBillingProvider::new();
    let sessions = MockSessionValidator::new()
        .with_test_user(ADMIN_TOKEN, 1, true)
        .with_test_user(FRIEND_TOKEN, 7, false)
        .with_test_user(OTHER_TOKEN, 8, false);

    let state = AppState::new(
        Arc::new(directory.clone()),
        Arc::new(media.clone()),
        Arc::new(billing.clone()),
        Arc::new(sessions),
        AccessSettings::new(id(1), WEBHOOK_SECRET, "plex"),
    );

    Harness {
        router: api_router(state, &ServerConfig::default()),
        directory,
        media,
        billing,
    }
}

async fn send(h: &Harness, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = h.router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
}

fn api(method: &str, uri: &str, token: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(format!("/api/v1{}", uri));
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn entitlement_items(keys: &[&str]) -> serde_json::Value {
    keys.iter()
        .map(|key| serde_json::json!({ "id": format!("ent_{}", key), "lookup_key": key }))
        .collect()
}

fn summary_event(event_id: &str, customer: &str, current: &[&str], previous: Option<&[&str]>) -> String {
    let mut data = serde_json::json!({
        "object": {
            "object": "entitlements.active_entitlement_summary",
            "customer": customer,
            "entitlements": { "object": "list", "data": entitlement_items(current) }
        }
    });
    if let Some(previous) = previous {
        data["previous_attributes"] = serde_json::json!({
            "entitlements": { "object": "list", "data": entitlement_items(previous) }
        });
    }

    serde_json::json!({
        "id": event_id,
        "type": "entitlements.active_entitlement_summary.updated",
        "created": chrono::Utc::now().timestamp(),
        "livemode": false,
        "data": data,
    })
    .to_string()
}

fn webhook(payload: &str, secret: &str) -> Request<Body> {
    let signature = sign_payload(secret, chrono::Utc::now().timestamp(), payload).unwrap();
    Request::builder()
        .method("POST")
        .uri("/api/v1/stripe/webhook")
        .header("Content-Type", "application/json")
        .header("Stripe-Signature", signature)
        .body(Body::from(payload.to_string()))
        .unwrap()
}

// ════════════════════════════════════════════════════════════════════════════════
// Webhooks
// ════════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn webhook_with_wrong_secret_changes_nothing() {
    let h = harness();
    h.billing.add_customer(
        BillingCustomer::new("cus_1").with_metadata(PLEX_EMAIL_METADATA_KEY, "user7@test.example.com"),
    );
    let payload = summary_event("evt_forged", "cus_1", &["plex"], None);

    let (status, body) = send(&h, webhook(&payload, "whsec_attacker")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "INVALID_SIGNATURE");
    assert!(h.media.calls().is_empty());
    assert!(h.billing.lookups().is_empty());
}

#[tokio::test]
async fn entitlement_added_then_removed() {
    let h = harness();
    h.billing.add_customer(
        BillingCustomer::new("cus_1")
            .with_metadata(PLEX_EMAIL_METADATA_KEY, "user7@test.example.com")
            .with_metadata(PLEX_USER_ID_METADATA_KEY, "7"),
    );

    let added = summary_event("evt_added", "cus_1", &["plex"], Some(&[][..]));
    let (status, body) = send(&h, webhook(&added, WEBHOOK_SECRET)).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["outcome"], "access_granted");
    assert!(h.media.has_access(id(7)));

    let removed = summary_event("evt_removed", "cus_1", &[], Some(&["plex"][..]));
    let (status, body) = send(&h, webhook(&removed, WEBHOOK_SECRET)).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["outcome"], "access_revoked");
    assert!(!h.media.has_access(id(7)));
}

#[tokio::test]
async fn unrelated_entitlement_is_no_change() {
    let h = harness();
    h.billing.add_customer(
        BillingCustomer::new("cus_1").with_metadata(PLEX_EMAIL_METADATA_KEY, "user7@test.example.com"),
    );

    let payload = summary_event("evt_other", "cus_1", &["priority-support"], Some(&[][..]));
    let (status, body) = send(&h, webhook(&payload, WEBHOOK_SECRET)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "no_change");
    assert!(h.media.calls().is_empty());
}

// ════════════════════════════════════════════════════════════════════════════════
// Invite codes
// ════════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn invite_create_claim_and_exhaustion() {
    let h = harness();

    let (created, body) = send(
        &h,
        api("POST", "/codes", Some(ADMIN_TOKEN), Some(serde_json::json!({"code": "MOVIENIGHT", "max_uses": 1}))),
    )
    .await;
    assert_eq!(created, StatusCode::CREATED, "{}", body);

    let claim = serde_json::json!({"code": "MOVIENIGHT"});
    let (first, first_body) = send(&h, api("POST", "/codes/claim", Some(FRIEND_TOKEN), Some(claim.clone()))).await;
    let (second, second_body) = send(&h, api("POST", "/codes/claim", Some(OTHER_TOKEN), Some(claim))).await;

    assert_eq!(first, StatusCode::OK, "{}", first_body);
    assert!(h.media.has_access(id(7)));
    assert_eq!(second, StatusCode::BAD_REQUEST);
    assert_eq!(second_body["message"], "code not found");
    assert!(!h.media.has_access(id(8)));
    assert_eq!(h.media.shared_emails(), vec!["user7@test.example.com"]);

    let (_, check) = send(&h, api("GET", "/plex/check-access", Some(FRIEND_TOKEN), None)).await;
    assert_eq!(check["has_access"], true);
}

#[tokio::test]
async fn claimed_code_shows_in_user_history() {
    let h = harness();
    send(
        &h,
        api("POST", "/codes", Some(ADMIN_TOKEN), Some(serde_json::json!({"code": "FAMILY"}))),
    )
    .await;
    send(
        &h,
        api("POST", "/codes/claim", Some(FRIEND_TOKEN), Some(serde_json::json!({"code": "FAMILY"}))),
    )
    .await;

    let (status, body) = send(&h, api("GET", "/plex/users/7/invites", Some(ADMIN_TOKEN), None)).await;

    assert_eq!(status, StatusCode::OK);
    let invites = body["invites"].as_array().unwrap();
    assert_eq!(invites.len(), 1);
    assert_eq!(invites[0]["code"], "FAMILY");
    assert_eq!(invites[0]["active"], true);
    assert_eq!(h.directory.user_count().await, 1);
}

// ════════════════════════════════════════════════════════════════════════════════
// Admin guards
// ════════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn admin_endpoints_reject_other_callers() {
    let h = harness();
    let admin_only = [
        ("POST", "/codes", Some(serde_json::json!({}))),
        ("GET", "/codes", None),
        ("GET", "/plex/users", None),
        ("POST", "/plex/users/grant", Some(serde_json::json!({"user_id": 7}))),
        ("POST", "/plex/users/7/revoke", None),
        ("DELETE", "/plex/users/7", None),
    ];

    for (method, uri, body) in admin_only {
        let (anonymous, _) = send(&h, api(method, uri, None, body.clone())).await;
        let (regular, _) = send(&h, api(method, uri, Some(FRIEND_TOKEN), body)).await;

        assert_eq!(anonymous, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(regular, StatusCode::FORBIDDEN, "{} {}", method, uri);
    }
    assert!(h.media.calls().is_empty());
    assert_eq!(h.directory.code_count().await, 0);
}

#[tokio::test]
async fn owner_cannot_be_revoked_or_deleted() {
    let h = harness();

    let (revoke, _) = send(&h, api("POST", "/plex/users/1/revoke", Some(ADMIN_TOKEN), None)).await;
    let (delete, _) = send(&h, api("DELETE", "/plex/users/1", Some(ADMIN_TOKEN), None)).await;

    assert_eq!(revoke, StatusCode::FORBIDDEN);
    assert_eq!(delete, StatusCode::FORBIDDEN);
    assert!(h.media.unshared_users().is_empty());
}

#[tokio::test]
async fn health_needs_no_auth() {
    let h = harness();

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(&h, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
