//! Axum router configuration for invite code endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::state::AppState;

use super::handlers::{
    claim_invite_code, create_invite_code, disable_invite_code, get_invite_code,
    list_invite_codes,
};

/// Create the invite code router.
///
/// # Routes
///
/// ## Admin Endpoints
/// - `POST /codes` - Create a code
/// - `GET /codes` - List codes that are not disabled
/// - `GET /codes/:id` - Code detail with redeemers
/// - `DELETE /codes/:id` - Disable a code
///
/// ## User Endpoints
/// - `POST /codes/claim` - Redeem a code and receive library access
pub fn invite_routes() -> Router<AppState> {
    Router::new()
        .route("/codes", post(create_invite_code).get(list_invite_codes))
        .route("/codes/claim", post(claim_invite_code))
        .route("/codes/:id", get(get_invite_code).delete(disable_invite_code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::middleware;
    use tower::ServiceExt;

    use crate::adapters::http::middleware::auth_middleware;
    use crate::adapters::http::state::test_support::{
        test_state, TestState, ADMIN_TOKEN, USER_TOKEN,
    };
    use crate::domain::foundation::PlexUserId;
    use crate::ports::MediaError;

    fn router(t: &TestState) -> Router {
        invite_routes()
            .layer(middleware::from_fn_with_state(
                t.state.sessions.clone(),
                auth_middleware,
            ))
            .with_state(t.state.clone())
    }

    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
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

    async fn send(t: &TestState, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router(t).oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, json)
    }

    async fn create(t: &TestState, body: serde_json::Value) -> serde_json::Value {
        let (status, json) = send(t, request("POST", "/codes", Some(ADMIN_TOKEN), Some(body))).await;
        assert_eq!(status, StatusCode::CREATED, "{}", json);
        json["invite_code"].clone()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Admin guards
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn listing_codes_requires_admin() {
        let t = test_state();

        let (anonymous, body) = send(&t, request("GET", "/codes", None, None)).await;
        let (regular, _) = send(&t, request("GET", "/codes", Some(USER_TOKEN), None)).await;

        assert_eq!(anonymous, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error_code"], "UNAUTHENTICATED");
        assert_eq!(regular, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn regular_user_cannot_create_codes() {
        let t = test_state();

        let (status, body) = send(
            &t,
            request("POST", "/codes", Some(USER_TOKEN), Some(serde_json::json!({}))),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error_code"], "FORBIDDEN");
        assert_eq!(t.directory.code_count().await, 0);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Lifecycle
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn create_generates_code_with_defaults() {
        let t = test_state();

        let code = create(&t, serde_json::json!({})).await;

        assert_eq!(code["code"].as_str().unwrap().len(), 8);
        assert_eq!(code["entitlement_name"], "plex");
        assert_eq!(code["used_count"], 0);
        assert_eq!(code["status"], "active");
    }

    #[tokio::test]
    async fn claim_then_exhaustion() {
        let t = test_state();
        create(&t, serde_json::json!({"code": "FRIENDS", "max_uses": 1})).await;

        let (first, body) = send(
            &t,
            request("POST", "/codes/claim", Some(USER_TOKEN), Some(serde_json::json!({"code": "FRIENDS"}))),
        )
        .await;
        let (second, second_body) = send(
            &t,
            request("POST", "/codes/claim", Some(ADMIN_TOKEN), Some(serde_json::json!({"code": "FRIENDS"}))),
        )
        .await;

        assert_eq!(first, StatusCode::OK);
        assert_eq!(body["invite_code"]["used_count"], 1);
        assert_eq!(body["access"]["result"], "granted");
        assert!(t.media.has_access(PlexUserId::new(5).unwrap()));
        assert_eq!(second, StatusCode::BAD_REQUEST);
        assert_eq!(second_body["message"], "code not found");
    }

    #[tokio::test]
    async fn claim_requires_authentication() {
        let t = test_state();
        create(&t, serde_json::json!({"code": "FRIENDS"})).await;

        let (status, _) = send(
            &t,
            request("POST", "/codes/claim", None, Some(serde_json::json!({"code": "FRIENDS"}))),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(t.media.calls().is_empty());
    }

    #[tokio::test]
    async fn claim_with_plex_outage_is_502() {
        let t = test_state();
        create(&t, serde_json::json!({"code": "FRIENDS"})).await;
        t.media.fail_share(MediaError::unexpected_status(503, "down"));

        let (status, body) = send(
            &t,
            request("POST", "/codes/claim", Some(USER_TOKEN), Some(serde_json::json!({"code": "FRIENDS"}))),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error_code"], "MEDIA_PROVIDER_ERROR");
    }

    #[tokio::test]
    async fn detail_lists_redeemers() {
        let t = test_state();
        let code = create(&t, serde_json::json!({"code": "FRIENDS"})).await;
        send(
            &t,
            request("POST", "/codes/claim", Some(USER_TOKEN), Some(serde_json::json!({"code": "FRIENDS"}))),
        )
        .await;

        let uri = format!("/codes/{}", code["id"]);
        let (status, body) = send(&t, request("GET", &uri, Some(ADMIN_TOKEN), None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["users"][0]["username"], "user5");
    }

    #[tokio::test]
    async fn disable_is_idempotent_and_hides_code() {
        let t = test_state();
        let code = create(&t, serde_json::json!({"code": "FRIENDS"})).await;
        let uri = format!("/codes/{}", code["id"]);

        let (first, _) = send(&t, request("DELETE", &uri, Some(ADMIN_TOKEN), None)).await;
        let (second, _) = send(&t, request("DELETE", &uri, Some(ADMIN_TOKEN), None)).await;
        let (_, list) = send(&t, request("GET", "/codes", Some(ADMIN_TOKEN), None)).await;

        assert_eq!(first, StatusCode::OK);
        assert_eq!(second, StatusCode::OK);
        assert_eq!(list["invite_codes"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn unknown_code_id_is_404() {
        let t = test_state();

        let (get, _) = send(&t, request("GET", "/codes/999", Some(ADMIN_TOKEN), None)).await;
        let (delete, _) = send(&t, request("DELETE", "/codes/999", Some(ADMIN_TOKEN), None)).await;

        assert_eq!(get, StatusCode::NOT_FOUND);
        assert_eq!(delete, StatusCode::NOT_FOUND);
    }
}
