//! Top-level router: API routes, health check and the tower-http stack.

use axum::http::HeaderValue;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{middleware, Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::ServerConfig;

use super::invites::invite_routes;
use super::middleware::auth_middleware;
use super::state::AppState;
use super::users::user_routes;
use super::webhooks::webhook_routes;

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Build the complete application router.
///
/// Every API route lives under `/api/v1`. The auth middleware runs on all
/// of them; the webhook route simply carries no bearer token.
pub fn api_router(state: AppState, server: &ServerConfig) -> Router {
    let api = Router::new()
        .merge(webhook_routes())
        .merge(invite_routes())
        .merge(user_routes())
        .layer(middleware::from_fn_with_state(
            state.sessions.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(server))
        .with_state(state)
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .into_iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::http::state::test_support::{test_state, ADMIN_TOKEN};

    async fn send(router: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
    }

    fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let t = test_state();
        let router = api_router(t.state, &ServerConfig::default());

        let (status, body) = send(router, get_request("/health", None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn api_routes_are_nested_under_v1() {
        let t = test_state();
        let router = api_router(t.state, &ServerConfig::default());

        let (nested, body) = send(router.clone(), get_request("/api/v1/user/me", Some(ADMIN_TOKEN))).await;
        let (bare, _) = send(router, get_request("/user/me", Some(ADMIN_TOKEN))).await;

        assert_eq!(nested, StatusCode::OK);
        assert_eq!(body["authenticated"], true);
        assert_eq!(bare, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_token_is_rejected_by_middleware() {
        let t = test_state();
        let router = api_router(t.state, &ServerConfig::default());

        let (status, body) = send(router, get_request("/api/v1/user/me", Some("forged"))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error_code"], "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn configured_origin_is_echoed() {
        let t = test_state();
        let server = ServerConfig {
            cors_origins: Some("https://plex.example.com".into()),
            ..ServerConfig::default()
        };
        let router = api_router(t.state, &server);

        let request = Request::builder()
            .uri("/health")
            .header("Origin", "https://plex.example.com")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "https://plex.example.com"
        );
    }
}
