//! Plex API adapter.
//!
//! Implements the `MediaAccessClient` port against plex.tv and
//! clients.plex.tv. The admin token is used for share management; invite
//! acceptance and account lookup use the end user's own token.
//!
//! # Security
//!
//! Tokens are held as `secrecy::SecretString` and only exposed when a
//! request header is built.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};

use crate::config::MediaConfig;
use crate::domain::foundation::PlexUserId;
use crate::ports::{MediaAccessClient, MediaError, ShareResult};

use super::api_types::{
    AccountResponse, PlexErrorResponse, ServerResponse, ShareRequest, ShareSettings,
    SharedServerResponse, UsersContainer,
};

const TOKEN_HEADER: &str = "X-Plex-Token";
const CLIENT_ID_HEADER: &str = "X-Plex-Client-Identifier";
const PRODUCT_HEADER: &str = "X-Plex-Product";

/// Plex API configuration.
#[derive(Clone)]
pub struct PlexConfig {
    /// Admin account token.
    token: SecretString,
    client_id: String,
    product_name: String,
    machine_identifier: String,
    /// Library section names to share.
    libraries: Vec<String>,
    /// plex.tv base URL.
    api_base_url: String,
    /// clients.plex.tv base URL.
    clients_base_url: String,
    timeout: Duration,
}

impl PlexConfig {
    pub fn new(
        token: impl Into<String>,
        client_id: impl Into<String>,
        machine_identifier: impl Into<String>,
        libraries: Vec<String>,
    ) -> Self {
        Self {
            token: SecretString::new(token.into()),
            client_id: client_id.into(),
            product_name: "plexgate".to_string(),
            machine_identifier: machine_identifier.into(),
            libraries,
            api_base_url: "https://plex.tv".to_string(),
            clients_base_url: "https://clients.plex.tv".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Point both Plex hosts at one base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into().trim_end_matches('/').to_string();
        self.api_base_url = url.clone();
        self.clients_base_url = url;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_product_name(mut self, product_name: impl Into<String>) -> Self {
        self.product_name = product_name.into();
        self
    }
}

impl From<&MediaConfig> for PlexConfig {
    fn from(config: &MediaConfig) -> Self {
        Self {
            token: SecretString::new(config.token.clone()),
            client_id: config.client_id.clone(),
            product_name: config.product_name.clone(),
            machine_identifier: config.machine_identifier.clone(),
            libraries: config.shared_library_names(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            clients_base_url: config.clients_base_url.trim_end_matches('/').to_string(),
            timeout: config.request_timeout(),
        }
    }
}

/// reqwest-backed Plex client.
pub struct PlexMediaClient {
    config: PlexConfig,
    http_client: reqwest::Client,
}

impl PlexMediaClient {
    pub fn new(config: PlexConfig) -> Result<Self, MediaError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MediaError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Adds identification headers and the given token, asking for JSON.
    fn with_headers(&self, request: RequestBuilder, token: &SecretString) -> RequestBuilder {
        self.with_headers_accepting(request, token, "application/json")
    }

    fn with_headers_accepting(
        &self,
        request: RequestBuilder,
        token: &SecretString,
        accept: &'static str,
    ) -> RequestBuilder {
        request
            .header(TOKEN_HEADER, token.expose_secret())
            .header(CLIENT_ID_HEADER, &self.config.client_id)
            .header(PRODUCT_HEADER, &self.config.product_name)
            .header(ACCEPT, accept)
    }

    async fn send(request: RequestBuilder) -> Result<Response, MediaError> {
        request
            .send()
            .await
            .map_err(|e| MediaError::network(e.to_string()))
    }

    /// Maps a non-success response to an error, reading the body for context.
    async fn status_error(response: Response) -> MediaError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED => MediaError::invalid_credential(),
            StatusCode::BAD_REQUEST => {
                let message = serde_json::from_str::<PlexErrorResponse>(&body)
                    .ok()
                    .and_then(|e| e.errors.into_iter().next())
                    .map(|e| e.message)
                    .filter(|m| !m.is_empty())
                    .unwrap_or(body);
                MediaError::bad_request(message)
            }
            other => MediaError::unexpected_status(other.as_u16(), body),
        }
    }

    /// Looks up the account that owns `user_token`.
    pub async fn fetch_account(
        &self,
        user_token: &SecretString,
    ) -> Result<AccountResponse, MediaError> {
        let url = format!("{}/api/v2/user", self.config.api_base_url);
        let response = Self::send(self.with_headers(self.http_client.get(&url), user_token)).await?;

        if response.status() != StatusCode::OK {
            return Err(Self::status_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| MediaError::invalid_response(format!("Failed to parse account: {}", e)))
    }

    async fn fetch_users(&self) -> Result<UsersContainer, MediaError> {
        let url = format!("{}/api/users", self.config.clients_base_url);
        let request = self.with_headers_accepting(
            self.http_client.get(&url),
            &self.config.token,
            "application/xml",
        );
        let response = Self::send(request).await?;

        if response.status() != StatusCode::OK {
            return Err(Self::status_error(response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| MediaError::network(e.to_string()))?;
        quick_xml::de::from_str(&body)
            .map_err(|e| MediaError::invalid_response(format!("Failed to parse users: {}", e)))
    }
}

#[async_trait]
impl MediaAccessClient for PlexMediaClient {
    async fn share_library(&self, email: &str) -> Result<ShareResult, MediaError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(MediaError::configuration("email cannot be empty"));
        }

        let section_ids = self.resolve_sections(&self.config.libraries).await?;
        if section_ids.is_empty() {
            tracing::warn!(
                libraries = ?self.config.libraries,
                "No configured library matched a server section"
            );
        }

        let payload = ShareRequest {
            invited_email: email,
            machine_identifier: &self.config.machine_identifier,
            library_section_ids: &section_ids,
            skip_friendship: true,
            settings: ShareSettings::default(),
        };

        let url = format!("{}/api/v2/shared_servers", self.config.clients_base_url);
        let request = self
            .with_headers(self.http_client.post(&url), &self.config.token)
            .header(CONTENT_TYPE, "application/json")
            .json(&payload);
        let response = Self::send(request).await?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => {}
            StatusCode::UNAUTHORIZED => {
                tracing::warn!("Plex rejected the admin token while sharing");
                return Err(MediaError::invalid_credential());
            }
            status => {
                let error = Self::status_error(response).await;
                tracing::debug!(status = status.as_u16(), error = %error, "Share library failed");
                return Err(error);
            }
        }

        let body = response.text().await.unwrap_or_default();
        let shared: SharedServerResponse = match serde_json::from_str(&body) {
            Ok(shared) => shared,
            Err(e) => {
                tracing::warn!(error = %e, "Share succeeded but the response was unreadable");
                SharedServerResponse::default()
            }
        };

        Ok(ShareResult {
            invite_id: shared.id,
            invited_user_id: shared.invited_id.and_then(|id| PlexUserId::new(id).ok()),
        })
    }

    async fn unshare_library(&self, user_id: PlexUserId) -> Result<(), MediaError> {
        let url = format!("{}/api/v2/sharings/{}", self.config.api_base_url, user_id);
        let response =
            Self::send(self.with_headers(self.http_client.delete(&url), &self.config.token)).await?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(MediaError::unexpected_status(status.as_u16(), body))
            }
        }
    }

    async fn shared_user_ids(&self) -> Result<HashSet<PlexUserId>, MediaError> {
        let container = self.fetch_users().await?;
        Ok(container
            .users
            .iter()
            .filter(|u| u.has_server(&self.config.machine_identifier))
            .filter_map(|u| PlexUserId::new(u.id).ok())
            .collect())
    }

    async fn accept_invite(
        &self,
        user_token: &SecretString,
        invite_id: i64,
    ) -> Result<(), MediaError> {
        if invite_id <= 0 {
            return Err(MediaError::configuration("invite id must be positive"));
        }

        let url = format!(
            "{}/api/v2/shared_servers/{}/accept",
            self.config.api_base_url, invite_id
        );
        let response =
            Self::send(self.with_headers(self.http_client.post(&url), user_token)).await?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            _ => Err(Self::status_error(response).await),
        }
    }

    async fn resolve_sections(&self, names: &[String]) -> Result<Vec<i64>, MediaError> {
        let url = format!(
            "{}/api/v2/servers/{}",
            self.config.api_base_url, self.config.machine_identifier
        );
        let response =
            Self::send(self.with_headers(self.http_client.get(&url), &self.config.token)).await?;

        if response.status() != StatusCode::OK {
            return Err(Self::status_error(response).await);
        }

        let server: ServerResponse = response
            .json()
            .await
            .map_err(|e| MediaError::invalid_response(format!("Failed to parse server: {}", e)))?;

        let ids = names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .filter_map(|name| {
                let found = server
                    .library_sections
                    .iter()
                    .find(|section| section.title.eq_ignore_ascii_case(name));
                if found.is_none() {
                    tracing::debug!(library = name, "Library not found on server, skipping");
                }
                found.map(|section| section.id)
            })
            .collect();

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MediaErrorCode;
    use axum::extract::{Path, State};
    use axum::http::HeaderMap;
    use axum::routing::{delete, get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    const ADMIN_TOKEN: &str = "admin-token";

    /// Requests seen by the fake Plex server.
    #[derive(Default)]
    struct Seen {
        share_bodies: Vec<Value>,
        tokens: Vec<String>,
    }

    type Shared = Arc<Mutex<Seen>>;

    fn token_of(headers: &HeaderMap) -> String {
        headers
            .get(TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    async fn server(Path(_id): Path<String>) -> Json<Value> {
        Json(json!({
            "name": "Home",
            "librarySections": [
                {"id": 1, "title": "Movies"},
                {"id": 2, "title": "TV Shows"},
                {"id": 3, "title": "Music"}
            ]
        }))
    }

    async fn share(
        State(seen): State<Shared>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (axum::http::StatusCode, Json<Value>) {
        if token_of(&headers) != ADMIN_TOKEN {
            return (axum::http::StatusCode::UNAUTHORIZED, Json(json!({})));
        }
        let email = body["invitedEmail"].as_str().unwrap_or_default().to_string();
        seen.lock().unwrap().share_bodies.push(body);
        if email == "taken@example.com" {
            return (
                axum::http::StatusCode::BAD_REQUEST,
                Json(json!({"errors": [{"code": 1001, "message": "Already shared"}]})),
            );
        }
        (
            axum::http::StatusCode::CREATED,
            Json(json!({"id": 555, "invitedId": 101})),
        )
    }

    async fn unshare(Path(user_id): Path<i64>) -> axum::http::StatusCode {
        if user_id == 404 {
            axum::http::StatusCode::NOT_FOUND
        } else {
            axum::http::StatusCode::NO_CONTENT
        }
    }

    async fn users() -> &'static str {
        r#"<MediaContainer size="2">
  <User id="101" username="alice" email="alice@example.com"><Server machineIdentifier="abc123" name="Home"/></User>
  <User id="102" username="bob" email="bob@example.com"><Server machineIdentifier="other" name="Elsewhere"/></User>
</MediaContainer>"#
    }

    async fn accept(
        State(seen): State<Shared>,
        Path(_invite): Path<i64>,
        headers: HeaderMap,
    ) -> axum::http::StatusCode {
        seen.lock().unwrap().tokens.push(token_of(&headers));
        axum::http::StatusCode::OK
    }

    async fn account(headers: HeaderMap) -> (axum::http::StatusCode, Json<Value>) {
        if token_of(&headers) == "user-token" {
            (
                axum::http::StatusCode::OK,
                Json(json!({"id": 101, "uuid": "u-101", "username": "alice", "email": "alice@example.com"})),
            )
        } else {
            (axum::http::StatusCode::UNAUTHORIZED, Json(json!({})))
        }
    }

    async fn spawn_plex() -> (String, Shared) {
        let seen: Shared = Arc::default();
        let app = Router::new()
            .route("/api/v2/servers/:id", get(server))
            .route("/api/v2/shared_servers", post(share))
            .route("/api/v2/shared_servers/:id/accept", post(accept))
            .route("/api/v2/sharings/:id", delete(unshare))
            .route("/api/v2/user", get(account))
            .route("/api/users", get(users))
            .with_state(Arc::clone(&seen));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), seen)
    }

    fn client(base: &str, token: &str, libraries: &[&str]) -> PlexMediaClient {
        let config = PlexConfig::new(
            token,
            "plexgate-test",
            "abc123",
            libraries.iter().map(|s| s.to_string()).collect(),
        )
        .with_base_url(base);
        PlexMediaClient::new(config).unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Sections and sharing
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn resolve_sections_matches_case_insensitively_and_skips_unknown() {
        let (base, _) = spawn_plex().await;
        let client = client(&base, ADMIN_TOKEN, &[]);

        let ids = client
            .resolve_sections(&["movies".into(), "Anime".into(), "TV SHOWS".into()])
            .await
            .unwrap();

        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn share_library_sends_resolved_sections_and_returns_invite() {
        let (base, seen) = spawn_plex().await;
        let client = client(&base, ADMIN_TOKEN, &["Movies", "TV Shows"]);

        let result = client.share_library("viewer@example.com").await.unwrap();

        assert_eq!(result.invite_id, 555);
        assert_eq!(result.invited_user_id, Some(PlexUserId::new(101).unwrap()));
        let body = seen.lock().unwrap().share_bodies[0].clone();
        assert_eq!(body["librarySectionIds"], json!([1, 2]));
        assert_eq!(body["machineIdentifier"], "abc123");
        assert_eq!(body["settings"]["allowSync"], false);
    }

    #[tokio::test]
    async fn share_library_surfaces_provider_message_on_bad_request() {
        let (base, _) = spawn_plex().await;
        let client = client(&base, ADMIN_TOKEN, &["Movies"]);

        let err = client.share_library("taken@example.com").await.unwrap_err();

        assert_eq!(err.code, MediaErrorCode::BadRequest);
        assert_eq!(err.message, "Already shared");
    }

    #[tokio::test]
    async fn share_library_with_bad_token_is_invalid_credential() {
        let (base, _) = spawn_plex().await;
        let client = client(&base, "wrong", &["Movies"]);

        let err = client.share_library("viewer@example.com").await.unwrap_err();

        assert_eq!(err.code, MediaErrorCode::InvalidCredential);
    }

    #[tokio::test]
    async fn share_library_rejects_blank_email() {
        let (base, _) = spawn_plex().await;
        let client = client(&base, ADMIN_TOKEN, &["Movies"]);

        let err = client.share_library("  ").await.unwrap_err();

        assert_eq!(err.code, MediaErrorCode::Configuration);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Unshare, listing, acceptance
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn unshare_accepts_no_content_and_reports_other_statuses() {
        let (base, _) = spawn_plex().await;
        let client = client(&base, ADMIN_TOKEN, &[]);

        client.unshare_library(PlexUserId::new(101).unwrap()).await.unwrap();
        let err = client
            .unshare_library(PlexUserId::new(404).unwrap())
            .await
            .unwrap_err();

        assert_eq!(err.code, MediaErrorCode::UnexpectedStatus);
        assert_eq!(err.status, Some(404));
    }

    #[tokio::test]
    async fn user_has_access_checks_configured_server() {
        let (base, _) = spawn_plex().await;
        let client = client(&base, ADMIN_TOKEN, &[]);

        assert!(client.user_has_access(PlexUserId::new(101).unwrap()).await.unwrap());
        assert!(!client.user_has_access(PlexUserId::new(102).unwrap()).await.unwrap());
        assert!(!client.user_has_access(PlexUserId::new(999).unwrap()).await.unwrap());
    }

    #[tokio::test]
    async fn accept_invite_uses_the_user_token() {
        let (base, seen) = spawn_plex().await;
        let client = client(&base, ADMIN_TOKEN, &[]);

        client
            .accept_invite(&SecretString::new("user-token".into()), 555)
            .await
            .unwrap();

        assert_eq!(seen.lock().unwrap().tokens, vec!["user-token"]);
    }

    #[tokio::test]
    async fn fetch_account_resolves_token_owner() {
        let (base, _) = spawn_plex().await;
        let client = client(&base, ADMIN_TOKEN, &[]);

        let account = client
            .fetch_account(&SecretString::new("user-token".into()))
            .await
            .unwrap();
        let err = client
            .fetch_account(&SecretString::new("nope".into()))
            .await
            .unwrap_err();

        assert_eq!(account.id, 101);
        assert_eq!(account.username, "alice");
        assert_eq!(err.code, MediaErrorCode::InvalidCredential);
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let config = PlexConfig::new(ADMIN_TOKEN, "plexgate-test", "abc123", vec![])
            .with_base_url("http://127.0.0.1:1")
            .with_timeout(Duration::from_secs(2));
        let client = PlexMediaClient::new(config).unwrap();

        let err = client.shared_user_ids().await.unwrap_err();

        assert_eq!(err.code, MediaErrorCode::Network);
    }
}
