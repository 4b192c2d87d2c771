//! Media server configuration (Plex)

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Plex configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    /// Admin account token used for share management
    pub token: String,

    /// Value sent as X-Plex-Client-Identifier
    pub client_id: String,

    /// Value sent as X-Plex-Product
    #[serde(default = "default_product_name")]
    pub product_name: String,

    /// Plex user id of the server owner; never revoked
    pub admin_user_id: i64,

    /// Machine identifier of the shared server
    pub machine_identifier: String,

    /// Library section names to share (comma-separated)
    pub shared_libraries: String,

    /// Base URL for plex.tv
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Base URL for clients.plex.tv
    #[serde(default = "default_clients_base_url")]
    pub clients_base_url: String,

    /// Timeout for outbound Plex calls in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl MediaConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Get shared library names as a vector
    pub fn shared_library_names(&self) -> Vec<String> {
        self.shared_libraries
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Validate media configuration
    ///
    /// In production both Plex base URLs must use HTTPS. Development
    /// allows plain HTTP so a local stub can stand in for plex.tv.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.token.is_empty() {
            return Err(ValidationError::MissingRequired("PLEX__TOKEN"));
        }
        if self.client_id.is_empty() {
            return Err(ValidationError::MissingRequired("PLEX__CLIENT_ID"));
        }
        if self.machine_identifier.is_empty() {
            return Err(ValidationError::MissingRequired("PLEX__MACHINE_IDENTIFIER"));
        }
        if self.admin_user_id <= 0 {
            return Err(ValidationError::InvalidAdminUserId);
        }
        if self.shared_library_names().is_empty() {
            return Err(ValidationError::NoSharedLibraries);
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }

        if *environment == Environment::Production
            && !(self.api_base_url.starts_with("https://")
                && self.clients_base_url.starts_with("https://"))
        {
            return Err(ValidationError::PlexUrlMustBeHttps);
        }

        Ok(())
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            client_id: String::new(),
            product_name: default_product_name(),
            admin_user_id: 0,
            machine_identifier: String::new(),
            shared_libraries: String::new(),
            api_base_url: default_api_base_url(),
            clients_base_url: default_clients_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_product_name() -> String {
    "plexgate".to_string()
}

fn default_api_base_url() -> String {
    "https://plex.tv".to_string()
}

fn default_clients_base_url() -> String {
    "https://clients.plex.tv".to_string()
}

fn default_request_timeout() -> u64 {
    10
}
