//! Wire types for the Plex APIs.
//!
//! plex.tv speaks JSON for everything except the legacy user listing on
//! clients.plex.tv, which only returns XML.

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════════
// Sharing
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/v2/shared_servers`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest<'a> {
    pub invited_email: &'a str,
    pub machine_identifier: &'a str,
    pub library_section_ids: &'a [i64],
    pub skip_friendship: bool,
    pub settings: ShareSettings,
}

/// Permissions granted with a share. Defaults are the conservative set.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareSettings {
    pub allow_sync: bool,
    pub allow_channels: bool,
    pub allow_subtitle_admin: bool,
    pub allow_tuners: i32,
    pub filter_movies: String,
    pub filter_music: String,
    pub filter_photos: String,
    pub filter_television: String,
}

/// Pending share record returned by a successful share.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedServerResponse {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub invited_id: Option<i64>,
}

/// Error envelope returned with 400 responses.
#[derive(Debug, Clone, Deserialize)]
pub struct PlexErrorResponse {
    #[serde(default)]
    pub errors: Vec<PlexErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlexErrorDetail {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Servers and accounts (JSON)
// ════════════════════════════════════════════════════════════════════════════════

/// `GET /api/v2/servers/{machineIdentifier}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerResponse {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub library_sections: Vec<LibrarySection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibrarySection {
    pub id: i64,
    #[serde(default)]
    pub title: String,
}

/// `GET /api/v2/user` for the token's owner.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountResponse {
    pub id: i64,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// User listing (XML)
// ════════════════════════════════════════════════════════════════════════════════

/// `<MediaContainer>` root of `GET /api/users`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsersContainer {
    #[serde(rename = "User", default)]
    pub users: Vec<UserEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserEntry {
    #[serde(rename = "@id")]
    pub id: i64,
    #[serde(rename = "@username", default)]
    pub username: String,
    #[serde(rename = "@email", default)]
    pub email: String,
    #[serde(rename = "Server", default)]
    pub servers: Vec<UserServerEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserServerEntry {
    #[serde(rename = "@machineIdentifier", default)]
    pub machine_identifier: String,
    #[serde(rename = "@name", default)]
    pub name: String,
}

impl UserEntry {
    /// True if this user's server list includes `machine_identifier`.
    pub fn has_server(&self, machine_identifier: &str) -> bool {
        self.servers
            .iter()
            .any(|s| s.machine_identifier == machine_identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_request_serializes_camel_case_with_conservative_settings() {
        let ids = [1, 2];
        let request = ShareRequest {
            invited_email: "viewer@example.com",
            machine_identifier: "abc123",
            library_section_ids: &ids,
            skip_friendship: true,
            settings: ShareSettings::default(),
        };

        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["invitedEmail"], "viewer@example.com");
        assert_eq!(value["librarySectionIds"], serde_json::json!([1, 2]));
        assert_eq!(value["skipFriendship"], true);
        assert_eq!(value["settings"]["allowSync"], false);
        assert_eq!(value["settings"]["allowTuners"], 0);
        assert_eq!(value["settings"]["filterTelevision"], "");
    }

    #[test]
    fn users_xml_parses_attributes_and_servers() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<MediaContainer friendlyName="myPlex" identifier="com.plexapp.plugins.myplex" size="2">
  <User id="101" title="alice" username="alice" email="alice@example.com">
    <Server id="9" machineIdentifier="abc123" name="Home" />
  </User>
  <User id="102" title="bob" username="bob" email="bob@example.com" />
</MediaContainer>"#;

        let container: UsersContainer = quick_xml::de::from_str(xml).unwrap();

        assert_eq!(container.users.len(), 2);
        assert_eq!(container.users[0].id, 101);
        assert!(container.users[0].has_server("abc123"));
        assert!(!container.users[1].has_server("abc123"));
    }

    #[test]
    fn error_response_tolerates_missing_fields() {
        let parsed: PlexErrorResponse =
            serde_json::from_str(r#"{"errors":[{"message":"User is already shared"}]}"#).unwrap();
        assert_eq!(parsed.errors[0].message, "User is already shared");
        assert!(parsed.errors[0].code.is_none());
    }
}
