//! Row types shared by the SQL access directory adapters.
//!
//! Both engines store the same schema, so the `FromRow` structs and their
//! conversions into domain types are written once and decoded by either
//! driver.

use chrono::{DateTime, Utc};
use secrecy::SecretString;

use crate::domain::foundation::{DomainError, ErrorCode, InviteCodeId, PlexUserId, Timestamp};
use crate::domain::invites::{InviteCode, PlexUserInvite, Redeemer, UserInviteDetail};
use crate::domain::users::{PlexToken, PlexUserRecord};

/// Columns selected for every invite code query.
pub(crate) const INVITE_CODE_COLUMNS: &str = "id, code, entitlement_name, max_uses, used_count, \
     expires_at, duration, is_disabled, created_at, updated_at";

/// Columns selected for every plex user query.
pub(crate) const PLEX_USER_COLUMNS: &str =
    "id, uuid, username, email, is_admin, notes, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct InviteCodeRow {
    pub id: i64,
    pub code: String,
    pub entitlement_name: String,
    pub max_uses: Option<i64>,
    pub used_count: i64,
    pub expires_at: Option<DateTime<Utc>>,
    pub duration: Option<DateTime<Utc>>,
    pub is_disabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InviteCodeRow> for InviteCode {
    fn from(row: InviteCodeRow) -> Self {
        InviteCode {
            id: InviteCodeId::new(row.id),
            code: row.code,
            entitlement_name: row.entitlement_name,
            max_uses: row.max_uses,
            used_count: row.used_count,
            expires_at: row.expires_at.map(Timestamp::from_datetime),
            duration: row.duration.map(Timestamp::from_datetime),
            is_disabled: row.is_disabled,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PlexUserRow {
    pub id: i64,
    pub uuid: String,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PlexUserRow> for PlexUserRecord {
    type Error = DomainError;

    fn try_from(row: PlexUserRow) -> Result<Self, Self::Error> {
        Ok(PlexUserRecord {
            id: parse_user_id(row.id)?,
            uuid: row.uuid,
            username: row.username,
            email: row.email,
            is_admin: row.is_admin,
            notes: row.notes,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct RedeemerRow {
    #[sqlx(flatten)]
    pub user: PlexUserRow,
    pub used_at: DateTime<Utc>,
    pub invite_expires_at: Option<DateTime<Utc>>,
}

impl TryFrom<RedeemerRow> for Redeemer {
    type Error = DomainError;

    fn try_from(row: RedeemerRow) -> Result<Self, Self::Error> {
        Ok(Redeemer {
            user: PlexUserRecord::try_from(row.user)?,
            used_at: Timestamp::from_datetime(row.used_at),
            expires_at: row.invite_expires_at.map(Timestamp::from_datetime),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserInviteRow {
    pub id: i64,
    pub user_id: i64,
    pub invite_code_id: i64,
    pub used_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub code: String,
    pub entitlement_name: String,
}

impl TryFrom<UserInviteRow> for UserInviteDetail {
    type Error = DomainError;

    fn try_from(row: UserInviteRow) -> Result<Self, Self::Error> {
        Ok(UserInviteDetail {
            invite: PlexUserInvite {
                id: row.id,
                user_id: parse_user_id(row.user_id)?,
                invite_code_id: InviteCodeId::new(row.invite_code_id),
                used_at: Timestamp::from_datetime(row.used_at),
                expires_at: row.expires_at.map(Timestamp::from_datetime),
            },
            code: row.code,
            entitlement_name: row.entitlement_name,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PlexTokenRow {
    pub user_id: i64,
    pub access_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PlexTokenRow> for PlexToken {
    type Error = DomainError;

    fn try_from(row: PlexTokenRow) -> Result<Self, Self::Error> {
        Ok(PlexToken {
            user_id: parse_user_id(row.user_id)?,
            access_token: SecretString::new(row.access_token),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn parse_user_id(id: i64) -> Result<PlexUserId, DomainError> {
    PlexUserId::new(id).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid plex user id in storage: {}", e),
        )
    })
}

/// Maps a sqlx failure, turning unique violations into validation errors.
pub(crate) fn map_insert_error(err: sqlx::Error, what: &str) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return DomainError::validation(what, format!("{} already exists", what));
        }
    }
    DomainError::database(format!("Failed to save {}: {}", what, err))
}

/// Returns a closure mapping any sqlx failure to a `DatabaseError`.
pub(crate) fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::database(format!("{}: {}", context, e))
}
