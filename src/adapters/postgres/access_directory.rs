//! PostgreSQL implementation of the access directory ports.
//!
//! One struct backs `InviteCodeRepository`, `PlexUserRepository` and
//! `PlexTokenRepository` so redemptions can touch codes and users in a
//! single transaction.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;

use crate::adapters::sql_rows::{
    db_error, map_insert_error, InviteCodeRow, PlexTokenRow, PlexUserRow, RedeemerRow,
    UserInviteRow, INVITE_CODE_COLUMNS, PLEX_USER_COLUMNS,
};
use crate::domain::foundation::{DomainError, InviteCodeId, PlexUserId, Timestamp};
use crate::domain::invites::{InviteCode, InviteRedemption, NewInviteCode, Redeemer, UserInviteDetail};
use crate::domain::users::{PlexToken, PlexUserRecord};
use crate::ports::{InviteCodeRepository, PlexTokenRepository, PlexUserRepository};

/// Embedded PostgreSQL migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations/postgres");

/// PostgreSQL-backed access directory.
#[derive(Clone)]
pub struct PostgresAccessDirectory {
    pool: PgPool,
}

impl PostgresAccessDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies pending migrations.
    pub async fn migrate(&self) -> Result<(), DomainError> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to run migrations: {}", e)))
    }
}

#[async_trait]
impl InviteCodeRepository for PostgresAccessDirectory {
    async fn save(&self, code: &NewInviteCode) -> Result<InviteCode, DomainError> {
        let now = Timestamp::now();
        let row: InviteCodeRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO invite_codes (
                code, entitlement_name, max_uses, used_count, expires_at, duration,
                is_disabled, created_at, updated_at
            ) VALUES ($1, $2, $3, 0, $4, $5, FALSE, $6, $6)
            RETURNING {}
            "#,
            INVITE_CODE_COLUMNS
        ))
        .bind(&code.code)
        .bind(&code.entitlement_name)
        .bind(code.max_uses)
        .bind(code.expires_at.map(|t| *t.as_datetime()))
        .bind(code.duration.map(|t| *t.as_datetime()))
        .bind(now.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "invite_code"))?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: InviteCodeId) -> Result<Option<InviteCode>, DomainError> {
        let row: Option<InviteCodeRow> = sqlx::query_as(&format!(
            "SELECT {} FROM invite_codes WHERE id = $1",
            INVITE_CODE_COLUMNS
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find invite code"))?;

        Ok(row.map(InviteCode::from))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<InviteCode>, DomainError> {
        let row: Option<InviteCodeRow> = sqlx::query_as(&format!(
            "SELECT {} FROM invite_codes WHERE code = $1",
            INVITE_CODE_COLUMNS
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find invite code"))?;

        Ok(row.map(InviteCode::from))
    }

    async fn list_active(&self) -> Result<Vec<InviteCode>, DomainError> {
        let rows: Vec<InviteCodeRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM invite_codes
            WHERE is_disabled = FALSE
            ORDER BY created_at DESC, id DESC
            "#,
            INVITE_CODE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list invite codes"))?;

        Ok(rows.into_iter().map(InviteCode::from).collect())
    }

    async fn disable(&self, id: InviteCodeId) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE invite_codes SET is_disabled = TRUE, updated_at = $2 WHERE id = $1",
        )
        .bind(id.value())
        .bind(Timestamp::now().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to disable invite code"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn redeem(&self, redemption: &InviteRedemption) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin redemption"))?;

        let claimed = sqlx::query(
            r#"
            UPDATE invite_codes
            SET used_count = used_count + 1, updated_at = $2
            WHERE id = $1
              AND is_disabled = FALSE
              AND (max_uses IS NULL OR used_count < max_uses)
            "#,
        )
        .bind(redemption.invite_code_id.value())
        .bind(redemption.used_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to claim invite code"))?;

        if claimed.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(db_error("Failed to roll back redemption"))?;
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO plex_user_invites (user_id, invite_code_id, used_at, expires_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, invite_code_id)
            DO UPDATE SET used_at = EXCLUDED.used_at, expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(redemption.user_id.value())
        .bind(redemption.invite_code_id.value())
        .bind(redemption.used_at.as_datetime())
        .bind(redemption.expires_at.map(|t| *t.as_datetime()))
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to record redemption"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit redemption"))?;

        Ok(true)
    }

    async fn list_redeemers(&self, id: InviteCodeId) -> Result<Vec<Redeemer>, DomainError> {
        let rows: Vec<RedeemerRow> = sqlx::query_as(
            r#"
            SELECT u.id, u.uuid, u.username, u.email, u.is_admin, u.notes,
                   u.created_at, u.updated_at,
                   i.used_at, i.expires_at AS invite_expires_at
            FROM plex_user_invites i
            JOIN plex_users u ON u.id = i.user_id
            WHERE i.invite_code_id = $1
            ORDER BY u.username ASC
            "#,
        )
        .bind(id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list redeemers"))?;

        rows.into_iter().map(Redeemer::try_from).collect()
    }
}

#[async_trait]
impl PlexUserRepository for PostgresAccessDirectory {
    async fn upsert(&self, user: &PlexUserRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO plex_users (id, uuid, username, email, is_admin, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                uuid = EXCLUDED.uuid,
                username = EXCLUDED.username,
                email = EXCLUDED.email,
                is_admin = EXCLUDED.is_admin,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(user.id.value())
        .bind(&user.uuid)
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.is_admin)
        .bind(&user.notes)
        .bind(user.created_at.as_datetime())
        .bind(user.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to upsert plex user"))?;

        Ok(())
    }

    async fn insert_if_missing(&self, user: &PlexUserRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO plex_users (id, uuid, username, email, is_admin, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(user.id.value())
        .bind(&user.uuid)
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.is_admin)
        .bind(&user.notes)
        .bind(user.created_at.as_datetime())
        .bind(user.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert plex user"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: PlexUserId) -> Result<Option<PlexUserRecord>, DomainError> {
        let row: Option<PlexUserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM plex_users WHERE id = $1",
            PLEX_USER_COLUMNS
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find plex user"))?;

        row.map(PlexUserRecord::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<PlexUserRecord>, DomainError> {
        let email = email.trim();
        if email.is_empty() {
            return Ok(None);
        }

        let row: Option<PlexUserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM plex_users WHERE LOWER(email) = LOWER($1) ORDER BY id LIMIT 1",
            PLEX_USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find plex user by email"))?;

        row.map(PlexUserRecord::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<PlexUserRecord>, DomainError> {
        let rows: Vec<PlexUserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM plex_users ORDER BY username ASC",
            PLEX_USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list plex users"))?;

        rows.into_iter().map(PlexUserRecord::try_from).collect()
    }

    async fn delete(&self, id: PlexUserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM plex_users WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete plex user"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_notes(
        &self,
        id: PlexUserId,
        notes: Option<&str>,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE plex_users SET notes = $2, updated_at = $3 WHERE id = $1")
            .bind(id.value())
            .bind(notes)
            .bind(Timestamp::now().as_datetime())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update notes"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_invites(&self, id: PlexUserId) -> Result<Vec<UserInviteDetail>, DomainError> {
        let rows: Vec<UserInviteRow> = sqlx::query_as(
            r#"
            SELECT i.id, i.user_id, i.invite_code_id, i.used_at, i.expires_at,
                   c.code, c.entitlement_name
            FROM plex_user_invites i
            JOIN invite_codes c ON c.id = i.invite_code_id
            WHERE i.user_id = $1
            ORDER BY i.used_at DESC
            "#,
        )
        .bind(id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list user invites"))?;

        rows.into_iter().map(UserInviteDetail::try_from).collect()
    }
}

#[async_trait]
impl PlexTokenRepository for PostgresAccessDirectory {
    async fn upsert(&self, token: &PlexToken) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO plex_tokens (user_id, access_token, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE SET
                access_token = EXCLUDED.access_token,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(token.user_id.value())
        .bind(token.access_token.expose_secret())
        .bind(token.created_at.as_datetime())
        .bind(token.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to upsert plex token"))?;

        Ok(())
    }

    async fn find_by_user(&self, user_id: PlexUserId) -> Result<Option<PlexToken>, DomainError> {
        let row: Option<PlexTokenRow> = sqlx::query_as(
            "SELECT user_id, access_token, created_at, updated_at FROM plex_tokens WHERE user_id = $1",
        )
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find plex token"))?;

        row.map(PlexToken::try_from).transpose()
    }
}
