//! Shared state for the HTTP adapter.

use std::sync::Arc;

use crate::application::handlers::billing::HandleEntitlementWebhookHandler;
use crate::application::handlers::invites::{
    ClaimInviteCodeHandler, CreateInviteCodeHandler, DisableInviteCodeHandler,
    GetInviteCodeHandler, ListInviteCodesHandler, RedeemInviteCodeHandler,
};
use crate::application::handlers::users::{
    CheckAccessHandler, DeleteUserHandler, GetUserHandler, GrantAccessHandler,
    ListUserInvitesHandler, ListUsersHandler, RecordLoginHandler, RevokeAccessHandler,
    UpdateNotesHandler,
};
use crate::application::ProvisioningOrchestrator;
use crate::config::AppConfig;
use crate::domain::billing::{EntitlementInterpreter, StripeWebhookVerifier};
use crate::domain::foundation::{PlexUserId, ValidationError};
use crate::domain::invites::DEFAULT_CODE_LENGTH;
use crate::ports::{
    BillingProvider, InviteCodeRepository, MediaAccessClient, PlexTokenRepository,
    PlexUserRepository, SessionValidator,
};

/// Values the handlers need from configuration.
#[derive(Clone)]
pub struct AccessSettings {
    pub admin_user_id: PlexUserId,
    pub webhook_verifier: StripeWebhookVerifier,
    pub interpreter: EntitlementInterpreter,
    pub require_livemode: bool,
    pub default_entitlement: String,
    pub code_length: usize,
}

impl AccessSettings {
    pub fn new(
        admin_user_id: PlexUserId,
        webhook_secret: impl Into<String>,
        entitlement_name: impl Into<String>,
    ) -> Self {
        let entitlement_name = entitlement_name.into();
        Self {
            admin_user_id,
            webhook_verifier: StripeWebhookVerifier::new(webhook_secret),
            interpreter: EntitlementInterpreter::new(entitlement_name.clone()),
            require_livemode: false,
            default_entitlement: entitlement_name,
            code_length: DEFAULT_CODE_LENGTH,
        }
    }

    pub fn with_require_livemode(mut self, required: bool) -> Self {
        self.require_livemode = required;
        self
    }

    pub fn with_invite_defaults(
        mut self,
        default_entitlement: impl Into<String>,
        code_length: usize,
    ) -> Self {
        self.default_entitlement = default_entitlement.into();
        self.code_length = code_length;
        self
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ValidationError> {
        let admin_user_id = PlexUserId::new(config.plex.admin_user_id)?;
        Ok(Self::new(
            admin_user_id,
            config.stripe.webhook_secret.clone(),
            config.stripe.entitlement_name.clone(),
        )
        .with_require_livemode(config.stripe.require_livemode)
        .with_invite_defaults(
            config.invites.default_entitlement.clone(),
            config.invites.code_length,
        ))
    }
}

/// Shared application state containing all dependencies.
///
/// Cloned for each request; handlers are built on demand from the Arcs.
#[derive(Clone)]
pub struct AppState {
    pub invite_codes: Arc<dyn InviteCodeRepository>,
    pub plex_users: Arc<dyn PlexUserRepository>,
    pub plex_tokens: Arc<dyn PlexTokenRepository>,
    pub media: Arc<dyn MediaAccessClient>,
    pub billing: Arc<dyn BillingProvider>,
    pub sessions: Arc<dyn SessionValidator>,
    pub orchestrator: Arc<ProvisioningOrchestrator>,
    pub settings: Arc<AccessSettings>,
}

impl AppState {
    /// Wires every port from one access directory.
    pub fn new<D>(
        directory: Arc<D>,
        media: Arc<dyn MediaAccessClient>,
        billing: Arc<dyn BillingProvider>,
        sessions: Arc<dyn SessionValidator>,
        settings: AccessSettings,
    ) -> Self
    where
        D: InviteCodeRepository + PlexUserRepository + PlexTokenRepository + 'static,
    {
        let invite_codes: Arc<dyn InviteCodeRepository> = directory.clone();
        let plex_users: Arc<dyn PlexUserRepository> = directory.clone();
        let plex_tokens: Arc<dyn PlexTokenRepository> = directory;

        let orchestrator = Arc::new(ProvisioningOrchestrator::new(
            media.clone(),
            plex_users.clone(),
            plex_tokens.clone(),
            settings.admin_user_id,
        ));

        Self {
            invite_codes,
            plex_users,
            plex_tokens,
            media,
            billing,
            sessions,
            orchestrator,
            settings: Arc::new(settings),
        }
    }

    pub fn admin_user_id(&self) -> PlexUserId {
        self.settings.admin_user_id
    }

    // Billing

    pub fn webhook_handler(&self) -> HandleEntitlementWebhookHandler {
        HandleEntitlementWebhookHandler::new(
            self.settings.webhook_verifier.clone(),
            self.settings.interpreter.clone(),
            self.billing.clone(),
            self.orchestrator.clone(),
        )
        .with_livemode_required(self.settings.require_livemode)
    }

    // Invite codes

    pub fn create_invite_code_handler(&self) -> CreateInviteCodeHandler {
        CreateInviteCodeHandler::new(
            self.invite_codes.clone(),
            self.settings.default_entitlement.clone(),
            self.settings.code_length,
        )
    }

    pub fn list_invite_codes_handler(&self) -> ListInviteCodesHandler {
        ListInviteCodesHandler::new(self.invite_codes.clone())
    }

    pub fn get_invite_code_handler(&self) -> GetInviteCodeHandler {
        GetInviteCodeHandler::new(self.invite_codes.clone())
    }

    pub fn disable_invite_code_handler(&self) -> DisableInviteCodeHandler {
        DisableInviteCodeHandler::new(self.invite_codes.clone())
    }

    pub fn claim_invite_code_handler(&self) -> ClaimInviteCodeHandler {
        let redeem = RedeemInviteCodeHandler::new(self.invite_codes.clone(), self.plex_users.clone());
        ClaimInviteCodeHandler::new(redeem, self.orchestrator.clone())
    }

    // Users

    pub fn record_login_handler(&self) -> RecordLoginHandler {
        RecordLoginHandler::new(self.plex_users.clone(), self.plex_tokens.clone())
    }

    pub fn check_access_handler(&self) -> CheckAccessHandler {
        CheckAccessHandler::new(self.media.clone(), self.admin_user_id())
    }

    pub fn list_users_handler(&self) -> ListUsersHandler {
        ListUsersHandler::new(self.plex_users.clone(), self.media.clone(), self.admin_user_id())
    }

    pub fn get_user_handler(&self) -> GetUserHandler {
        GetUserHandler::new(self.plex_users.clone())
    }

    pub fn list_user_invites_handler(&self) -> ListUserInvitesHandler {
        ListUserInvitesHandler::new(self.plex_users.clone())
    }

    pub fn grant_access_handler(&self) -> GrantAccessHandler {
        GrantAccessHandler::new(self.orchestrator.clone())
    }

    pub fn revoke_access_handler(&self) -> RevokeAccessHandler {
        RevokeAccessHandler::new(self.orchestrator.clone())
    }

    pub fn delete_user_handler(&self) -> DeleteUserHandler {
        DeleteUserHandler::new(self.plex_users.clone(), self.orchestrator.clone())
    }

    pub fn update_notes_handler(&self) -> UpdateNotesHandler {
        UpdateNotesHandler::new(self.plex_users.clone())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! State over in-memory adapters, shared by the route tests.

    use super::*;
    use crate::adapters::auth::MockSessionValidator;
    use crate::adapters::memory::InMemoryAccessDirectory;
    use crate::adapters::plex::MockMediaAccessClient;
    use crate::adapters::stripe::MockBillingProvider;

    pub const WEBHOOK_SECRET: &str = "whsec_route_tests";
    pub const ADMIN_TOKEN: &str = "admin-token";
    pub const USER_TOKEN: &str = "user-token";
    pub const ADMIN_ID: i64 = 1;
    pub const USER_ID: i64 = 5;

    pub struct TestState {
        pub state: AppState,
        pub directory: InMemoryAccessDirectory,
        pub media: MockMediaAccessClient,
        pub billing: MockBillingProvider,
    }

    pub fn test_state() -> TestState {
        let directory = InMemoryAccessDirectory::new();
        let media = MockMediaAccessClient::new().with_account(
            format!("user{}@test.example.com", USER_ID),
            PlexUserId::new(USER_ID).unwrap(),
        );
        let billing = MockBillingProvider::new();
        let sessions = MockSessionValidator::new()
            .with_test_user(ADMIN_TOKEN, ADMIN_ID, true)
            .with_test_user(USER_TOKEN, USER_ID, false);

        let settings =
            AccessSettings::new(PlexUserId::new(ADMIN_ID).unwrap(), WEBHOOK_SECRET, "plex");
        let state = AppState::new(
            Arc::new(directory.clone()),
            Arc::new(media.clone()),
            Arc::new(billing.clone()),
            Arc::new(sessions),
            settings,
        );

        TestState {
            state,
            directory,
            media,
            billing,
        }
    }
}
