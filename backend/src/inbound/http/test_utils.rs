//! Test helpers for inbound HTTP components.
//!
//! [`StubPorts::default`] wires the real domain services over an in-memory
//! store, with a plaintext hasher and a readable token format so handler
//! tests stay fast and deterministic.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use mockable::DefaultClock;

use crate::domain::ports::{
    AccountLedger, CredentialHasher, CredentialHasherError, LoginService, SessionIssuer,
    SessionIssuerError, UserDirectory,
};
use crate::domain::{
    AccountLedgerService, CredentialLoginService, Password, PasswordHash, SessionToken, UserId,
    UserDirectoryService,
};
use crate::outbound::memory::InMemoryStore;

use super::state::HttpState;

const PLAIN_PREFIX: &str = "plain$";
const TOKEN_PREFIX: &str = "user:";

/// Stores passwords with a marker prefix instead of hashing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainHasher;

impl CredentialHasher for PlainHasher {
    fn hash(&self, password: &Password) -> Result<PasswordHash, CredentialHasherError> {
        Ok(PasswordHash::new(format!("{PLAIN_PREFIX}{}", password.expose())))
    }

    fn verify(
        &self,
        password: &Password,
        hash: &PasswordHash,
    ) -> Result<bool, CredentialHasherError> {
        hash.as_str()
            .strip_prefix(PLAIN_PREFIX)
            .map(|stored| stored == password.expose())
            .ok_or_else(|| CredentialHasherError::malformed_hash("missing plain prefix"))
    }
}

/// Issues `user:<id>` tokens that never expire within a test run.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReadableTokens;

impl ReadableTokens {
    pub fn token_for(user_id: &UserId) -> String {
        format!("{TOKEN_PREFIX}{user_id}")
    }
}

impl SessionIssuer for ReadableTokens {
    fn issue(&self, user_id: &UserId) -> Result<SessionToken, SessionIssuerError> {
        Ok(SessionToken::new(
            Self::token_for(user_id),
            Utc::now() + TimeDelta::hours(1),
        ))
    }

    fn resolve(&self, token: &str) -> Result<UserId, SessionIssuerError> {
        token
            .strip_prefix(TOKEN_PREFIX)
            .and_then(|raw| UserId::new(raw).ok())
            .ok_or_else(|| SessionIssuerError::rejected("unreadable token"))
    }
}

/// Port bundle used to assemble an [`HttpState`] in tests.
pub struct StubPorts {
    pub users: Arc<dyn UserDirectory>,
    pub accounts: Arc<dyn AccountLedger>,
    pub login: Arc<dyn LoginService>,
    pub sessions: Arc<dyn SessionIssuer>,
}

impl Default for StubPorts {
    fn default() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let hasher = Arc::new(PlainHasher);
        let tokens = Arc::new(ReadableTokens);
        let users: Arc<dyn UserDirectory> =
            Arc::new(UserDirectoryService::new(store.clone(), hasher.clone()));
        Self {
            accounts: Arc::new(AccountLedgerService::new(
                store.clone(),
                users.clone(),
                Arc::new(DefaultClock),
            )),
            login: Arc::new(CredentialLoginService::new(store, hasher, tokens.clone())),
            users,
            sessions: tokens,
        }
    }
}

pub fn http_state(ports: StubPorts) -> HttpState {
    HttpState::new(ports.users, ports.accounts, ports.login, ports.sessions)
}

/// `Authorization` header value for the given user.
pub fn bearer(user_id: &UserId) -> String {
    format!("Bearer {}", ReadableTokens::token_for(user_id))
}

/// App wiring the API routes over the given state, as the server does.
pub fn test_app(
    state: HttpState,
) -> actix_web::App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    actix_web::App::new()
        .app_data(actix_web::web::Data::new(state))
        .app_data(super::json_config())
        .service(actix_web::web::scope(super::API_PREFIX).configure(super::configure))
}
