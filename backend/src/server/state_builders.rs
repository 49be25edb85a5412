//! Assembly of the domain services behind the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::Clock;

use backend::domain::ports::UserDirectory;
use backend::domain::{AccountLedgerService, CredentialLoginService, UserDirectoryService};
use backend::inbound::http::state::HttpState;
use backend::outbound::memory::InMemoryStore;
use backend::outbound::security::{Argon2CredentialHasher, JwtSessionIssuer, JwtSettings};

/// Wire the in-memory store, Argon2 hasher, and JWT issuer into the services.
///
/// Every service shares one store so ownership checks and the deletion guard
/// see the same rows.
pub fn build_http_state(jwt: JwtSettings, clock: Arc<dyn Clock>) -> web::Data<HttpState> {
    let store = Arc::new(InMemoryStore::new());
    let hasher = Arc::new(Argon2CredentialHasher);
    let sessions = Arc::new(JwtSessionIssuer::new(jwt, clock.clone()));

    let users: Arc<dyn UserDirectory> =
        Arc::new(UserDirectoryService::new(store.clone(), hasher.clone()));
    let accounts = Arc::new(AccountLedgerService::new(store.clone(), users.clone(), clock));
    let login = Arc::new(CredentialLoginService::new(store, hasher, sessions.clone()));

    web::Data::new(HttpState::new(users, accounts, login, sessions))
}
