//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountLedger, LoginService, SessionIssuer, UserDirectory};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserDirectory>,
    pub accounts: Arc<dyn AccountLedger>,
    pub login: Arc<dyn LoginService>,
    /// Resolves bearer tokens into the acting identity.
    pub sessions: Arc<dyn SessionIssuer>,
}

impl HttpState {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        accounts: Arc<dyn AccountLedger>,
        login: Arc<dyn LoginService>,
        sessions: Arc<dyn SessionIssuer>,
    ) -> Self {
        Self {
            users,
            accounts,
            login,
            sessions,
        }
    }
}
