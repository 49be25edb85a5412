//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call this port to exchange credentials for a session
//! token without knowing how credentials are stored or tokens are minted.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, SessionToken};

/// Domain use-case port for authentication.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify credentials and issue a session token for the user.
    ///
    /// Unknown users and wrong passwords fail with the same error.
    async fn login(&self, credentials: &LoginCredentials) -> Result<SessionToken, Error>;
}
