//! Port for issuing and resolving session tokens.

use crate::domain::{SessionToken, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by session issuer adapters.
    pub enum SessionIssuerError {
        /// The token could not be produced.
        Signing { message: String } => "session token signing failed: {message}",
        /// The token is malformed, tampered with, or expired.
        Rejected { message: String } => "session token rejected: {message}",
    }
}

/// Issues expiring tokens that assert a user's identity.
#[cfg_attr(test, mockall::automock)]
pub trait SessionIssuer: Send + Sync {
    fn issue(&self, user_id: &UserId) -> Result<SessionToken, SessionIssuerError>;

    /// Resolve a token back to the user it was issued for.
    fn resolve(&self, token: &str) -> Result<UserId, SessionIssuerError>;
}
