//! Credential hashing and session token adapters.

mod argon2_hasher;
mod jwt_session_issuer;

pub use argon2_hasher::Argon2CredentialHasher;
pub use jwt_session_issuer::{JwtSessionIssuer, JwtSettings};
