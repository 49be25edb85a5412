//! Argon2id implementation of the `CredentialHasher` port.

use argon2::Argon2;
use argon2::password_hash::{
    Error as PasswordHashError, PasswordHash as EncodedHash, PasswordHasher, PasswordVerifier,
    SaltString,
};
use rand::rngs::OsRng;

use crate::domain::ports::{CredentialHasher, CredentialHasherError};
use crate::domain::{Password, PasswordHash};

/// Hashes passwords with Argon2id default parameters and a random salt.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2CredentialHasher;

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, password: &Password) -> Result<PasswordHash, CredentialHasherError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.expose().as_bytes(), &salt)
            .map(|encoded| PasswordHash::new(encoded.to_string()))
            .map_err(|err| CredentialHasherError::hash(err.to_string()))
    }

    fn verify(
        &self,
        password: &Password,
        stored: &PasswordHash,
    ) -> Result<bool, CredentialHasherError> {
        let parsed = EncodedHash::new(stored.as_str())
            .map_err(|err| CredentialHasherError::malformed_hash(err.to_string()))?;
        match Argon2::default().verify_password(password.expose().as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(err) => Err(CredentialHasherError::hash(err.to_string())),
        }
    }
}
