//! User aggregate: identity, unique name, and stored credential hash.

use std::fmt;

use serde_json::json;

use super::identifiers::define_uuid_identifier;
use super::{Error, ErrorReason};

define_uuid_identifier! {
    /// Stable user identifier.
    UserId => "user id"
}

/// Maximum number of characters in a user name.
pub const USER_NAME_MAX: usize = 64;

/// Validation errors raised while constructing user fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user name must not be empty")]
    EmptyName,
    #[error("user name must be at most {max} characters")]
    NameTooLong { max: usize },
}

impl UserValidationError {
    /// Translate into the domain error returned by the services.
    pub fn into_error(self) -> Error {
        Error::validation(self.to_string())
            .with_reason(ErrorReason::InvalidUserName)
            .with_details(json!({ "field": "name" }))
    }
}

/// Unique, human readable user name.
///
/// ## Invariants
/// - Leading and trailing whitespace is removed.
/// - Between 1 and [`USER_NAME_MAX`] characters once trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserName(String);

impl UserName {
    /// Validate and normalise a user name.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::UserName;
    ///
    /// let name = UserName::new("  alice ").unwrap();
    /// assert_eq!(name.as_ref(), "alice");
    /// assert!(UserName::new("   ").is_err());
    /// ```
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > USER_NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: USER_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque password hash produced by a credential hasher.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash string.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded hash as produced by the hasher.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Application user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: UserName,
    password_hash: PasswordHash,
}

impl User {
    pub fn new(id: UserId, name: UserName, password_hash: PasswordHash) -> Self {
        Self {
            id,
            name,
            password_hash,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Replace the user name.
    pub fn rename(&mut self, name: UserName) {
        self.name = name;
    }

    /// Replace the stored credential hash.
    pub fn set_password_hash(&mut self, hash: PasswordHash) {
        self.password_hash = hash;
    }
}
