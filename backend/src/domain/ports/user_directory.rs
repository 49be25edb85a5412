//! Driving port for the user directory use-cases.
//!
//! Every self-service call checks that the acting identity is the target
//! user before looking the user up, so callers cannot probe which ids exist.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::{Error, User, UserId};

use super::IdentitySource;

/// Registration payload. Fields are validated by the service.
pub struct CreateUserRequest {
    pub name: String,
    pub password: Zeroizing<String>,
}

/// Partial update; `None` leaves a field untouched.
#[derive(Default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub password: Option<Zeroizing<String>>,
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Register a user under a unique name.
    async fn create(&self, request: CreateUserRequest) -> Result<User, Error>;

    /// Fetch the acting user's own record.
    async fn get_self(&self, identity: &dyn IdentitySource, id: &UserId) -> Result<User, Error>;

    /// Rename and/or change the password of the acting user.
    async fn update_self(
        &self,
        identity: &dyn IdentitySource,
        id: &UserId,
        request: UpdateUserRequest,
    ) -> Result<User, Error>;

    /// Delete the acting user unless they still own bank accounts.
    async fn delete_self(&self, identity: &dyn IdentitySource, id: &UserId) -> Result<(), Error>;
}
