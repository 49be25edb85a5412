//! User directory service implementing the [`UserDirectory`] driving port.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::domain::ports::{
    CreateUserRequest, CredentialHasher, CredentialHasherError, IdentitySource,
    UpdateUserRequest, UserDirectory, UserRepository, UserRepositoryError,
};
use crate::domain::{
    Error, LoginValidationError, Password, PasswordHash, User, UserId, UserName,
    UserValidationError,
};

/// Registration and self-service over the user aggregate.
#[derive(Clone)]
pub struct UserDirectoryService<R, H> {
    users: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> UserDirectoryService<R, H> {
    /// Create a new service with the given repository and hasher.
    pub fn new(users: Arc<R>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

impl<R, H> UserDirectoryService<R, H>
where
    R: UserRepository,
    H: CredentialHasher,
{
    fn map_repository_error(err: UserRepositoryError) -> Error {
        match err {
            UserRepositoryError::Connection { message } => {
                error!(%message, "user repository unavailable");
                Error::internal(format!("user repository unavailable: {message}"))
            }
            UserRepositoryError::Query { message } => {
                error!(%message, "user repository query failed");
                Error::internal(format!("user repository error: {message}"))
            }
            UserRepositoryError::NameTaken { .. } => Error::username_unavailable(),
            UserRepositoryError::Missing { id } => {
                Error::write_conflict(format!("user {id} was removed concurrently"))
            }
            UserRepositoryError::OwnsBankAccounts { id, .. } => {
                Error::user_has_bank_account_preventing_deletion(&id)
            }
        }
    }

    fn map_hasher_error(err: CredentialHasherError) -> Error {
        error!(error = %err, "credential hasher failed");
        Error::internal(err.to_string())
    }

    /// Authorization comes before existence: a caller acting for someone else
    /// learns nothing about whether that user exists.
    fn authorize(identity: &dyn IdentitySource, id: &UserId) -> Result<(), Error> {
        match identity.current_user_id() {
            Some(actor) if actor == *id => Ok(()),
            actor => Err(Error::user_unauthorized(actor.as_ref())),
        }
    }

    async fn load(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::user_not_found(id))
    }

    async fn ensure_name_available(
        &self,
        name: &UserName,
        owner: Option<&UserId>,
    ) -> Result<(), Error> {
        let holder = self
            .users
            .find_by_name(name)
            .await
            .map_err(Self::map_repository_error)?;
        match holder {
            Some(existing) if Some(existing.id()) != owner => Err(Error::username_unavailable()),
            _ => Ok(()),
        }
    }

    fn hash_password(&self, password: &Password) -> Result<PasswordHash, Error> {
        self.hasher
            .hash(password)
            .map_err(Self::map_hasher_error)
    }
}

#[async_trait]
impl<R, H> UserDirectory for UserDirectoryService<R, H>
where
    R: UserRepository,
    H: CredentialHasher,
{
    async fn create(&self, request: CreateUserRequest) -> Result<User, Error> {
        let name = UserName::new(&request.name).map_err(UserValidationError::into_error)?;
        let password = Password::new(request.password.as_str())
            .map_err(LoginValidationError::into_error)?;
        self.ensure_name_available(&name, None).await?;

        let user = User::new(UserId::random(), name, self.hash_password(&password)?);
        self.users
            .insert(&user)
            .await
            .map_err(Self::map_repository_error)?;
        info!(user_id = %user.id(), "user registered");
        Ok(user)
    }

    async fn get_self(&self, identity: &dyn IdentitySource, id: &UserId) -> Result<User, Error> {
        Self::authorize(identity, id)?;
        self.load(id).await
    }

    async fn update_self(
        &self,
        identity: &dyn IdentitySource,
        id: &UserId,
        request: UpdateUserRequest,
    ) -> Result<User, Error> {
        Self::authorize(identity, id)?;
        let mut user = self.load(id).await?;

        if let Some(raw) = request.name.as_deref() {
            let name = UserName::new(raw).map_err(UserValidationError::into_error)?;
            if &name != user.name() {
                self.ensure_name_available(&name, Some(id)).await?;
                user.rename(name);
            }
        }
        if let Some(raw) = request.password.as_ref() {
            let password =
                Password::new(raw.as_str()).map_err(LoginValidationError::into_error)?;
            user.set_password_hash(self.hash_password(&password)?);
        }

        self.users
            .update(&user)
            .await
            .map_err(Self::map_repository_error)?;
        info!(user_id = %id, "user updated");
        Ok(user)
    }

    async fn delete_self(&self, identity: &dyn IdentitySource, id: &UserId) -> Result<(), Error> {
        Self::authorize(identity, id)?;
        let (_, account_count) = self
            .users
            .find_with_account_count(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::user_not_found(id))?;
        if account_count > 0 {
            return Err(Error::user_has_bank_account_preventing_deletion(id));
        }

        self.users
            .delete(id)
            .await
            .map_err(Self::map_repository_error)?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "user_directory_service_tests.rs"]
mod tests;
