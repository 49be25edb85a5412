//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{User, UserId, UserName};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another user already holds the name.
        NameTaken { name: String } => "user name '{name}' is already taken",
        /// The user vanished between read and write.
        Missing { id: UserId } => "user {id} does not exist",
        /// The user still owns bank accounts.
        OwnsBankAccounts { id: UserId, count: usize } =>
            "user {id} owns {count} bank account(s)",
    }
}

/// Storage for the user aggregate.
///
/// Name uniqueness is enforced by the adapter on both insert and update so
/// that concurrent registrations cannot slip past the service's pre-check.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, failing with `NameTaken` on a name collision.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by exact (trimmed) name.
    async fn find_by_name(&self, name: &UserName) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user together with the number of bank accounts they own.
    async fn find_with_account_count(
        &self,
        id: &UserId,
    ) -> Result<Option<(User, usize)>, UserRepositoryError>;

    /// Replace a stored user, failing with `NameTaken` when the new name is
    /// held by someone else.
    async fn update(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Remove a user. The adapter re-checks account ownership atomically and
    /// fails with `OwnsBankAccounts` instead of deleting.
    async fn delete(&self, id: &UserId) -> Result<(), UserRepositoryError>;
}
