//! `UserRepository` over the in-memory tables.

use async_trait::async_trait;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{User, UserId, UserName};

use super::store::{InMemoryStore, PoisonedStore};

fn map_poisoned(_: PoisonedStore) -> UserRepositoryError {
    UserRepositoryError::connection(PoisonedStore::MESSAGE)
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut tables = self.lock().map_err(map_poisoned)?;
        if tables.users.values().any(|existing| existing.name() == user.name()) {
            return Err(UserRepositoryError::name_taken(user.name().as_ref()));
        }
        if tables.users.contains_key(user.id()) {
            return Err(UserRepositoryError::query(format!(
                "user id {} already exists",
                user.id()
            )));
        }
        tables.users.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let tables = self.lock().map_err(map_poisoned)?;
        Ok(tables.users.get(id).cloned())
    }

    async fn find_by_name(&self, name: &UserName) -> Result<Option<User>, UserRepositoryError> {
        let tables = self.lock().map_err(map_poisoned)?;
        Ok(tables
            .users
            .values()
            .find(|user| user.name() == name)
            .cloned())
    }

    async fn find_with_account_count(
        &self,
        id: &UserId,
    ) -> Result<Option<(User, usize)>, UserRepositoryError> {
        let tables = self.lock().map_err(map_poisoned)?;
        Ok(tables
            .users
            .get(id)
            .map(|user| (user.clone(), tables.account_count(id))))
    }

    async fn update(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut tables = self.lock().map_err(map_poisoned)?;
        if !tables.users.contains_key(user.id()) {
            return Err(UserRepositoryError::missing(*user.id()));
        }
        let collides = tables
            .users
            .values()
            .any(|other| other.id() != user.id() && other.name() == user.name());
        if collides {
            return Err(UserRepositoryError::name_taken(user.name().as_ref()));
        }
        tables.users.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserRepositoryError> {
        let mut tables = self.lock().map_err(map_poisoned)?;
        if !tables.users.contains_key(id) {
            return Err(UserRepositoryError::missing(*id));
        }
        let count = tables.account_count(id);
        if count > 0 {
            return Err(UserRepositoryError::owns_bank_accounts(*id, count));
        }
        tables.users.remove(id);
        Ok(())
    }
}
