//! Port for bank account and ledger persistence.
//!
//! Accounts and their transactions form one aggregate. Every write carries
//! the revision the caller read; adapters reject the write with
//! [`BankAccountRepositoryError::RevisionMismatch`] when the stored revision
//! has moved on. Callers bump the snapshot's revision themselves before
//! saving.

use async_trait::async_trait;

use crate::domain::{BankAccount, BankAccountId, Transaction, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by bank account repository adapters.
    pub enum BankAccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "bank account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "bank account repository query failed: {message}",
        /// Optimistic concurrency check failed.
        RevisionMismatch { expected: u32, actual: u32 } =>
            "revision mismatch: expected {expected}, found {actual}",
        /// The account was removed by a concurrent writer.
        Gone { id: BankAccountId } => "bank account {id} no longer exists",
        /// The owning user does not exist.
        UnknownOwner { owner_id: UserId } => "owner {owner_id} does not exist",
    }
}

/// Account snapshot loaded together with its full transaction history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountLedgerSnapshot {
    pub account: BankAccount,
    /// Committed transactions in commit order.
    pub transactions: Vec<Transaction>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BankAccountRepository: Send + Sync {
    /// Persist a freshly opened account.
    async fn insert(&self, account: &BankAccount) -> Result<(), BankAccountRepositoryError>;

    async fn find_by_id(
        &self,
        id: &BankAccountId,
    ) -> Result<Option<BankAccount>, BankAccountRepositoryError>;

    /// Load an account with its transactions.
    async fn find_with_transactions(
        &self,
        id: &BankAccountId,
    ) -> Result<Option<AccountLedgerSnapshot>, BankAccountRepositoryError>;

    /// Accounts owned by `owner_id`, in creation order.
    async fn list_for_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<BankAccount>, BankAccountRepositoryError>;

    /// Replace account fields if the stored revision equals `expected_revision`.
    async fn update(
        &self,
        account: &BankAccount,
        expected_revision: u32,
    ) -> Result<(), BankAccountRepositoryError>;

    /// Delete an account and all of its transactions in one step.
    async fn delete(
        &self,
        id: &BankAccountId,
        expected_revision: u32,
    ) -> Result<(), BankAccountRepositoryError>;

    /// Append `transaction` and store the account's new balance atomically.
    async fn commit_transaction(
        &self,
        account: &BankAccount,
        transaction: &Transaction,
        expected_revision: u32,
    ) -> Result<(), BankAccountRepositoryError>;
}
