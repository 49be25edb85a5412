//! Driving port for bank account and transaction use-cases.
//!
//! Unlike the user directory, lookups here report a missing account before
//! checking ownership.

use async_trait::async_trait;

use crate::domain::{BankAccount, BankAccountId, Error, Transaction, TransactionId};

use super::IdentitySource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBankAccountRequest {
    pub name: String,
}

/// Partial update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateBankAccountRequest {
    pub name: Option<String>,
}

/// Raw transaction input, validated after the account checks pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyTransactionRequest {
    /// `Deposit` or `Withdrawal`, matched case-insensitively.
    pub kind: String,
    /// Amount in minor units; must be positive.
    pub amount: i64,
}

#[async_trait]
pub trait AccountLedger: Send + Sync {
    /// Open an account owned by the acting user.
    async fn create(
        &self,
        identity: &dyn IdentitySource,
        request: CreateBankAccountRequest,
    ) -> Result<BankAccount, Error>;

    /// Accounts owned by the acting user; empty for anonymous callers.
    async fn list_mine(&self, identity: &dyn IdentitySource) -> Result<Vec<BankAccount>, Error>;

    async fn get(
        &self,
        identity: &dyn IdentitySource,
        id: &BankAccountId,
    ) -> Result<BankAccount, Error>;

    async fn update(
        &self,
        identity: &dyn IdentitySource,
        id: &BankAccountId,
        request: UpdateBankAccountRequest,
    ) -> Result<BankAccount, Error>;

    /// Remove an account together with its transactions.
    async fn delete(&self, identity: &dyn IdentitySource, id: &BankAccountId)
    -> Result<(), Error>;

    /// Post a deposit or withdrawal, keeping the balance non-negative.
    async fn apply_transaction(
        &self,
        identity: &dyn IdentitySource,
        account_id: &BankAccountId,
        request: ApplyTransactionRequest,
    ) -> Result<Transaction, Error>;

    async fn list_transactions(
        &self,
        identity: &dyn IdentitySource,
        account_id: &BankAccountId,
    ) -> Result<Vec<Transaction>, Error>;

    async fn get_transaction(
        &self,
        identity: &dyn IdentitySource,
        account_id: &BankAccountId,
        transaction_id: &TransactionId,
    ) -> Result<Transaction, Error>;
}
