//! Account ledger service implementing the [`AccountLedger`] driving port.
//!
//! Accounts are loaded as value snapshots, mutated locally, and written back
//! with the revision that was read. A concurrent writer therefore surfaces as
//! a `Conflict` instead of a lost update.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::ports::{
    AccountLedger, AccountLedgerSnapshot, ApplyTransactionRequest, BankAccountRepository,
    BankAccountRepositoryError, CreateBankAccountRequest, IdentitySource,
    UpdateBankAccountRequest, UserDirectory,
};
use crate::domain::{
    AccountName, AccountNameError, Amount, BankAccount, BankAccountId, Error, Transaction,
    TransactionId, TransactionKind, UserId,
};

/// Owner-scoped bank account lifecycle and transaction posting.
#[derive(Clone)]
pub struct AccountLedgerService<A> {
    accounts: Arc<A>,
    directory: Arc<dyn UserDirectory>,
    clock: Arc<dyn Clock>,
}

impl<A> AccountLedgerService<A> {
    /// Create a new service.
    ///
    /// `directory` resolves the acting user when opening accounts; `clock`
    /// stamps committed transactions.
    pub fn new(
        accounts: Arc<A>,
        directory: Arc<dyn UserDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            directory,
            clock,
        }
    }
}

impl<A> AccountLedgerService<A>
where
    A: BankAccountRepository,
{
    fn map_repository_error(err: BankAccountRepositoryError) -> Error {
        match err {
            BankAccountRepositoryError::Connection { message } => {
                error!(%message, "bank account repository unavailable");
                Error::internal(format!("bank account repository unavailable: {message}"))
            }
            BankAccountRepositoryError::Query { message } => {
                error!(%message, "bank account repository query failed");
                Error::internal(format!("bank account repository error: {message}"))
            }
            BankAccountRepositoryError::RevisionMismatch { expected, actual } => {
                warn!(expected, actual, "bank account write lost a revision race");
                Error::write_conflict("bank account was modified concurrently").with_details(
                    json!({ "expectedRevision": expected, "actualRevision": actual }),
                )
            }
            BankAccountRepositoryError::Gone { id } => {
                warn!(account_id = %id, "bank account removed during write");
                Error::write_conflict(format!("bank account {id} was removed concurrently"))
            }
            BankAccountRepositoryError::UnknownOwner { owner_id } => {
                Error::user_not_found(&owner_id)
            }
        }
    }

    fn ensure_owner(identity: &dyn IdentitySource, owner: &UserId) -> Result<(), Error> {
        match identity.current_user_id() {
            Some(actor) if actor == *owner => Ok(()),
            actor => Err(Error::user_unauthorized(actor.as_ref())),
        }
    }

    fn parse_name(raw: &str) -> Result<AccountName, Error> {
        AccountName::new(raw).map_err(AccountNameError::into_error)
    }

    /// Existence first, then ownership.
    async fn load_owned(
        &self,
        identity: &dyn IdentitySource,
        id: &BankAccountId,
    ) -> Result<BankAccount, Error> {
        let account = self
            .accounts
            .find_by_id(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::bank_account_not_found(id))?;
        Self::ensure_owner(identity, account.owner_id())?;
        Ok(account)
    }

    async fn load_owned_ledger(
        &self,
        identity: &dyn IdentitySource,
        id: &BankAccountId,
    ) -> Result<AccountLedgerSnapshot, Error> {
        let snapshot = self
            .accounts
            .find_with_transactions(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::bank_account_not_found(id))?;
        Self::ensure_owner(identity, snapshot.account.owner_id())?;
        Ok(snapshot)
    }
}

#[async_trait]
impl<A> AccountLedger for AccountLedgerService<A>
where
    A: BankAccountRepository,
{
    async fn create(
        &self,
        identity: &dyn IdentitySource,
        request: CreateBankAccountRequest,
    ) -> Result<BankAccount, Error> {
        let Some(actor) = identity.current_user_id() else {
            return Err(Error::user_unauthorized(None));
        };
        let owner = self.directory.get_self(identity, &actor).await?;
        let name = Self::parse_name(&request.name)?;

        let account = BankAccount::open(*owner.id(), name);
        self.accounts
            .insert(&account)
            .await
            .map_err(Self::map_repository_error)?;
        info!(account_id = %account.id(), owner_id = %owner.id(), "bank account opened");
        Ok(account)
    }

    async fn list_mine(&self, identity: &dyn IdentitySource) -> Result<Vec<BankAccount>, Error> {
        match identity.current_user_id() {
            Some(owner) => self
                .accounts
                .list_for_owner(&owner)
                .await
                .map_err(Self::map_repository_error),
            None => Ok(Vec::new()),
        }
    }

    async fn get(
        &self,
        identity: &dyn IdentitySource,
        id: &BankAccountId,
    ) -> Result<BankAccount, Error> {
        self.load_owned(identity, id).await
    }

    async fn update(
        &self,
        identity: &dyn IdentitySource,
        id: &BankAccountId,
        request: UpdateBankAccountRequest,
    ) -> Result<BankAccount, Error> {
        let mut account = self.load_owned(identity, id).await?;
        if let Some(raw) = request.name.as_deref() {
            account.rename(Self::parse_name(raw)?);
        }

        let expected = account.revision();
        account.bump_revision();
        self.accounts
            .update(&account, expected)
            .await
            .map_err(Self::map_repository_error)?;
        info!(account_id = %id, revision = account.revision(), "bank account updated");
        Ok(account)
    }

    async fn delete(
        &self,
        identity: &dyn IdentitySource,
        id: &BankAccountId,
    ) -> Result<(), Error> {
        let account = self.load_owned(identity, id).await?;
        self.accounts
            .delete(id, account.revision())
            .await
            .map_err(Self::map_repository_error)?;
        info!(account_id = %id, "bank account closed");
        Ok(())
    }

    async fn apply_transaction(
        &self,
        identity: &dyn IdentitySource,
        account_id: &BankAccountId,
        request: ApplyTransactionRequest,
    ) -> Result<Transaction, Error> {
        let AccountLedgerSnapshot { mut account, .. } =
            self.load_owned_ledger(identity, account_id).await?;
        let kind: TransactionKind = request.kind.parse()?;
        let amount = Amount::try_from_minor_units(request.amount)?;

        let expected = account.revision();
        account.post(kind, amount)?;
        account.bump_revision();
        let transaction = Transaction::record(*account_id, kind, amount, self.clock.as_ref());
        self.accounts
            .commit_transaction(&account, &transaction, expected)
            .await
            .map_err(Self::map_repository_error)?;
        info!(
            account_id = %account_id,
            transaction_id = %transaction.id(),
            kind = %kind,
            amount = amount.minor_units(),
            balance = account.balance().minor_units(),
            "transaction committed"
        );
        Ok(transaction)
    }

    async fn list_transactions(
        &self,
        identity: &dyn IdentitySource,
        account_id: &BankAccountId,
    ) -> Result<Vec<Transaction>, Error> {
        let snapshot = self.load_owned_ledger(identity, account_id).await?;
        Ok(snapshot.transactions)
    }

    async fn get_transaction(
        &self,
        identity: &dyn IdentitySource,
        account_id: &BankAccountId,
        transaction_id: &TransactionId,
    ) -> Result<Transaction, Error> {
        let snapshot = self.load_owned_ledger(identity, account_id).await?;
        snapshot
            .transactions
            .into_iter()
            .find(|transaction| transaction.id() == transaction_id)
            .ok_or_else(|| Error::transaction_not_found(transaction_id))
    }
}

#[cfg(test)]
#[path = "account_ledger_service_tests.rs"]
mod tests;
