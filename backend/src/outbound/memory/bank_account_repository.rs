//! `BankAccountRepository` over the in-memory tables.
//!
//! Writes compare the stored revision with the caller's expected revision
//! inside the table lock, so a read-modify-write that raced another writer
//! is rejected rather than applied.

use async_trait::async_trait;

use crate::domain::ports::{
    AccountLedgerSnapshot, BankAccountRepository, BankAccountRepositoryError,
};
use crate::domain::{BankAccount, BankAccountId, Transaction, UserId};

use super::store::{AccountRow, InMemoryStore, PoisonedStore, Tables};

fn map_poisoned(_: PoisonedStore) -> BankAccountRepositoryError {
    BankAccountRepositoryError::connection(PoisonedStore::MESSAGE)
}

/// Locate the row for `id` and verify it is still at `expected_revision`.
fn checked_row<'a>(
    tables: &'a mut Tables,
    id: &BankAccountId,
    expected_revision: u32,
) -> Result<&'a mut AccountRow, BankAccountRepositoryError> {
    let row = tables
        .accounts
        .get_mut(id)
        .ok_or_else(|| BankAccountRepositoryError::gone(*id))?;
    let actual = row.account.revision();
    if actual != expected_revision {
        return Err(BankAccountRepositoryError::revision_mismatch(
            expected_revision,
            actual,
        ));
    }
    Ok(row)
}

#[async_trait]
impl BankAccountRepository for InMemoryStore {
    async fn insert(&self, account: &BankAccount) -> Result<(), BankAccountRepositoryError> {
        let mut tables = self.lock().map_err(map_poisoned)?;
        if !tables.users.contains_key(account.owner_id()) {
            return Err(BankAccountRepositoryError::unknown_owner(*account.owner_id()));
        }
        if tables.accounts.contains_key(account.id()) {
            return Err(BankAccountRepositoryError::query(format!(
                "bank account id {} already exists",
                account.id()
            )));
        }
        let sequence = tables.next_sequence();
        tables.accounts.insert(
            *account.id(),
            AccountRow {
                sequence,
                account: account.clone(),
                transactions: Vec::new(),
            },
        );
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &BankAccountId,
    ) -> Result<Option<BankAccount>, BankAccountRepositoryError> {
        let tables = self.lock().map_err(map_poisoned)?;
        Ok(tables.accounts.get(id).map(|row| row.account.clone()))
    }

    async fn find_with_transactions(
        &self,
        id: &BankAccountId,
    ) -> Result<Option<AccountLedgerSnapshot>, BankAccountRepositoryError> {
        let tables = self.lock().map_err(map_poisoned)?;
        Ok(tables.accounts.get(id).map(|row| AccountLedgerSnapshot {
            account: row.account.clone(),
            transactions: row.transactions.clone(),
        }))
    }

    async fn list_for_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<BankAccount>, BankAccountRepositoryError> {
        let tables = self.lock().map_err(map_poisoned)?;
        let mut rows: Vec<&AccountRow> = tables
            .accounts
            .values()
            .filter(|row| row.account.is_owned_by(owner_id))
            .collect();
        rows.sort_by_key(|row| row.sequence);
        Ok(rows.into_iter().map(|row| row.account.clone()).collect())
    }

    async fn update(
        &self,
        account: &BankAccount,
        expected_revision: u32,
    ) -> Result<(), BankAccountRepositoryError> {
        let mut tables = self.lock().map_err(map_poisoned)?;
        let row = checked_row(&mut tables, account.id(), expected_revision)?;
        row.account = account.clone();
        Ok(())
    }

    async fn delete(
        &self,
        id: &BankAccountId,
        expected_revision: u32,
    ) -> Result<(), BankAccountRepositoryError> {
        let mut tables = self.lock().map_err(map_poisoned)?;
        checked_row(&mut tables, id, expected_revision)?;
        tables.accounts.remove(id);
        Ok(())
    }

    async fn commit_transaction(
        &self,
        account: &BankAccount,
        transaction: &Transaction,
        expected_revision: u32,
    ) -> Result<(), BankAccountRepositoryError> {
        if transaction.account_id() != account.id() {
            return Err(BankAccountRepositoryError::query(format!(
                "transaction {} does not belong to bank account {}",
                transaction.id(),
                account.id()
            )));
        }
        let mut tables = self.lock().map_err(map_poisoned)?;
        let row = checked_row(&mut tables, account.id(), expected_revision)?;
        row.account = account.clone();
        row.transactions.push(transaction.clone());
        Ok(())
    }
}
