//! Shared table state for the in-memory adapters.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::error;

use crate::domain::{BankAccount, BankAccountId, Transaction, User, UserId};

/// Stored account plus its insertion sequence, used for stable listing order.
#[derive(Debug, Clone)]
pub(super) struct AccountRow {
    pub(super) sequence: u64,
    pub(super) account: BankAccount,
    pub(super) transactions: Vec<Transaction>,
}

#[derive(Debug, Default)]
pub(super) struct Tables {
    pub(super) users: HashMap<UserId, User>,
    pub(super) accounts: HashMap<BankAccountId, AccountRow>,
    next_sequence: u64,
}

impl Tables {
    pub(super) fn next_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);
        sequence
    }

    pub(super) fn account_count(&self, owner: &UserId) -> usize {
        self.accounts
            .values()
            .filter(|row| row.account.is_owned_by(owner))
            .count()
    }
}

/// Cloneable handle to one set of in-memory tables.
///
/// Clones share state, so one store can back both repository ports.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use backend::outbound::memory::InMemoryStore;
///
/// let store = Arc::new(InMemoryStore::new());
/// let users = Arc::clone(&store);
/// let accounts = Arc::clone(&store);
/// # let _ = (users, accounts);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

/// Raised when a previous holder panicked while holding the table lock.
#[derive(Debug, Clone, Copy)]
pub(super) struct PoisonedStore;

impl PoisonedStore {
    pub(super) const MESSAGE: &'static str = "in-memory store lock poisoned";
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn lock(&self) -> Result<MutexGuard<'_, Tables>, PoisonedStore> {
        self.tables.lock().map_err(|_| {
            error!("{}", PoisonedStore::MESSAGE);
            PoisonedStore
        })
    }
}
