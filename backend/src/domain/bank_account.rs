//! Bank account aggregate and its balance arithmetic.

use std::fmt;

use serde_json::json;

use super::identifiers::define_uuid_identifier;
use super::{Amount, DomainResult, Error, ErrorReason, TransactionKind, UserId};

define_uuid_identifier! {
    /// Stable bank account identifier.
    BankAccountId => "bank account id"
}

/// Maximum number of characters in an account name.
pub const ACCOUNT_NAME_MAX: usize = 64;

/// Validation errors raised while constructing an [`AccountName`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountNameError {
    #[error("account name must not be empty")]
    Empty,
    #[error("account name must be at most {max} characters")]
    TooLong { max: usize },
}

impl AccountNameError {
    /// Translate into the domain error returned by the services.
    pub fn into_error(self) -> Error {
        Error::validation(self.to_string())
            .with_reason(ErrorReason::InvalidAccountName)
            .with_details(json!({ "field": "name" }))
    }
}

/// Display name of a bank account, trimmed and 1 to 64 characters long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountName(String);

impl AccountName {
    pub fn new(raw: &str) -> Result<Self, AccountNameError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AccountNameError::Empty);
        }
        if trimmed.chars().count() > ACCOUNT_NAME_MAX {
            return Err(AccountNameError::TooLong {
                max: ACCOUNT_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for AccountName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-negative account balance in minor units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Balance(u64);

impl Balance {
    pub const ZERO: Self = Self(0);

    pub fn from_minor_units(value: u64) -> Self {
        Self(value)
    }

    pub fn minor_units(self) -> u64 {
        self.0
    }

    /// Balance after applying a transaction, or `None` when the result would
    /// fall below zero or exceed the representable range.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{Amount, Balance, TransactionKind};
    ///
    /// let balance = Balance::from_minor_units(100);
    /// let fifty = Amount::try_from_minor_units(50).unwrap();
    /// assert_eq!(
    ///     balance.apply(TransactionKind::Withdrawal, fifty),
    ///     Some(Balance::from_minor_units(50)),
    /// );
    /// let too_much = Amount::try_from_minor_units(150).unwrap();
    /// assert_eq!(balance.apply(TransactionKind::Withdrawal, too_much), None);
    /// ```
    #[must_use]
    pub fn apply(self, kind: TransactionKind, amount: Amount) -> Option<Self> {
        match kind {
            TransactionKind::Deposit => self.0.checked_add(amount.minor_units()),
            TransactionKind::Withdrawal => self.0.checked_sub(amount.minor_units()),
        }
        .map(Self)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Value snapshot of a bank account.
///
/// ## Invariants
/// - `owner_id` never changes after opening.
/// - `revision` starts at 1 and is bumped by the store on every committed
///   write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankAccount {
    id: BankAccountId,
    owner_id: UserId,
    name: AccountName,
    balance: Balance,
    revision: u32,
}

impl BankAccount {
    /// Open a new account with a zero balance.
    pub fn open(owner_id: UserId, name: AccountName) -> Self {
        Self {
            id: BankAccountId::random(),
            owner_id,
            name,
            balance: Balance::ZERO,
            revision: 1,
        }
    }

    /// Rebuild a snapshot from stored state.
    pub fn from_parts(
        id: BankAccountId,
        owner_id: UserId,
        name: AccountName,
        balance: Balance,
        revision: u32,
    ) -> Self {
        Self {
            id,
            owner_id,
            name,
            balance,
            revision,
        }
    }

    pub fn id(&self) -> &BankAccountId {
        &self.id
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    pub fn name(&self) -> &AccountName {
        &self.name
    }

    pub fn balance(&self) -> Balance {
        self.balance
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner_id == user
    }

    pub fn rename(&mut self, name: AccountName) {
        self.name = name;
    }

    /// Advance the revision after a committed write.
    pub fn bump_revision(&mut self) {
        self.revision = self.revision.saturating_add(1);
    }

    /// Move the balance by one transaction, leaving it untouched on failure.
    ///
    /// Withdrawals below zero fail with `InsufficientFunds`; deposits past the
    /// representable range fail with `BalanceOverflow`.
    pub fn post(&mut self, kind: TransactionKind, amount: Amount) -> DomainResult<()> {
        match self.balance.apply(kind, amount) {
            Some(balance) => {
                self.balance = balance;
                Ok(())
            }
            None => Err(match kind {
                TransactionKind::Deposit => Error::balance_overflow(&self.id),
                TransactionKind::Withdrawal => Error::insufficient_funds(&self.id),
            }),
        }
    }
}
