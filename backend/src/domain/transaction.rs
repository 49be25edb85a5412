//! Ledger entries applied to bank accounts.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use super::identifiers::define_uuid_identifier;
use super::{BankAccountId, DomainResult, Error};

define_uuid_identifier! {
    /// Stable transaction identifier.
    TransactionId => "transaction id"
}

/// Direction of a balance movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "Deposit",
            Self::Withdrawal => "Withdrawal",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    /// Case-insensitive parse of `Deposit` or `Withdrawal`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("deposit") {
            Ok(Self::Deposit)
        } else if trimmed.eq_ignore_ascii_case("withdrawal") {
            Ok(Self::Withdrawal)
        } else {
            Err(Error::invalid_transaction_type(s))
        }
    }
}

/// Strictly positive transaction amount in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u64);

impl Amount {
    /// Validate a signed amount received from a caller.
    ///
    /// Zero and negative values fail with `InvalidAmount`.
    pub fn try_from_minor_units(raw: i64) -> DomainResult<Self> {
        match u64::try_from(raw) {
            Ok(value) if value > 0 => Ok(Self(value)),
            _ => Err(Error::invalid_amount(raw)),
        }
    }

    pub fn minor_units(self) -> u64 {
        self.0
    }
}

/// Committed ledger entry. Transactions are append-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    id: TransactionId,
    account_id: BankAccountId,
    kind: TransactionKind,
    amount: Amount,
    created_at: DateTime<Utc>,
}

impl Transaction {
    /// Record a new entry stamped with the clock's current UTC time.
    pub fn record(
        account_id: BankAccountId,
        kind: TransactionKind,
        amount: Amount,
        clock: &dyn Clock,
    ) -> Self {
        Self {
            id: TransactionId::random(),
            account_id,
            kind,
            amount,
            created_at: clock.utc(),
        }
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn account_id(&self) -> &BankAccountId {
        &self.account_id
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
