//! Domain primitives, aggregates, ports, and services.
//!
//! Purpose: hold the ownership-scoped account and ledger rules independent of
//! HTTP or storage. Services implement the driving ports in [`ports`] and
//! reach storage, hashing, and token minting through the driven ports.
//!
//! Public surface:
//! - Error / ErrorCode / ErrorReason — the closed failure taxonomy.
//! - User, BankAccount, Transaction — aggregates and their value types.
//! - UserDirectoryService, AccountLedgerService, CredentialLoginService —
//!   the use-case implementations.

pub mod account_ledger_service;
pub mod auth;
pub mod bank_account;
pub mod credential_login_service;
pub mod error;
pub(crate) mod identifiers;
pub mod ports;
pub mod trace_id;
pub mod transaction;
pub mod user;
pub mod user_directory_service;

pub use self::account_ledger_service::AccountLedgerService;
pub use self::auth::{LoginCredentials, LoginValidationError, Password, SessionToken};
pub use self::bank_account::{
    ACCOUNT_NAME_MAX, AccountName, AccountNameError, Balance, BankAccount, BankAccountId,
};
pub use self::credential_login_service::CredentialLoginService;
pub use self::error::{Error, ErrorCode, ErrorReason, ErrorValidationError};
pub use self::identifiers::IdentifierError;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::transaction::{Amount, Transaction, TransactionId, TransactionKind};
pub use self::user::{PasswordHash, USER_NAME_MAX, User, UserId, UserName, UserValidationError};
pub use self::user_directory_service::UserDirectoryService;

/// Result alias used by every domain operation.
///
/// # Examples
/// ```
/// use backend::domain::{DomainResult, Error};
///
/// fn lookup() -> DomainResult<()> {
///     Err(Error::not_found("nothing here"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
