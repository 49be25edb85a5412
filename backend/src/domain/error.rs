//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses or any other protocol-specific envelope. Every expected failure
//! of the user directory, account ledger, and login flows is expressed as an
//! [`Error`] value returned through [`Result`]; nothing panics across a port.

use serde::Serialize;
use serde_json::Value;

use super::{BankAccountId, TraceId, TransactionId, UserId};

/// Stable machine-readable error code describing the failure category.
///
/// The taxonomy is closed: adapters can match on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The requested resource does not exist.
    NotFound,
    /// The request is malformed or violates a business rule.
    Validation,
    /// The caller is not allowed to act on the resource.
    Unauthorized,
    /// The request collides with existing or concurrently written state.
    Conflict,
    /// An unexpected error occurred inside the domain or its collaborators.
    Internal,
}

/// Catalogued failure identifiers, finer grained than [`ErrorCode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReason {
    UsernameUnavailable,
    UserNotFound,
    UserUnauthorized,
    UserHasBankAccountPreventingDeletion,
    BankAccountNotFound,
    TransactionNotFound,
    InvalidTransactionType,
    InvalidAmount,
    InsufficientFunds,
    BalanceOverflow,
    IncorrectLoginDetails,
    InvalidUserName,
    InvalidAccountName,
    InvalidPassword,
    WriteConflict,
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
/// - `trace_id` is captured from the active [`TraceId`] scope on construction.
///
/// # Examples
/// ```
/// use backend::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("missing");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert!(err.reason().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<ErrorReason>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    #[error("error message must not be empty")]
    EmptyMessage,
}

impl Error {
    /// Create a new error, panicking if validation fails.
    ///
    /// # Panics
    /// Panics when `message` is blank; all in-crate callers pass literals or
    /// formatted text that is never empty.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(value) => value,
            Err(err) => panic!("error messages must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(code: ErrorCode, message: impl Into<String>) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            reason: None,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Catalogued failure identifier, if any.
    pub fn reason(&self) -> Option<ErrorReason> {
        self.reason
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Correlation identifier for the request that produced the error.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Tag the error with a catalogued reason.
    pub fn with_reason(mut self, reason: ErrorReason) -> Self {
        self.reason = Some(reason);
        self
    }

    /// Override the correlation identifier.
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::validation("bad").with_details(json!({ "field": "name" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }
}

// Catalogue of the failures raised by the domain services.
impl Error {
    /// The requested user name belongs to another user.
    pub fn username_unavailable() -> Self {
        Self::conflict("User name is unavailable").with_reason(ErrorReason::UsernameUnavailable)
    }

    /// No user exists with the given id.
    pub fn user_not_found(id: &UserId) -> Self {
        Self::not_found(format!("User with id \"{id}\" not found"))
            .with_reason(ErrorReason::UserNotFound)
    }

    /// The acting identity may not touch the resource.
    ///
    /// `actor` is the acting identity, or `None` when the caller is anonymous.
    pub fn user_unauthorized(actor: Option<&UserId>) -> Self {
        let message = match actor {
            Some(id) => format!("User with id '{id}' is unauthorized"),
            None => "Anonymous caller is unauthorized".to_owned(),
        };
        Self::unauthorized(message).with_reason(ErrorReason::UserUnauthorized)
    }

    /// The user still owns bank accounts and cannot be deleted.
    pub fn user_has_bank_account_preventing_deletion(id: &UserId) -> Self {
        Self::conflict(format!(
            "User with id \"{id}\" owns bank accounts and cannot be deleted"
        ))
        .with_reason(ErrorReason::UserHasBankAccountPreventingDeletion)
    }

    /// No bank account exists with the given id.
    pub fn bank_account_not_found(id: &BankAccountId) -> Self {
        Self::not_found(format!("Bank account with id \"{id}\" not found"))
            .with_reason(ErrorReason::BankAccountNotFound)
    }

    /// The transaction id is not part of the account's history.
    pub fn transaction_not_found(id: &TransactionId) -> Self {
        Self::not_found(format!("Transaction with id \"{id}\" not found"))
            .with_reason(ErrorReason::TransactionNotFound)
    }

    /// The submitted transaction kind is not a known variant.
    pub fn invalid_transaction_type(kind: &str) -> Self {
        Self::validation(format!("Transaction type \"{kind}\" is invalid"))
            .with_reason(ErrorReason::InvalidTransactionType)
    }

    /// Transaction amounts must be strictly positive.
    pub fn invalid_amount(amount: i64) -> Self {
        Self::validation(format!("Transaction amount {amount} must be positive"))
            .with_reason(ErrorReason::InvalidAmount)
    }

    /// A withdrawal would take the balance below zero.
    pub fn insufficient_funds(id: &BankAccountId) -> Self {
        Self::validation(format!("Bank account with id \"{id}\" has insufficient funds"))
            .with_reason(ErrorReason::InsufficientFunds)
    }

    /// A deposit would exceed the representable balance.
    pub fn balance_overflow(id: &BankAccountId) -> Self {
        Self::validation(format!(
            "Bank account with id \"{id}\" cannot hold a larger balance"
        ))
        .with_reason(ErrorReason::BalanceOverflow)
    }

    /// Login failed. Deliberately identical for unknown users and wrong
    /// passwords.
    pub fn incorrect_login_details() -> Self {
        Self::validation("Login details provided are incorrect")
            .with_reason(ErrorReason::IncorrectLoginDetails)
    }

    /// A concurrent write was detected; nothing was committed.
    pub fn write_conflict(message: impl Into<String>) -> Self {
        Self::conflict(message).with_reason(ErrorReason::WriteConflict)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests;
