//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_ledger;
mod bank_account_repository;
mod credential_hasher;
mod identity_source;
mod login_service;
mod session_issuer;
mod user_directory;
mod user_repository;

pub use account_ledger::{
    AccountLedger, ApplyTransactionRequest, CreateBankAccountRequest, UpdateBankAccountRequest,
};
#[cfg(test)]
pub use bank_account_repository::MockBankAccountRepository;
pub use bank_account_repository::{
    AccountLedgerSnapshot, BankAccountRepository, BankAccountRepositoryError,
};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHasher, CredentialHasherError};
pub use identity_source::{FixedIdentity, IdentitySource};
pub use login_service::LoginService;
#[cfg(test)]
pub use session_issuer::MockSessionIssuer;
pub use session_issuer::{SessionIssuer, SessionIssuerError};
pub use user_directory::{CreateUserRequest, UpdateUserRequest, UserDirectory};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
