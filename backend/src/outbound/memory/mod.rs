//! In-process data store implementing the repository ports.
//!
//! All tables sit behind one mutex, so every repository call is a single
//! critical section. That gives the ledger its atomic "append transaction and
//! store balance" write and lets user deletion re-check account ownership
//! without a window for a concurrent insert.

mod bank_account_repository;
mod store;
mod user_repository;

pub use store::InMemoryStore;
