//! Ownership-scoped account and ledger backend.
//!
//! Hexagonal layout: [`domain`] holds the rules and ports, [`inbound`] the
//! HTTP adapter, [`outbound`] the storage and security adapters.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

pub use middleware::Trace;
