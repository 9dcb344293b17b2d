//! marketkit Core - Coin reference data models, sync logic, and traits.
//!
//! This crate holds the coin synchronizer and the domain types it works on.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod coins;
pub mod errors;
pub mod events;
pub mod sync;

pub use coins::{Blockchain, Coin, CoinDataset, CoinKind, CoinOverrides, Token};
pub use sync::{CoinSyncer, SyncInfo, SyncOutcome};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
