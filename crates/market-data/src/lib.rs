//! marketkit Market Data Crate
//!
//! This crate fetches the reference lists (coins, blockchains, tokens) and
//! their version status from the remote reference-data API.
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |   CoinSyncer     |  (marketkit-core)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! | CoinDataProvider |  (trait, this crate)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |   HsProvider     |  (reqwest, JSON)
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`CoinResponse`], [`BlockchainResponse`], [`TokenResponse`] - raw list records
//! - [`HsStatus`] - version tokens for the three lists
//! - [`MarketDataError`] - fetch failures with a [`RetryClass`]

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::{MarketDataError, RetryClass};

pub use models::{
    BlockchainResponse, BlockchainUid, CoinResponse, CoinUid, HsStatus, TokenResponse,
};

pub use provider::hs::{HsProvider, DEFAULT_API_URL};
pub use provider::CoinDataProvider;
