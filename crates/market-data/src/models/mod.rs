//! Remote response models
//!
//! This module contains the raw shapes served by the reference-data API:
//! - `lists` - One record per coin, blockchain and token (CoinResponse, BlockchainResponse, TokenResponse)
//! - `status` - Version tokens for the three lists (HsStatus)
//! - `types` - Type aliases for common identifiers

mod lists;
mod status;
mod types;

pub use lists::{BlockchainResponse, CoinResponse, TokenResponse};
pub use status::HsStatus;
pub use types::{BlockchainUid, CoinUid};
