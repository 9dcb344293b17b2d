//! SQLite storage implementation for coins, blockchains and tokens.

mod model;
mod repository;

pub use model::{BlockchainDB, CoinDB, TokenDB};
pub use repository::CoinRepository;

// Re-export trait from core for convenience
pub use marketkit_core::coins::CoinStorageTrait;
