//! Coins module - reference entities, storage trait, and the override list.

mod coins_model;
mod coins_overrides;
mod coins_traits;


// Re-export the public interface
pub use coins_model::{Blockchain, Coin, CoinDataset, CoinKind, Token};
pub use coins_overrides::CoinOverrides;
pub use coins_traits::CoinStorageTrait;
