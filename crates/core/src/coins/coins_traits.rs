use async_trait::async_trait;

use super::coins_model::{Blockchain, Coin, CoinDataset, Token};
use crate::errors::Result;
use crate::sync::{CommitGate, SyncMarker};

/// Storage contract for the coin/blockchain/token tables.
///
/// The coin syncer is the only writer. Readers elsewhere in the application
/// share the same store.
#[async_trait]
pub trait CoinStorageTrait: Send + Sync {
    /// Replaces the three tables with `dataset` and saves `markers`, all or nothing.
    ///
    /// Entries are applied in order; when two entries share a key the later one wins.
    /// `gate.try_commit()` must be called inside the same transaction before it
    /// commits; when it fails nothing may be kept and its error is returned.
    async fn update(
        &self,
        dataset: CoinDataset,
        markers: Vec<SyncMarker>,
        gate: CommitGate,
    ) -> Result<()>;

    fn get_coins(&self) -> Result<Vec<Coin>>;

    fn get_blockchains(&self) -> Result<Vec<Blockchain>>;

    fn get_tokens(&self) -> Result<Vec<Token>>;

    fn coin_count(&self) -> Result<i64>;
}
