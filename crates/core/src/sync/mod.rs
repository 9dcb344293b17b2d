//! Coin sync - the synchronizer, its marker state, and record mapping.

mod coin_mapper;
mod coin_syncer;
mod commit_gate;
mod sync_state_model;
mod sync_state_traits;

pub use coin_syncer::CoinSyncer;
pub use commit_gate::CommitGate;
pub use sync_state_model::*;
pub use sync_state_traits::SyncerStateRepositoryTrait;
