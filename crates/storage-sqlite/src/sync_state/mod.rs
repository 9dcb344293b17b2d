//! SQLite storage implementation for coin sync markers.

mod model;
mod repository;

pub use model::SyncerStateDB;
pub use repository::SyncerStateRepository;

// Re-export trait from core for convenience
pub use marketkit_core::sync::SyncerStateRepositoryTrait;
