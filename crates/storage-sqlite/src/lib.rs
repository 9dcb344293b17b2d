//! SQLite storage implementation for marketkit.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the storage traits defined in `marketkit-core` and contains:
//! - Database connection pooling and the single writer actor
//! - Diesel migrations
//! - The coin and sync-marker repositories
//! - First-run seeding from a bundled list of insert statements
//!
//! # Architecture
//!
//! This crate is the only place in the workspace where Diesel dependencies exist.
//! `core` is database-agnostic and works with traits.
//!
//! ```text
//!        core (CoinSyncer)
//!              │
//!              ▼
//!   storage-sqlite (this crate)
//!              │
//!              ▼
//!          SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod coins;
pub mod sync_state;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

pub use coins::CoinRepository;
pub use sync_state::SyncerStateRepository;

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from marketkit-core for convenience
pub use marketkit_core::errors::{DatabaseError, Error, Result};
