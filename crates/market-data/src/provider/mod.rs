//! Reference-data provider abstractions and implementations.
//!
//! This module contains:
//! - The `CoinDataProvider` trait consumed by the coin synchronizer
//! - `HsProvider`, the HTTP implementation backed by the reference-data API
//!
//! Providers only fetch and decode. Mapping raw records into stored entities,
//! merging overrides and deciding when to fetch all live in `marketkit-core`.

mod traits;

pub mod hs;

// Re-exports
pub use traits::CoinDataProvider;
