//! Reference-data provider trait definitions.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{BlockchainResponse, CoinResponse, HsStatus, TokenResponse};

/// Trait for sources of the coin, blockchain and token reference lists.
///
/// The three list operations are independent: the synchronizer issues them
/// concurrently and fails the whole cycle if any one of them fails. No retry
/// or backoff belongs here.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use marketkit_market_data::provider::CoinDataProvider;
///
/// struct FixtureProvider;
///
/// #[async_trait]
/// impl CoinDataProvider for FixtureProvider {
///     fn id(&self) -> &'static str {
///         "FIXTURE"
///     }
///
///     // ... implement the list methods
/// }
/// ```
#[async_trait]
pub trait CoinDataProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs and errors.
    fn id(&self) -> &'static str;

    /// Fetch every coin known to the provider.
    async fn all_coins(&self) -> Result<Vec<CoinResponse>, MarketDataError>;

    /// Fetch every blockchain known to the provider.
    async fn all_blockchains(&self) -> Result<Vec<BlockchainResponse>, MarketDataError>;

    /// Fetch every token known to the provider.
    async fn all_tokens(&self) -> Result<Vec<TokenResponse>, MarketDataError>;

    /// Fetch the current version tokens of the three lists.
    ///
    /// The values are what callers pass to the synchronizer's `sync`.
    async fn status(&self) -> Result<HsStatus, MarketDataError>;
}
