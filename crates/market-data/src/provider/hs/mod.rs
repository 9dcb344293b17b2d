//! Reference-data API provider.
//!
//! Serves the full coin, blockchain and token lists plus a status endpoint
//! carrying one version token per list. All endpoints return plain JSON arrays
//! (or an object for status) and need no pagination.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::errors::MarketDataError;
use crate::models::{BlockchainResponse, CoinResponse, HsStatus, TokenResponse};
use crate::provider::CoinDataProvider;

/// Provider ID constant
const PROVIDER_ID: &str = "HS";

/// Default API root
pub const DEFAULT_API_URL: &str = "https://api.blocksdecoded.com/v1";

/// Default HTTP request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Header carrying the optional API key
const API_KEY_HEADER: &str = "apikey";

const COINS_PATH: &str = "coins/list?fields=uid,name,code,market_cap_rank,coingecko_id";
const BLOCKCHAINS_PATH: &str = "blockchains/list";
const TOKENS_PATH: &str = "tokens/list";
const STATUS_PATH: &str = "status/updates";

/// HTTP provider for the reference-data API.
///
/// # Example
///
/// ```ignore
/// use marketkit_market_data::provider::hs::{HsProvider, DEFAULT_API_URL};
///
/// let provider = HsProvider::new(DEFAULT_API_URL, None)?;
/// let coins = provider.all_coins().await?;
/// ```
pub struct HsProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HsProvider {
    /// Create a provider with the default request timeout.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, MarketDataError> {
        Self::with_timeout(base_url, api_key, REQUEST_TIMEOUT)
    }

    /// Create a provider with an explicit request timeout.
    ///
    /// Fails if the HTTP client cannot be built (for example when the TLS
    /// backend does not initialize).
    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, MarketDataError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, MarketDataError> {
        let url = self.endpoint(path);
        debug!("GET {}", url);

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await.map_err(map_transport_error)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }
        if !status.is_success() {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {} for {}", status.as_u16(), path),
            });
        }

        let body = response.text().await.map_err(map_transport_error)?;
        decode(&body)
    }
}

/// Decode a response body, keeping the decoder message for diagnostics.
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, MarketDataError> {
    serde_json::from_str(body).map_err(|e| MarketDataError::InvalidResponse {
        provider: PROVIDER_ID.to_string(),
        message: e.to_string(),
    })
}

fn map_transport_error(error: reqwest::Error) -> MarketDataError {
    if error.is_timeout() {
        MarketDataError::Timeout {
            provider: PROVIDER_ID.to_string(),
        }
    } else {
        MarketDataError::Network(error)
    }
}

#[async_trait]
impl CoinDataProvider for HsProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn all_coins(&self) -> Result<Vec<CoinResponse>, MarketDataError> {
        self.get_json(COINS_PATH).await
    }

    async fn all_blockchains(&self) -> Result<Vec<BlockchainResponse>, MarketDataError> {
        self.get_json(BLOCKCHAINS_PATH).await
    }

    async fn all_tokens(&self) -> Result<Vec<TokenResponse>, MarketDataError> {
        self.get_json(TOKENS_PATH).await
    }

    async fn status(&self) -> Result<HsStatus, MarketDataError> {
        self.get_json(STATUS_PATH).await
    }
}
