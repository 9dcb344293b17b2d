//! Coin sync state models.

use serde::{Deserialize, Serialize};

/// Marker key for the last applied coins list version.
pub const KEY_COINS_LAST_SYNC_TIMESTAMP: &str = "coin-syncer-coins-last-sync-timestamp";
/// Marker key for the last applied blockchains list version.
pub const KEY_BLOCKCHAINS_LAST_SYNC_TIMESTAMP: &str =
    "coin-syncer-blockchains-last-sync-timestamp";
/// Marker key for the last applied tokens list version.
pub const KEY_TOKENS_LAST_SYNC_TIMESTAMP: &str = "coin-syncer-tokens-last-sync-timestamp";

/// A persisted key/value sync marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncMarker {
    pub key: String,
    pub value: String,
}

impl SyncMarker {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Version tokens of the three reference lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncTimestamps {
    pub coins: i64,
    pub blockchains: i64,
    pub tokens: i64,
}

impl SyncTimestamps {
    pub fn new(coins: i64, blockchains: i64, tokens: i64) -> Self {
        Self {
            coins,
            blockchains,
            tokens,
        }
    }

    /// The markers recording these versions as applied.
    pub fn to_markers(self) -> Vec<SyncMarker> {
        vec![
            SyncMarker::new(KEY_COINS_LAST_SYNC_TIMESTAMP, self.coins.to_string()),
            SyncMarker::new(
                KEY_BLOCKCHAINS_LAST_SYNC_TIMESTAMP,
                self.blockchains.to_string(),
            ),
            SyncMarker::new(KEY_TOKENS_LAST_SYNC_TIMESTAMP, self.tokens.to_string()),
        ]
    }
}

/// Stored markers, as shown in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncInfo {
    pub coins_timestamp: Option<String>,
    pub blockchains_timestamp: Option<String>,
    pub tokens_timestamp: Option<String>,
}

/// What a call to `CoinSyncer::sync` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Every stored marker already matched; nothing was fetched.
    UpToDate,
    /// The dataset was replaced and the markers saved.
    Updated {
        coins: usize,
        blockchains: usize,
        tokens: usize,
    },
    /// `stop()` was called before the result could be stored.
    Cancelled,
}
