//! Coin, blockchain and token domain models.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// What a coin represents.
///
/// Persisted as an integer so existing databases keep their values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CoinKind {
    #[default]
    Crypto,
    Currency, // White-label fiat stablecoins
    Share,    // Tokenized equities
}

impl CoinKind {
    /// Returns the database integer representation.
    pub const fn as_db_value(&self) -> i32 {
        match self {
            CoinKind::Crypto => 0,
            CoinKind::Currency => 1,
            CoinKind::Share => 2,
        }
    }

    /// Parses the database integer representation.
    pub const fn from_db_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(CoinKind::Crypto),
            1 => Some(CoinKind::Currency),
            2 => Some(CoinKind::Share),
            _ => None,
        }
    }
}

/// A coin as stored locally.
///
/// Two coins are the same coin when their `uid`s match, whatever the other
/// fields say.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub uid: String,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub market_cap_rank: Option<i32>,
    #[serde(default)]
    pub coingecko_id: Option<String>,
    #[serde(default)]
    pub kind: CoinKind,
}

impl PartialEq for Coin {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
    }
}

impl Eq for Coin {}

impl Hash for Coin {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uid.hash(state);
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Coin [uid: {}; name: {}; code: {}; marketCapRank: {}; coinGeckoId: {}]",
            self.uid,
            self.name,
            self.code,
            self.market_cap_rank
                .map(|r| r.to_string())
                .unwrap_or_else(|| "null".to_string()),
            self.coingecko_id.as_deref().unwrap_or("null"),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blockchain {
    pub uid: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// A coin deployed on a blockchain.
///
/// Identity is (`coin_uid`, `blockchain_uid`, `token_type`). `reference` holds
/// whatever identifies the token on that chain: a contract or mint address for
/// most standards, a symbol for BEP-2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub coin_uid: String,
    pub blockchain_uid: String,
    #[serde(rename = "type")]
    pub token_type: String,
    #[serde(default)]
    pub decimals: Option<i32>,
    #[serde(default)]
    pub reference: Option<String>,
}

impl Token {
    /// Composite key used for storage-level identity.
    pub fn key(&self) -> (&str, &str, &str) {
        (&self.coin_uid, &self.blockchain_uid, &self.token_type)
    }
}

/// The full reference dataset written by one sync cycle.
///
/// Order matters: when two entries share a key, the later one is what ends up
/// stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoinDataset {
    pub coins: Vec<Coin>,
    pub blockchains: Vec<Blockchain>,
    pub tokens: Vec<Token>,
}
