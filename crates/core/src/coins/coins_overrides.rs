//! Coins and tokens that are always merged into the synced dataset.
//!
//! These are white-label assets the remote API does not serve. The list is
//! data, not code: the bundled copy lives in `data/coin_overrides.json` and a
//! deployment can point at its own file instead.

use std::collections::HashSet;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use super::coins_model::{Coin, Token};
use crate::errors::{Error, Result};

const BUNDLED_OVERRIDES: &str = include_str!("../../data/coin_overrides.json");

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CoinOverrides {
    #[serde(default)]
    pub coins: Vec<Coin>,
    #[serde(default)]
    pub tokens: Vec<Token>,
}

impl CoinOverrides {
    /// The list shipped with the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_OVERRIDES)
    }

    /// Loads an override list from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read coin overrides {}: {}",
                path.display(),
                e
            ))
        })?;
        let overrides = Self::from_json(&raw)?;
        debug!(
            "Loaded {} override coins and {} override tokens from {}",
            overrides.coins.len(),
            overrides.tokens.len(),
            path.display()
        );
        Ok(overrides)
    }

    /// Parses and validates an override list.
    pub fn from_json(raw: &str) -> Result<Self> {
        let overrides: CoinOverrides = serde_json::from_str(raw)
            .map_err(|e| Error::Config(format!("Invalid coin overrides: {}", e)))?;
        overrides.validate()?;
        Ok(overrides)
    }

    /// Nothing to merge.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty() && self.tokens.is_empty()
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for coin in &self.coins {
            if coin.uid.trim().is_empty() {
                return Err(Error::Config("Override coin with empty uid".to_string()));
            }
            if !seen.insert(coin.uid.as_str()) {
                return Err(Error::Config(format!(
                    "Duplicate override coin uid '{}'",
                    coin.uid
                )));
            }
        }

        let mut seen_tokens = HashSet::new();
        for token in &self.tokens {
            if !seen_tokens.insert(token.key()) {
                return Err(Error::Config(format!(
                    "Duplicate override token {}/{}/{}",
                    token.coin_uid, token.blockchain_uid, token.token_type
                )));
            }
        }
        Ok(())
    }
}
