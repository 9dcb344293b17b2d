/// Stable coin identifier as served by the API (e.g. "bitcoin")
pub type CoinUid = String;

/// Stable blockchain identifier as served by the API (e.g. "binance-smart-chain")
pub type BlockchainUid = String;
