use serde::{Deserialize, Serialize};

use super::types::{BlockchainUid, CoinUid};

/// One entry of `coins/list`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinResponse {
    pub uid: CoinUid,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub market_cap_rank: Option<i32>,
    #[serde(default)]
    pub coingecko_id: Option<String>,
}

/// One entry of `blockchains/list`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockchainResponse {
    pub uid: BlockchainUid,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// One entry of `tokens/list`.
///
/// Which of `address` / `symbol` carries the on-chain reference depends on
/// `token_type`: BEP-2 tokens are identified by symbol, everything else by
/// contract or mint address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub coin_uid: CoinUid,
    pub blockchain_uid: BlockchainUid,
    #[serde(rename = "type")]
    pub token_type: String,
    #[serde(default)]
    pub decimals: Option<i32>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_response_optional_fields() {
        let json = r#"[
            {"uid": "bitcoin", "name": "Bitcoin", "code": "btc", "market_cap_rank": 1, "coingecko_id": "bitcoin"},
            {"uid": "obscure", "name": "Obscure", "code": "obs"}
        ]"#;
        let coins: Vec<CoinResponse> = serde_json::from_str(json).unwrap();

        assert_eq!(coins.len(), 2);
        assert_eq!(coins[0].market_cap_rank, Some(1));
        assert_eq!(coins[0].coingecko_id.as_deref(), Some("bitcoin"));
        assert_eq!(coins[1].market_cap_rank, None);
        assert_eq!(coins[1].coingecko_id, None);
    }

    #[test]
    fn test_token_response_type_field() {
        let json = r#"{
            "coin_uid": "binancecoin",
            "blockchain_uid": "binancecoin",
            "type": "bep2",
            "decimals": 8,
            "symbol": "BNB"
        }"#;
        let token: TokenResponse = serde_json::from_str(json).unwrap();

        assert_eq!(token.token_type, "bep2");
        assert_eq!(token.decimals, Some(8));
        assert_eq!(token.address, None);
        assert_eq!(token.symbol.as_deref(), Some("BNB"));
    }

    #[test]
    fn test_blockchain_response_without_url() {
        let json = r#"{"uid": "ethereum", "name": "Ethereum"}"#;
        let blockchain: BlockchainResponse = serde_json::from_str(json).unwrap();
        assert_eq!(blockchain.url, None);
    }
}
