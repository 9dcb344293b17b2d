//! Remote record to local entity mapping.

use marketkit_market_data::{BlockchainResponse, CoinResponse, TokenResponse};

use crate::coins::{Blockchain, Coin, CoinDataset, CoinKind, CoinOverrides, Token};

pub(crate) fn coin_entity(response: CoinResponse) -> Coin {
    Coin {
        uid: response.uid,
        name: response.name,
        code: response.code.to_uppercase(),
        market_cap_rank: response.market_cap_rank,
        coingecko_id: response.coingecko_id,
        kind: CoinKind::Crypto,
    }
}

pub(crate) fn blockchain_entity(response: BlockchainResponse) -> Blockchain {
    Blockchain {
        uid: response.uid,
        name: response.name,
        url: response.url,
    }
}

pub(crate) fn token_entity(response: TokenResponse) -> Token {
    let TokenResponse {
        coin_uid,
        blockchain_uid,
        token_type,
        decimals,
        address,
        symbol,
    } = response;

    let reference = token_reference(&token_type, address, symbol);

    Token {
        coin_uid,
        blockchain_uid,
        token_type,
        decimals,
        reference,
    }
}

/// Picks the field that identifies a token on its chain.
///
/// BEP-2 assets are keyed by symbol; every other standard (EIP-20, SPL and
/// anything unknown) by address.
pub(crate) fn token_reference(
    token_type: &str,
    address: Option<String>,
    symbol: Option<String>,
) -> Option<String> {
    match token_type {
        "eip20" | "spl" => address,
        "bep2" => symbol,
        _ => address,
    }
}

/// Maps fetched lists and appends the override entries after them.
pub(crate) fn merge_with_overrides(
    coins: Vec<CoinResponse>,
    blockchains: Vec<BlockchainResponse>,
    tokens: Vec<TokenResponse>,
    overrides: &CoinOverrides,
) -> CoinDataset {
    let mut coins: Vec<Coin> = coins.into_iter().map(coin_entity).collect();
    coins.extend(overrides.coins.iter().cloned());

    let mut tokens: Vec<Token> = tokens.into_iter().map(token_entity).collect();
    tokens.extend(overrides.tokens.iter().cloned());

    CoinDataset {
        coins,
        blockchains: blockchains.into_iter().map(blockchain_entity).collect(),
        tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_response(token_type: &str) -> TokenResponse {
        TokenResponse {
            coin_uid: "coin".to_string(),
            blockchain_uid: "chain".to_string(),
            token_type: token_type.to_string(),
            decimals: Some(18),
            address: Some("0xabc".to_string()),
            symbol: Some("SYM-123".to_string()),
        }
    }

    #[test]
    fn test_coin_code_is_uppercased() {
        let coin = coin_entity(CoinResponse {
            uid: "tether".to_string(),
            name: "Tether".to_string(),
            code: "usdt".to_string(),
            market_cap_rank: Some(3),
            coingecko_id: Some("tether".to_string()),
        });

        assert_eq!(coin.code, "USDT");
        assert_eq!(coin.kind, CoinKind::Crypto);
        assert_eq!(coin.market_cap_rank, Some(3));
    }

    #[test]
    fn test_token_reference_by_type() {
        assert_eq!(
            token_entity(token_response("eip20")).reference.as_deref(),
            Some("0xabc")
        );
        assert_eq!(
            token_entity(token_response("spl")).reference.as_deref(),
            Some("0xabc")
        );
        assert_eq!(
            token_entity(token_response("bep2")).reference.as_deref(),
            Some("SYM-123")
        );
        assert_eq!(
            token_entity(token_response("something-new")).reference.as_deref(),
            Some("0xabc")
        );
    }

    #[test]
    fn test_token_reference_missing_field() {
        assert_eq!(token_reference("bep2", Some("0xabc".to_string()), None), None);
        assert_eq!(token_reference("native", None, Some("BTC".to_string())), None);
    }

    #[test]
    fn test_merge_appends_overrides_after_remote() {
        let overrides = CoinOverrides::from_json(
            r#"{
                "coins": [{"uid": "usdw", "name": "US Dollar", "code": "USDW", "kind": "currency"}],
                "tokens": [{"coin_uid": "usdw", "blockchain_uid": "binance-smart-chain",
                            "type": "eip20", "decimals": 18, "reference": "0x9bd0"}]
            }"#,
        )
        .unwrap();

        let dataset = merge_with_overrides(
            vec![CoinResponse {
                uid: "usdw".to_string(),
                name: "Remote copy".to_string(),
                code: "usdw".to_string(),
                market_cap_rank: Some(900),
                coingecko_id: None,
            }],
            vec![BlockchainResponse {
                uid: "binance-smart-chain".to_string(),
                name: "BNB Smart Chain".to_string(),
                url: None,
            }],
            vec![],
            &overrides,
        );

        assert_eq!(dataset.coins.len(), 2);
        assert_eq!(dataset.coins[0].name, "Remote copy");
        assert_eq!(dataset.coins[1].name, "US Dollar");
        assert_eq!(dataset.coins[1].kind, CoinKind::Currency);
        assert_eq!(dataset.blockchains.len(), 1);
        assert_eq!(dataset.tokens.len(), 1);
        assert_eq!(dataset.tokens[0].reference.as_deref(), Some("0x9bd0"));
    }
}
