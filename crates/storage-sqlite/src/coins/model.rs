//! Database models for the coin reference tables.

use diesel::prelude::*;
use log::warn;
use serde::{Deserialize, Serialize};

use marketkit_core::coins::{Blockchain, Coin, CoinKind, Token};

/// Database model for coins
#[derive(Queryable, Insertable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::coins)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_default_value = false)]
pub struct CoinDB {
    pub uid: String,
    pub name: String,
    pub code: String,
    pub market_cap_rank: Option<i32>,
    pub coingecko_id: Option<String>,
    pub coin_type: i32,
}

/// Database model for blockchains
#[derive(Queryable, Insertable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::blockchains)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_default_value = false)]
pub struct BlockchainDB {
    pub uid: String,
    pub name: String,
    pub url: Option<String>,
}

/// Database model for tokens
#[derive(Queryable, Insertable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::tokens)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_default_value = false)]
pub struct TokenDB {
    pub coin_uid: String,
    pub blockchain_uid: String,
    pub token_type: String,
    pub decimals: Option<i32>,
    pub reference: Option<String>,
}

impl From<Coin> for CoinDB {
    fn from(coin: Coin) -> Self {
        Self {
            uid: coin.uid,
            name: coin.name,
            code: coin.code,
            market_cap_rank: coin.market_cap_rank,
            coingecko_id: coin.coingecko_id,
            coin_type: coin.kind.as_db_value(),
        }
    }
}

impl From<CoinDB> for Coin {
    fn from(db: CoinDB) -> Self {
        let kind = CoinKind::from_db_value(db.coin_type).unwrap_or_else(|| {
            warn!(
                "Unknown coin_type {} for coin {}, reading as crypto",
                db.coin_type, db.uid
            );
            CoinKind::Crypto
        });

        Self {
            uid: db.uid,
            name: db.name,
            code: db.code,
            market_cap_rank: db.market_cap_rank,
            coingecko_id: db.coingecko_id,
            kind,
        }
    }
}

impl From<Blockchain> for BlockchainDB {
    fn from(blockchain: Blockchain) -> Self {
        Self {
            uid: blockchain.uid,
            name: blockchain.name,
            url: blockchain.url,
        }
    }
}

impl From<BlockchainDB> for Blockchain {
    fn from(db: BlockchainDB) -> Self {
        Self {
            uid: db.uid,
            name: db.name,
            url: db.url,
        }
    }
}

impl From<Token> for TokenDB {
    fn from(token: Token) -> Self {
        Self {
            coin_uid: token.coin_uid,
            blockchain_uid: token.blockchain_uid,
            token_type: token.token_type,
            decimals: token.decimals,
            reference: token.reference,
        }
    }
}

impl From<TokenDB> for Token {
    fn from(db: TokenDB) -> Self {
        Self {
            coin_uid: db.coin_uid,
            blockchain_uid: db.blockchain_uid,
            token_type: db.token_type,
            decimals: db.decimals,
            reference: db.reference,
        }
    }
}
