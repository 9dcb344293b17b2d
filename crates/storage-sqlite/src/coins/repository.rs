use async_trait::async_trait;
use diesel::prelude::*;
use log::debug;
use std::sync::Arc;

use super::model::{BlockchainDB, CoinDB, TokenDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{blockchains, coins, syncer_states, tokens};
use crate::sync_state::SyncerStateDB;
use crate::utils::chunk_for_sqlite;
use marketkit_core::coins::{Blockchain, Coin, CoinDataset, CoinStorageTrait, Token};
use marketkit_core::errors::{Result, SyncError};
use marketkit_core::sync::{CommitGate, SyncMarker};

pub struct CoinRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl CoinRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    pub fn get_coin(&self, coin_uid: &str) -> Result<Option<Coin>> {
        let mut conn = get_connection(&self.pool)?;
        let coin = coins::table
            .find(coin_uid)
            .select(CoinDB::as_select())
            .first::<CoinDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(coin.map(Coin::from))
    }

    pub fn get_tokens_for_coin(&self, coin_uid: &str) -> Result<Vec<Token>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = tokens::table
            .filter(tokens::coin_uid.eq(coin_uid))
            .order((tokens::blockchain_uid.asc(), tokens::token_type.asc()))
            .select(TokenDB::as_select())
            .load::<TokenDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Token::from).collect())
    }
}

#[async_trait]
impl CoinStorageTrait for CoinRepository {
    async fn update(
        &self,
        dataset: CoinDataset,
        markers: Vec<SyncMarker>,
        gate: CommitGate,
    ) -> Result<()> {
        let coin_rows: Vec<CoinDB> = dataset.coins.into_iter().map(CoinDB::from).collect();
        let blockchain_rows: Vec<BlockchainDB> = dataset
            .blockchains
            .into_iter()
            .map(BlockchainDB::from)
            .collect();
        let token_rows: Vec<TokenDB> = dataset.tokens.into_iter().map(TokenDB::from).collect();
        let marker_rows: Vec<SyncerStateDB> =
            markers.into_iter().map(SyncerStateDB::from).collect();

        self.writer
            .exec(move |conn| {
                if gate.is_cancelled() {
                    return Err(SyncError::Cancelled.into());
                }

                diesel::delete(tokens::table)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                diesel::delete(coins::table)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                diesel::delete(blockchains::table)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                // REPLACE keeps the last row for a key, so overrides appended
                // after the remote records take precedence.
                for chunk in chunk_for_sqlite(&coin_rows) {
                    diesel::replace_into(coins::table)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                for chunk in chunk_for_sqlite(&blockchain_rows) {
                    diesel::replace_into(blockchains::table)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                for chunk in chunk_for_sqlite(&token_rows) {
                    diesel::replace_into(tokens::table)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }

                if !marker_rows.is_empty() {
                    diesel::replace_into(syncer_states::table)
                        .values(&marker_rows)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }

                // Last point where a stop can still undo the write.
                gate.try_commit()?;

                debug!(
                    "Replaced coin tables: {} coins, {} blockchains, {} tokens",
                    coin_rows.len(),
                    blockchain_rows.len(),
                    token_rows.len()
                );
                Ok(())
            })
            .await
    }

    fn get_coins(&self) -> Result<Vec<Coin>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = coins::table
            .order(coins::uid.asc())
            .select(CoinDB::as_select())
            .load::<CoinDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Coin::from).collect())
    }

    fn get_blockchains(&self) -> Result<Vec<Blockchain>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = blockchains::table
            .order(blockchains::uid.asc())
            .select(BlockchainDB::as_select())
            .load::<BlockchainDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Blockchain::from).collect())
    }

    fn get_tokens(&self) -> Result<Vec<Token>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = tokens::table
            .order((
                tokens::coin_uid.asc(),
                tokens::blockchain_uid.asc(),
                tokens::token_type.asc(),
            ))
            .select(TokenDB::as_select())
            .load::<TokenDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Token::from).collect())
    }

    fn coin_count(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        let count = coins::table
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use crate::sync_state::SyncerStateRepository;
    use marketkit_core::coins::CoinKind;
    use marketkit_core::errors::Error;
    use marketkit_core::sync::{
        SyncTimestamps, SyncerStateRepositoryTrait, KEY_COINS_LAST_SYNC_TIMESTAMP,
        KEY_TOKENS_LAST_SYNC_TIMESTAMP,
    };
    use tempfile::tempdir;
    use tokio::sync::watch;

    async fn create_test_repositories() -> (CoinRepository, SyncerStateRepository, tempfile::TempDir)
    {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let db_path_str = db_path.to_string_lossy().to_string();

        let pool = create_pool(&db_path_str).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());

        let coins = CoinRepository::new(Arc::clone(&pool), writer.clone());
        let state = SyncerStateRepository::new(Arc::clone(&pool), writer);
        (coins, state, temp_dir)
    }

    fn coin(uid: &str, name: &str, kind: CoinKind) -> Coin {
        Coin {
            uid: uid.to_string(),
            name: name.to_string(),
            code: uid.to_uppercase(),
            market_cap_rank: None,
            coingecko_id: None,
            kind,
        }
    }

    fn token(coin_uid: &str, blockchain_uid: &str, reference: Option<&str>) -> Token {
        Token {
            coin_uid: coin_uid.to_string(),
            blockchain_uid: blockchain_uid.to_string(),
            token_type: "eip20".to_string(),
            decimals: Some(18),
            reference: reference.map(str::to_string),
        }
    }

    fn dataset() -> CoinDataset {
        CoinDataset {
            coins: vec![
                coin("bitcoin", "Bitcoin", CoinKind::Crypto),
                coin("usdw", "Remote usdw", CoinKind::Crypto),
                coin("usdw", "US Dollar", CoinKind::Currency),
            ],
            blockchains: vec![Blockchain {
                uid: "ethereum".to_string(),
                name: "Ethereum".to_string(),
                url: None,
            }],
            tokens: vec![
                token("usdw", "binance-smart-chain", Some("0xremote")),
                token("usdw", "binance-smart-chain", Some("0xoverride")),
                token("tether", "ethereum", None),
            ],
        }
    }

    #[tokio::test]
    async fn test_update_replaces_tables_and_writes_markers() {
        let (repo, state, _dir) = create_test_repositories().await;

        repo.update(
            dataset(),
            SyncTimestamps::new(10, 20, 30).to_markers(),
            CommitGate::open(),
        )
        .await
        .unwrap();

        assert_eq!(repo.coin_count().unwrap(), 2);
        assert_eq!(repo.get_blockchains().unwrap().len(), 1);
        assert_eq!(repo.get_tokens().unwrap().len(), 2);
        assert_eq!(
            state.get(KEY_COINS_LAST_SYNC_TIMESTAMP).unwrap().as_deref(),
            Some("10")
        );
        assert_eq!(
            state.get(KEY_TOKENS_LAST_SYNC_TIMESTAMP).unwrap().as_deref(),
            Some("30")
        );

        // A second update drops rows missing from the new dataset.
        let smaller = CoinDataset {
            coins: vec![coin("ethereum", "Ethereum", CoinKind::Crypto)],
            blockchains: vec![],
            tokens: vec![],
        };
        repo.update(
            smaller,
            SyncTimestamps::new(11, 20, 30).to_markers(),
            CommitGate::open(),
        )
        .await
        .unwrap();

        let coins = repo.get_coins().unwrap();
        assert_eq!(coins.len(), 1);
        assert_eq!(coins[0].uid, "ethereum");
        assert!(repo.get_tokens().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_later_entry_wins_on_key_collision() {
        let (repo, _state, _dir) = create_test_repositories().await;

        repo.update(dataset(), vec![], CommitGate::open()).await.unwrap();

        let usdw = repo.get_coin("usdw").unwrap().unwrap();
        assert_eq!(usdw.name, "US Dollar");
        assert_eq!(usdw.kind, CoinKind::Currency);

        let tokens = repo.get_tokens_for_coin("usdw").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].reference.as_deref(), Some("0xoverride"));
    }

    #[tokio::test]
    async fn test_nullable_columns_store_null() {
        let (repo, _state, _dir) = create_test_repositories().await;

        repo.update(dataset(), vec![], CommitGate::open()).await.unwrap();

        let bitcoin = repo.get_coin("bitcoin").unwrap().unwrap();
        assert_eq!(bitcoin.market_cap_rank, None);
        assert_eq!(bitcoin.coingecko_id, None);

        let tether = repo.get_tokens_for_coin("tether").unwrap();
        assert_eq!(tether[0].reference, None);
        assert!(repo.get_coin("missing").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_large_dataset_spans_chunks() {
        let (repo, _state, _dir) = create_test_repositories().await;

        let coins: Vec<Coin> = (0..1234)
            .map(|i| coin(&format!("coin-{:04}", i), "Coin", CoinKind::Crypto))
            .collect();
        let dataset = CoinDataset {
            coins,
            blockchains: vec![],
            tokens: vec![],
        };

        repo.update(dataset, vec![], CommitGate::open()).await.unwrap();
        assert_eq!(repo.coin_count().unwrap(), 1234);
    }

    #[tokio::test]
    async fn test_refused_commit_rolls_back_every_table() {
        let (repo, state, _dir) = create_test_repositories().await;
        repo.update(
            dataset(),
            SyncTimestamps::new(10, 20, 30).to_markers(),
            CommitGate::open(),
        )
        .await
        .unwrap();

        // Stopped after the rows were written but before the commit.
        let (_cancel, cancel_rx) = watch::channel(false);
        let gate = CommitGate::new(cancel_rx, || false);
        let replacement = CoinDataset {
            coins: vec![coin("ethereum", "Ethereum", CoinKind::Crypto)],
            blockchains: vec![],
            tokens: vec![],
        };
        let result = repo
            .update(replacement, SyncTimestamps::new(99, 99, 99).to_markers(), gate)
            .await;

        assert!(matches!(result, Err(Error::Sync(SyncError::Cancelled))));
        assert_eq!(repo.coin_count().unwrap(), 2);
        assert!(repo.get_coin("ethereum").unwrap().is_none());
        assert_eq!(repo.get_tokens().unwrap().len(), 2);
        assert_eq!(
            state.get(KEY_COINS_LAST_SYNC_TIMESTAMP).unwrap().as_deref(),
            Some("10")
        );
    }

    #[tokio::test]
    async fn test_cancelled_gate_skips_the_write() {
        let (repo, state, _dir) = create_test_repositories().await;

        let (cancel, cancel_rx) = watch::channel(false);
        let gate = CommitGate::new(cancel_rx, || true);
        cancel.send_replace(true);

        let result = repo
            .update(dataset(), SyncTimestamps::new(1, 1, 1).to_markers(), gate)
            .await;

        assert!(matches!(result, Err(Error::Sync(SyncError::Cancelled))));
        assert_eq!(repo.coin_count().unwrap(), 0);
        assert!(state.get(KEY_COINS_LAST_SYNC_TIMESTAMP).unwrap().is_none());
    }
}
