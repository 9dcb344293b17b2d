use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use super::model::SyncerStateDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::syncer_states;
use marketkit_core::errors::Result;
use marketkit_core::sync::SyncerStateRepositoryTrait;

pub struct SyncerStateRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SyncerStateRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SyncerStateRepository { pool, writer }
    }
}

#[async_trait]
impl SyncerStateRepositoryTrait for SyncerStateRepository {
    fn get(&self, state_key: &str) -> Result<Option<String>> {
        let mut conn = get_connection(&self.pool)?;
        let value = syncer_states::table
            .find(state_key)
            .select(syncer_states::value)
            .first::<String>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(value)
    }

    async fn save(&self, state_key: &str, state_value: &str) -> Result<()> {
        let row = SyncerStateDB {
            key: state_key.to_string(),
            value: state_value.to_string(),
        };
        self.writer
            .exec(move |conn| {
                diesel::replace_into(syncer_states::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_key_is_none_and_save_overwrites() {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let pool = create_pool(&db_path.to_string_lossy()).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let repo = SyncerStateRepository::new(Arc::clone(&pool), spawn_writer((*pool).clone()));

        assert_eq!(repo.get("coin-syncer-coins-last-sync-timestamp").unwrap(), None);

        repo.save("coin-syncer-coins-last-sync-timestamp", "100")
            .await
            .unwrap();
        repo.save("coin-syncer-coins-last-sync-timestamp", "200")
            .await
            .unwrap();

        assert_eq!(
            repo.get("coin-syncer-coins-last-sync-timestamp")
                .unwrap()
                .as_deref(),
            Some("200")
        );
    }
}
