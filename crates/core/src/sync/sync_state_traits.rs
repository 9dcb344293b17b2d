use async_trait::async_trait;

use crate::errors::Result;

/// Key/value store for sync markers.
#[async_trait]
pub trait SyncerStateRepositoryTrait: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    async fn save(&self, key: &str, value: &str) -> Result<()>;
}
