use async_trait::async_trait;
use redis::AsyncCommands;

use super::{SnapshotStore, StoreError};

/// Redis-backed store: one string value per session key.
pub struct RedisSnapshotStore {
    client: redis::Client,
}

impl RedisSnapshotStore {
    /// Validates the URL; no connection is made until first use.
    pub fn new(url: &str) -> Result<Self, StoreError> {
        Ok(RedisSnapshotStore {
            client: redis::Client::open(url)?,
        })
    }
}

#[async_trait]
impl SnapshotStore for RedisSnapshotStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload: Option<String> = conn.get(key).await?;
        Ok(payload)
    }

    async fn write(&self, key: &str, payload: &str) -> Result<(), StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set::<_, _, ()>(key, payload).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(key).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_is_rejected_up_front() {
        assert!(RedisSnapshotStore::new("not a url").is_err());
    }

    #[test]
    fn test_valid_url_does_not_connect() {
        let store = RedisSnapshotStore::new("redis://127.0.0.1:1/").unwrap();
        assert_eq!(store.backend_name(), "redis");
    }
}
