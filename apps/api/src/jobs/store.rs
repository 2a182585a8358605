//! Job state persistence.
//!
//! Production keeps job state in Redis with a TTL so status polling works
//! across restarts; tests use the in-memory store.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::status::JobState;

/// Key prefix for job state in Redis.
const KEY_PREFIX: &str = "cv_extractor:job:";

#[derive(Debug, Error)]
pub enum JobStoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn put(&self, id: Uuid, state: &JobState) -> Result<(), JobStoreError>;

    /// `None` when the id was never stored or has expired.
    async fn get(&self, id: Uuid) -> Result<Option<JobState>, JobStoreError>;
}

pub struct RedisJobStore {
    conn: ConnectionManager,
    ttl_secs: u64,
}

impl RedisJobStore {
    pub async fn connect(redis_url: &str, ttl_secs: u64) -> Result<Self, JobStoreError> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn, ttl_secs })
    }

    fn job_key(id: Uuid) -> String {
        format!("{KEY_PREFIX}{id}")
    }
}

#[async_trait]
impl JobStore for RedisJobStore {
    async fn put(&self, id: Uuid, state: &JobState) -> Result<(), JobStoreError> {
        let mut conn = self.conn.clone();
        let payload = serde_json::to_string(state)?;

        redis::cmd("SET")
            .arg(Self::job_key(id))
            .arg(payload)
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<JobState>, JobStoreError> {
        let mut conn = self.conn.clone();

        let payload: Option<String> = redis::cmd("GET")
            .arg(Self::job_key(id))
            .query_async(&mut conn)
            .await?;

        payload
            .map(|p| serde_json::from_str(&p))
            .transpose()
            .map_err(JobStoreError::from)
    }
}

#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<Uuid, JobState>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn put(&self, id: Uuid, state: &JobState) -> Result<(), JobStoreError> {
        self.jobs.write().await.insert(id, state.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<JobState>, JobStoreError> {
        Ok(self.jobs.read().await.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::FileResult;

    #[test]
    fn test_job_key_is_namespaced() {
        let id = Uuid::nil();
        assert_eq!(
            RedisJobStore::job_key(id),
            "cv_extractor:job:00000000-0000-0000-0000-000000000000"
        );
    }

    #[tokio::test]
    async fn test_in_memory_put_overwrites() {
        let store = InMemoryJobStore::new();
        let id = Uuid::new_v4();

        assert_eq!(store.get(id).await.unwrap(), None);

        store.put(id, &JobState::pending()).await.unwrap();
        assert_eq!(store.get(id).await.unwrap(), Some(JobState::pending()));

        let done = JobState::Success {
            result: FileResult::failed("File not found"),
        };
        store.put(id, &done).await.unwrap();
        assert_eq!(store.get(id).await.unwrap(), Some(done));
    }
}
