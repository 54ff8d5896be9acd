use async_trait::async_trait;
use quiz_core::model::StatisticsRecord;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Durable home of the player's statistics.
///
/// The record is small, so it is always read and written as a whole.
#[async_trait]
pub trait StatisticsRepository: Send + Sync {
    /// Load the persisted record. Missing entries come back as zero/epoch.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read or holds malformed values.
    async fn read(&self) -> Result<StatisticsRecord, StorageError>;

    /// Persist every field of the record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn write(&self, record: &StatisticsRecord) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    statistics: Arc<Mutex<Option<StatisticsRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository with an existing record.
    #[must_use]
    pub fn with_record(record: StatisticsRecord) -> Self {
        Self {
            statistics: Arc::new(Mutex::new(Some(record))),
        }
    }
}

#[async_trait]
impl StatisticsRepository for InMemoryRepository {
    async fn read(&self) -> Result<StatisticsRecord, StorageError> {
        let guard = self
            .statistics
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone().unwrap_or_default())
    }

    async fn write(&self, record: &StatisticsRecord) -> Result<(), StorageError> {
        let mut guard = self
            .statistics
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(record.clone());
        Ok(())
    }
}

/// Repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub statistics: Arc<dyn StatisticsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let statistics: Arc<dyn StatisticsRepository> = Arc::new(InMemoryRepository::new());
        Self { statistics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::GameResult;
    use quiz_core::time::{epoch, fixed_now};

    #[tokio::test]
    async fn empty_repository_reads_defaults() {
        let repo = InMemoryRepository::new();
        let record = repo.read().await.unwrap();
        assert_eq!(record.games_played(), 0);
        assert_eq!(record.best_game().completed_at(), epoch());
    }

    #[tokio::test]
    async fn write_then_read_returns_same_record() {
        let repo = InMemoryRepository::new();
        let best = GameResult::new(8, 8, fixed_now()).unwrap();
        let record = StatisticsRecord::from_persisted(4, best, 40);
        repo.write(&record).await.unwrap();

        let clone = repo.clone();
        assert_eq!(clone.read().await.unwrap(), record);
    }
}
