use std::collections::HashMap;

use async_trait::async_trait;
use quiz_core::model::StatisticsRecord;
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{entries_from_record, record_from_entries};
use crate::repository::{StatisticsRepository, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[async_trait]
impl StatisticsRepository for SqliteRepository {
    async fn read(&self) -> Result<StatisticsRecord, StorageError> {
        let rows = sqlx::query("SELECT key, value FROM statistics")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut entries = HashMap::with_capacity(rows.len());
        for row in rows {
            let key: String = row.try_get("key").map_err(ser)?;
            let value: String = row.try_get("value").map_err(ser)?;
            entries.insert(key, value);
        }

        record_from_entries(&entries)
    }

    async fn write(&self, record: &StatisticsRecord) -> Result<(), StorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        for (key, value) in entries_from_record(record) {
            sqlx::query(
                r"
                    INSERT INTO statistics (key, value)
                    VALUES (?1, ?2)
                    ON CONFLICT(key) DO UPDATE SET value = excluded.value
                ",
            )
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }
}
