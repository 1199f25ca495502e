use super::schema::Database;
use super::types::StorageError;

impl Database {
    // ========================================================================
    // Key-Value Slot Operations
    // ========================================================================

    /// Get the raw value stored under `key`.
    ///
    /// # Returns
    ///
    /// The stored string, or `None` if the slot was never written.
    pub async fn get_slot(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM storage_slots WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(value,)| value))
    }

    /// Write a slot (UPSERT), overwriting any prior value.
    pub async fn set_slot(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO storage_slots (key, value, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
