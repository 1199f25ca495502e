use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;
use std::time::Duration;

use super::types::{is_lock_message, StorageError};

// ============================================================================
// Database
// ============================================================================

#[derive(Clone)]
pub struct Database {
    pub(crate) pool: SqlitePool,
}

impl Database {
    /// Open a database connection and run migrations.
    ///
    /// Pass `":memory:"` for an ephemeral database.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InstanceLocked` if another process holds the
    /// database lock (SQLITE_BUSY, SQLITE_LOCKED, SQLITE_CANTOPEN), and
    /// `StorageError::Migration` if the schema could not be created.
    pub async fn open(path: &str) -> Result<Self, StorageError> {
        let url = format!("sqlite:{}?mode=rwc", path);

        // Create the file with owner-only permissions before SQLite touches it,
        // so there is no window with default umask permissions.
        #[cfg(unix)]
        if path != ":memory:" {
            use std::os::unix::fs::PermissionsExt;
            let db_path = std::path::Path::new(path);
            if db_path.exists() {
                let perms = std::fs::Permissions::from_mode(0o600);
                if let Err(e) = std::fs::set_permissions(path, perms) {
                    tracing::warn!(path = %path, error = %e, "Failed to set database file permissions");
                }
            } else if let Some(parent) = db_path.parent() {
                if parent.exists() {
                    use std::os::unix::fs::OpenOptionsExt;
                    let _file = std::fs::OpenOptions::new()
                        .write(true)
                        .create_new(true)
                        .mode(0o600)
                        .open(db_path)
                        .ok(); // If creation fails, SQLite will report the error at connect_with.
                }
            }
        }

        // busy_timeout=5000: wait up to 5 seconds for a lock before SQLITE_BUSY.
        let options = SqliteConnectOptions::from_str(&url)
            .map_err(StorageError::from_sqlx)?
            .pragma("busy_timeout", "5000");
        // A single writer; one connection also keeps `:memory:` databases
        // shared across every query of this handle.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(StorageError::from_sqlx)?;
        let db = Self { pool };
        db.migrate().await.map_err(|e| {
            if is_lock_message(&e.to_string()) {
                StorageError::InstanceLocked
            } else {
                StorageError::Migration(e.to_string())
            }
        })?;
        tracing::debug!(path = %path, "Database opened");
        Ok(db)
    }

    /// Run migrations atomically within a transaction.
    ///
    /// Every statement uses `IF NOT EXISTS`, so re-running on an existing
    /// database is a no-op.
    async fn migrate(&self) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // Named key-value slots; the catalog lives under one key as a JSON array.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS storage_slots (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
        "#,
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }
}
