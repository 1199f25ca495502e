use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{App, AppStatus, DEFAULT_ICON};

// ============================================================================
// Error Types
// ============================================================================

/// Storage errors with user-friendly messages.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The slot holds no value yet (first run, or cleared).
    #[error("No stored catalog found")]
    NotFound,

    /// The stored or imported payload could not be parsed.
    #[error("Catalog data is corrupt: {0}")]
    CorruptData(String),

    /// The collection could not be serialized.
    #[error("Failed to encode catalog: {0}")]
    Encode(#[from] serde_json::Error),

    /// Another process holds the database lock.
    #[error("Another instance of appshelf appears to be running. Please close it and try again.")]
    InstanceLocked,

    /// Migration failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// Export or import file could not be read or written.
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    /// Classify a sqlx error, recognizing SQLite lock conditions.
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        if is_lock_message(&err.to_string()) {
            return StorageError::InstanceLocked;
        }
        StorageError::Database(err)
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, StorageError::CorruptData(_))
    }
}

/// SQLITE_BUSY (5), SQLITE_LOCKED (6) and SQLITE_CANTOPEN (14) surface as
/// these messages.
pub(crate) fn is_lock_message(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("database is locked")
        || message.contains("database table is locked")
        || message.contains("sqlite_busy")
        || message.contains("sqlite_locked")
        || message.contains("unable to open database file")
}

// ============================================================================
// Serialized Record
// ============================================================================

/// On-disk shape of one app, shared by the storage slot and export files.
///
/// Converts to [`App`] via [`AppRecord::into_app`], which reconstructs the
/// creation timestamp. Legacy records may omit `favorite` and `icon`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AppRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub url: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    pub status: AppStatus,
    pub created_at: String,
    #[serde(default)]
    pub favorite: Option<bool>,
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

impl AppRecord {
    pub(crate) fn from_app(app: &App) -> Self {
        Self {
            id: app.id.clone(),
            name: app.name.clone(),
            description: app.description.clone(),
            category: app.category.clone(),
            url: app.url.clone(),
            icon: app.icon.clone(),
            status: app.status,
            created_at: super::codec::format_timestamp(&app.created_at),
            favorite: Some(app.favorite),
        }
    }

    pub(crate) fn into_app(self) -> Result<App, StorageError> {
        let created_at = super::codec::parse_timestamp(&self.created_at).ok_or_else(|| {
            StorageError::CorruptData(format!(
                "app '{}' has an unreadable createdAt '{}'",
                self.id, self.created_at
            ))
        })?;

        Ok(App {
            id: self.id,
            name: self.name,
            description: self.description,
            category: self.category,
            url: self.url,
            icon: self.icon,
            status: self.status,
            created_at,
            favorite: self.favorite.unwrap_or(false),
        })
    }
}
