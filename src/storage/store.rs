//! Persistence adapter for the catalog: the durable slot plus JSON export
//! and import files.
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use super::codec::{decode_apps, encode_apps, encode_apps_pretty};
use super::schema::Database;
use super::types::StorageError;
use crate::catalog::App;

/// Storage key holding the serialized catalog.
pub const CATALOG_KEY: &str = "app-manager:apps";

/// Fixed file name offered for exports.
pub const EXPORT_FILE_NAME: &str = "apps.json";

/// Reads and writes the whole catalog under a single slot key.
#[derive(Clone)]
pub struct AppStore {
    db: Database,
    key: String,
}

impl AppStore {
    pub fn new(db: Database) -> Self {
        Self::with_key(db, CATALOG_KEY)
    }

    pub fn with_key(db: Database, key: impl Into<String>) -> Self {
        Self {
            db,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored catalog.
    ///
    /// # Errors
    ///
    /// - [`StorageError::NotFound`] if nothing has been saved yet
    /// - [`StorageError::CorruptData`] if the stored payload does not parse
    pub async fn load(&self) -> Result<Vec<App>, StorageError> {
        let raw = self
            .db
            .get_slot(&self.key)
            .await?
            .ok_or(StorageError::NotFound)?;
        decode_apps(&raw)
    }

    /// Serialize the full catalog and overwrite the slot.
    pub async fn save(&self, apps: &[App]) -> Result<(), StorageError> {
        let raw = encode_apps(apps)?;
        self.db.set_slot(&self.key, &raw).await?;
        tracing::debug!(key = %self.key, apps = apps.len(), "Catalog saved");
        Ok(())
    }
}

/// Export bytes: the slot serialization, pretty-printed.
pub fn export_to_file(apps: &[App]) -> Result<Vec<u8>, StorageError> {
    Ok(encode_apps_pretty(apps)?.into_bytes())
}

/// Parse an imported file. The caller replaces its whole collection with
/// the result; nothing is merged.
pub fn import_from_file(bytes: &[u8]) -> Result<Vec<App>, StorageError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| StorageError::CorruptData(format!("file is not UTF-8: {e}")))?;
    // Editors on Windows like to prepend a BOM.
    decode_apps(text.trim_start_matches('\u{feff}'))
}

/// Read and parse an import file from disk.
pub async fn import_from_path(path: &Path) -> Result<Vec<App>, StorageError> {
    let bytes = tokio::fs::read(path).await?;
    import_from_file(&bytes)
}

/// Write an export file atomically.
///
/// Content goes to a temporary file in the same directory, is synced to disk,
/// then renamed over `path`, so the destination is never left half-written.
pub fn export_to_path(apps: &[App], path: &Path) -> Result<(), StorageError> {
    let content = export_to_file(apps)?;

    // Randomized temp name so a pre-planted symlink cannot be followed.
    let random_suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = path.with_extension(format!("tmp.{:016x}", random_suffix));

    let written =
        write_synced(&temp_path, &content).and_then(|()| std::fs::rename(&temp_path, path));
    if let Err(e) = written {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e.into());
    }

    tracing::info!(path = %path.display(), apps = apps.len(), "Catalog exported");
    Ok(())
}

/// Create `path` (failing if it exists), write `content`, and sync to disk.
fn write_synced(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    file.write_all(content)?;
    file.sync_all()
}
