//! The catalog session: one owned collection, written through to storage on
//! every change.
//!
//! Mutations update the in-memory collection first and then save the whole
//! collection. A failed save is reported to the caller but not rolled back;
//! the in-memory state stays the source of truth for the session.
use std::path::Path;

use anyhow::{Context, Result};

use crate::catalog::{ops, query, seed_apps, App, AppStatus, Query, ValidatedDraft};
use crate::storage::{self, AppStore, StorageError};

/// Where the session's starting collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Read from the storage slot.
    Stored,
    /// Slot was empty; starter catalog installed in memory.
    Seeded,
    /// Slot was empty and seeding is disabled.
    Empty,
    /// Slot held unreadable data; treated as empty storage.
    RecoveredFromCorrupt,
}

/// Result of importing a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The collection was replaced with this many apps.
    Replaced(usize),
    /// The file did not parse; the collection is unchanged.
    Ignored(String),
}

pub struct Session {
    apps: Vec<App>,
    store: AppStore,
    source: LoadSource,
}

impl Session {
    /// Load the stored catalog, falling back to the starter catalog (or an
    /// empty one) when nothing usable is stored.
    ///
    /// Opening never writes; the fallback collection is persisted by the
    /// first mutation.
    pub async fn open(store: AppStore, seed_on_first_run: bool) -> Result<Self> {
        let fallback = |source_if_seeded, source_if_empty| {
            if seed_on_first_run {
                (seed_apps(), source_if_seeded)
            } else {
                (Vec::new(), source_if_empty)
            }
        };

        let (apps, source) = match store.load().await {
            Ok(apps) => (apps, LoadSource::Stored),
            Err(StorageError::NotFound) => {
                tracing::debug!(key = %store.key(), "No stored catalog");
                fallback(LoadSource::Seeded, LoadSource::Empty)
            }
            Err(StorageError::CorruptData(reason)) => {
                tracing::warn!(key = %store.key(), reason = %reason, "Stored catalog is corrupt, ignoring it");
                fallback(
                    LoadSource::RecoveredFromCorrupt,
                    LoadSource::RecoveredFromCorrupt,
                )
            }
            Err(e) => return Err(e).context("Failed to load catalog"),
        };

        tracing::debug!(apps = apps.len(), source = ?source, "Session opened");
        Ok(Self {
            apps,
            store,
            source,
        })
    }

    pub fn apps(&self) -> &[App] {
        &self.apps
    }

    pub fn source(&self) -> LoadSource {
        self.source
    }

    pub fn find(&self, id: &str) -> Option<&App> {
        ops::find(&self.apps, id)
    }

    /// Filtered and sorted view of the collection.
    pub fn query(&self, q: &Query) -> Vec<&App> {
        query(&self.apps, q)
    }

    /// Add an app and persist. Returns the new app.
    pub async fn add(&mut self, draft: ValidatedDraft) -> Result<&App> {
        self.apps = ops::add(&self.apps, draft);
        self.persist().await?;
        let added = self
            .apps
            .last()
            .context("Catalog is empty right after adding an app")?;
        tracing::info!(id = %added.id, name = %added.name, "App added");
        Ok(added)
    }

    /// Replace an app with a revised version. Returns `false` (and writes
    /// nothing) if no app has that id.
    pub async fn update(&mut self, app: &App) -> Result<bool> {
        if !self.contains(&app.id, "update") {
            return Ok(false);
        }
        self.apps = ops::update(&self.apps, app);
        self.persist().await?;
        tracing::info!(id = %app.id, "App updated");
        Ok(true)
    }

    /// Delete an app. Returns `false` if no app has that id.
    pub async fn delete(&mut self, id: &str) -> Result<bool> {
        if !self.contains(id, "delete") {
            return Ok(false);
        }
        self.apps = ops::delete(&self.apps, id);
        self.persist().await?;
        tracing::info!(id = %id, "App deleted");
        Ok(true)
    }

    /// Set an app's status. Returns `false` if no app has that id.
    pub async fn set_status(&mut self, id: &str, status: AppStatus) -> Result<bool> {
        if !self.contains(id, "set_status") {
            return Ok(false);
        }
        self.apps = ops::set_status(&self.apps, id, status);
        self.persist().await?;
        Ok(true)
    }

    /// Flip an app's favorite flag. Returns the new flag, or `None` if no
    /// app has that id.
    pub async fn toggle_favorite(&mut self, id: &str) -> Result<Option<bool>> {
        if !self.contains(id, "toggle_favorite") {
            return Ok(None);
        }
        self.apps = ops::toggle_favorite(&self.apps, id);
        self.persist().await?;
        Ok(self.find(id).map(|app| app.favorite))
    }

    /// Replace the whole collection with the contents of an export file.
    ///
    /// A file that does not parse is ignored and the collection stays as it
    /// was. A file that cannot be read at all is an error.
    pub async fn import_from_path(&mut self, path: &Path) -> Result<ImportOutcome> {
        match storage::import_from_path(path).await {
            Ok(apps) => {
                let count = apps.len();
                self.apps = apps;
                self.persist().await?;
                tracing::info!(path = %path.display(), apps = count, "Catalog imported");
                Ok(ImportOutcome::Replaced(count))
            }
            Err(StorageError::CorruptData(reason)) => {
                tracing::warn!(path = %path.display(), reason = %reason, "Import ignored, file is not a valid catalog");
                Ok(ImportOutcome::Ignored(reason))
            }
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read import file: {}", path.display()))
            }
        }
    }

    /// Write the collection to an export file.
    pub fn export_to_path(&self, path: &Path) -> Result<usize> {
        storage::export_to_path(&self.apps, path)
            .with_context(|| format!("Failed to export catalog to {}", path.display()))?;
        Ok(self.apps.len())
    }

    fn contains(&self, id: &str, op: &'static str) -> bool {
        let found = self.find(id).is_some();
        if !found {
            tracing::debug!(id = %id, op, "No app with this id, nothing to do");
        }
        found
    }

    async fn persist(&self) -> Result<()> {
        self.store
            .save(&self.apps)
            .await
            .context("Failed to save catalog")
    }
}
