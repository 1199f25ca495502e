use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};
use thiserror::Error;

/// Placeholder glyph for apps created without an explicit icon.
pub const DEFAULT_ICON: &str = "🚀";

// ============================================================================
// Status
// ============================================================================

/// Whether a bookmarked app is currently in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppStatus {
    #[default]
    Active,
    Inactive,
}

impl AppStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AppStatus::Active => "active",
            AppStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for AppStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown status '{0}' (expected 'active' or 'inactive')")]
pub struct ParseStatusError(pub String);

impl FromStr for AppStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(AppStatus::Active),
            "inactive" => Ok(AppStatus::Inactive),
            _ => Err(ParseStatusError(s.to_owned())),
        }
    }
}

// ============================================================================
// Fields and Drafts
// ============================================================================

/// Editable fields of an [`App`].
///
/// Ordering follows the form layout, so validation errors list in the order
/// a user reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Description,
    Category,
    Url,
    Icon,
    Status,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Description => "description",
            Field::Category => "category",
            Field::Url => "url",
            Field::Icon => "icon",
            Field::Status => "status",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single edit to one field of a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Name(String),
    Description(String),
    Category(String),
    Url(String),
    Icon(String),
    Status(AppStatus),
}

impl FieldUpdate {
    pub fn field(&self) -> Field {
        match self {
            FieldUpdate::Name(_) => Field::Name,
            FieldUpdate::Description(_) => Field::Description,
            FieldUpdate::Category(_) => Field::Category,
            FieldUpdate::Url(_) => Field::Url,
            FieldUpdate::Icon(_) => Field::Icon,
            FieldUpdate::Status(_) => Field::Status,
        }
    }
}

/// User-entered fields for a new or edited app, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub url: String,
    pub icon: String,
    pub status: AppStatus,
}

impl Default for AppDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            category: String::new(),
            url: String::new(),
            icon: DEFAULT_ICON.to_string(),
            status: AppStatus::Active,
        }
    }
}

impl AppDraft {
    /// Apply one field edit in place.
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Name(v) => self.name = v,
            FieldUpdate::Description(v) => self.description = v,
            FieldUpdate::Category(v) => self.category = v,
            FieldUpdate::Url(v) => self.url = v,
            FieldUpdate::Icon(v) => self.icon = v,
            FieldUpdate::Status(v) => self.status = v,
        }
    }

    /// Builder-style variant of [`apply`](Self::apply).
    pub fn with(mut self, update: FieldUpdate) -> Self {
        self.apply(update);
        self
    }
}

impl From<&App> for AppDraft {
    fn from(app: &App) -> Self {
        Self {
            name: app.name.clone(),
            description: app.description.clone(),
            category: app.category.clone(),
            url: app.url.clone(),
            icon: app.icon.clone(),
            status: app.status,
        }
    }
}

// ============================================================================
// App
// ============================================================================

/// A bookmarked web application.
///
/// `id` and `created_at` are assigned once by [`App::create`] and carried
/// unchanged through every later revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub url: String,
    pub icon: String,
    pub status: AppStatus,
    pub created_at: DateTime<Utc>,
    pub favorite: bool,
}

impl App {
    /// Construct a new app from draft fields, stamping a fresh id and the
    /// current time. New apps are never favorites.
    pub fn create(draft: AppDraft) -> Self {
        let now = now();
        Self::create_at(draft, next_id(now), now)
    }

    pub(crate) fn create_at(draft: AppDraft, id: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            category: draft.category,
            url: draft.url,
            icon: draft.icon,
            status: draft.status,
            created_at,
            favorite: false,
        }
    }

    /// A new version of this app carrying the draft's fields.
    /// Identity, creation time and favorite flag are kept.
    pub fn revise(&self, draft: AppDraft) -> Self {
        let mut revised = Self::create_at(draft, self.id.clone(), self.created_at);
        revised.favorite = self.favorite;
        revised
    }
}

/// Current time at millisecond precision, the resolution timestamps are
/// stored with.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

// ============================================================================
// Id Generation
// ============================================================================

/// Last id handed out in this process, in Unix milliseconds.
static LAST_ISSUED_ID: AtomicI64 = AtomicI64::new(0);

/// Time-derived id: Unix milliseconds as a decimal string.
///
/// Strictly increasing within a process, so two apps created in the same
/// millisecond still get distinct ids.
pub fn next_id(now: DateTime<Utc>) -> String {
    let candidate = now.timestamp_millis();
    let mut last = LAST_ISSUED_ID.load(Ordering::Relaxed);
    loop {
        let next = candidate.max(last + 1);
        match LAST_ISSUED_ID.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => return next.to_string(),
            Err(actual) => last = actual,
        }
    }
}
