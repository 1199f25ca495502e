use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use feruca::Collator;
use serde::Deserialize;
use thiserror::Error;

use super::model::{App, AppStatus};

/// Sentinel accepted by the category and status filters to mean "any".
pub const ALL: &str = "all";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryParseError {
    #[error("Unknown sort key '{0}' (expected favorite, createdAt or name)")]
    SortKey(String),
    #[error("Unknown status filter '{0}' (expected all, active or inactive)")]
    Status(String),
}

// ============================================================================
// Sort Keys and Filters
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum SortBy {
    /// Favorites first, newest first within each group.
    #[default]
    Favorite,
    /// Newest first.
    CreatedAt,
    /// Name ascending, Unicode collation order.
    Name,
}

impl SortBy {
    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Favorite => "favorite",
            SortBy::CreatedAt => "createdAt",
            SortBy::Name => "name",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = QueryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "favorite" | "favorites" => Ok(SortBy::Favorite),
            "createdAt" | "created-at" | "created_at" | "newest" => Ok(SortBy::CreatedAt),
            "name" => Ok(SortBy::Name),
            other => Err(QueryParseError::SortKey(other.to_owned())),
        }
    }
}

impl TryFrom<String> for SortBy {
    type Error = QueryParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    fn matches(&self, app: &App) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => app.category == *category,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        if s == ALL {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(s.to_owned())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(AppStatus),
}

impl StatusFilter {
    fn matches(self, app: &App) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => app.status == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = QueryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == ALL {
            return Ok(StatusFilter::All);
        }
        s.parse::<AppStatus>()
            .map(StatusFilter::Only)
            .map_err(|_| QueryParseError::Status(s.to_owned()))
    }
}

// ============================================================================
// Query
// ============================================================================

/// Filter and ordering for a catalog listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    /// Case-insensitive substring of name or description. Empty matches all.
    pub text: String,
    pub category: CategoryFilter,
    pub status: StatusFilter,
    pub sort_by: SortBy,
}

impl Query {
    pub fn sorted_by(sort_by: SortBy) -> Self {
        Self {
            sort_by,
            ..Self::default()
        }
    }

    fn matches(&self, app: &App, needle: &str) -> bool {
        let text_match = needle.is_empty()
            || app.name.to_lowercase().contains(needle)
            || app.description.to_lowercase().contains(needle);
        text_match && self.category.matches(app) && self.status.matches(app)
    }
}

/// Filter, then stable-sort, the collection.
///
/// Sorting only reorders what the filters kept; apps that compare equal keep
/// their collection order.
pub fn query<'a>(apps: &'a [App], q: &Query) -> Vec<&'a App> {
    let needle = q.text.to_lowercase();
    let mut hits: Vec<&App> = apps.iter().filter(|app| q.matches(app, &needle)).collect();

    match q.sort_by {
        SortBy::Favorite => hits.sort_by(|a, b| {
            b.favorite
                .cmp(&a.favorite)
                .then_with(|| b.created_at.cmp(&a.created_at))
        }),
        SortBy::CreatedAt => hits.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortBy::Name => {
            let mut collator = Collator::default();
            hits.sort_by(|a, b| collator.collate(a.name.as_str(), b.name.as_str()));
        }
    }

    hits
}

/// Name order under the Unicode Collation Algorithm with the CLDR root
/// tailoring: accents and case are secondary to the base letters, and
/// lowercase sorts before uppercase when names differ only in case.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    Collator::default().collate(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn app(id: &str, name: &str, day: u32, favorite: bool) -> App {
        App {
            id: id.to_string(),
            name: name.to_string(),
            description: format!("{name} description"),
            category: "工具".to_string(),
            url: "https://example.com/".to_string(),
            icon: "🌐".to_string(),
            status: AppStatus::Active,
            created_at: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            favorite,
        }
    }

    fn ids(apps: &[&App]) -> Vec<String> {
        apps.iter().map(|a| a.id.clone()).collect()
    }

    #[test]
    fn test_favorite_then_newest() {
        let apps = vec![app("A", "a", 1, true), app("B", "b", 5, false)];
        assert_eq!(ids(&query(&apps, &Query::sorted_by(SortBy::Favorite))), ["A", "B"]);
        assert_eq!(ids(&query(&apps, &Query::sorted_by(SortBy::CreatedAt))), ["B", "A"]);
    }

    #[test]
    fn test_favorite_groups_sorted_by_date() {
        let apps = vec![
            app("1", "a", 1, false),
            app("2", "b", 2, true),
            app("3", "c", 3, false),
            app("4", "d", 4, true),
        ];
        assert_eq!(
            ids(&query(&apps, &Query::sorted_by(SortBy::Favorite))),
            ["4", "2", "3", "1"]
        );
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let apps = vec![
            app("1", "squared symbol", 1, false),
            app("2", "Em dash symbol", 2, false),
            app("3", "ai beauty rating", 3, false),
        ];
        assert_eq!(ids(&query(&apps, &Query::sorted_by(SortBy::Name))), ["3", "2", "1"]);
    }

    #[test]
    fn test_name_sort_collates_accents() {
        let apps = vec![
            app("1", "zebra", 1, false),
            app("2", "Éclair", 2, false),
            app("3", "apple", 3, false),
            app("4", "Ärzte", 4, false),
        ];
        let names: Vec<&str> = query(&apps, &Query::sorted_by(SortBy::Name))
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, ["apple", "Ärzte", "Éclair", "zebra"]);
    }

    #[test]
    fn test_name_case_tie_puts_lowercase_first() {
        assert_eq!(compare_names("app", "App"), Ordering::Less);
        assert_eq!(compare_names("App", "app"), Ordering::Greater);
        assert_eq!(compare_names("app", "app"), Ordering::Equal);

        let apps = vec![app("1", "App", 1, false), app("2", "app", 2, false)];
        assert_eq!(ids(&query(&apps, &Query::sorted_by(SortBy::Name))), ["2", "1"]);
    }

    #[test]
    fn test_sort_key_deserializes_from_string() {
        let key: SortBy = serde_json::from_str("\"createdAt\"").unwrap();
        assert_eq!(key, SortBy::CreatedAt);
        let err = serde_json::from_str::<SortBy>("\"size\"").unwrap_err();
        assert!(err.to_string().contains("Unknown sort key 'size'"));
    }

    #[test]
    fn test_text_matches_name_or_description() {
        let mut apps = vec![app("1", "Mii Maker", 1, false), app("2", "other", 2, false)];
        apps[1].description = "Copy the EM DASH".to_string();

        let q = Query {
            text: "mii".to_string(),
            ..Query::default()
        };
        assert_eq!(ids(&query(&apps, &q)), ["1"]);

        let q = Query {
            text: "em dash".to_string(),
            ..Query::default()
        };
        assert_eq!(ids(&query(&apps, &q)), ["2"]);
    }

    #[test]
    fn test_filters_are_anded() {
        let mut apps = vec![
            app("1", "one", 1, false),
            app("2", "two", 2, false),
            app("3", "three", 3, false),
        ];
        apps[1].category = "开发".to_string();
        apps[2].status = AppStatus::Inactive;

        let q = Query {
            category: CategoryFilter::from("工具"),
            status: StatusFilter::Only(AppStatus::Active),
            ..Query::default()
        };
        assert_eq!(ids(&query(&apps, &q)), ["1"]);

        let q = Query {
            status: StatusFilter::Only(AppStatus::Inactive),
            ..Query::default()
        };
        assert_eq!(ids(&query(&apps, &q)), ["3"]);
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!("createdAt".parse::<SortBy>(), Ok(SortBy::CreatedAt));
        assert_eq!("created-at".parse::<SortBy>(), Ok(SortBy::CreatedAt));
        assert!("size".parse::<SortBy>().is_err());
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!(
            "inactive".parse::<StatusFilter>(),
            Ok(StatusFilter::Only(AppStatus::Inactive))
        );
        assert_eq!(CategoryFilter::from("all"), CategoryFilter::All);
    }

    #[test]
    fn test_empty_collection() {
        assert!(query(&[], &Query::default()).is_empty());
    }
}
