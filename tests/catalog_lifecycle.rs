//! Integration tests for the catalog lifecycle: add, edit, favorite, delete,
//! export and import through a `Session`.
//!
//! Most tests use their own in-memory SQLite database. The persistence tests
//! use a file in a per-test temp directory so a second session can reopen it.

use std::path::PathBuf;

use appshelf::catalog::{
    seed_apps, validate, AppDraft, AppStatus, CategoryFilter, Field, FieldUpdate, Query, SortBy,
    StatusFilter, ValidatedDraft,
};
use appshelf::session::{ImportOutcome, LoadSource, Session};
use appshelf::storage::{AppStore, Database, EXPORT_FILE_NAME};
use pretty_assertions::assert_eq;

async fn test_session(seed: bool) -> Session {
    let db = Database::open(":memory:").await.unwrap();
    Session::open(AppStore::new(db), seed).await.unwrap()
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("appshelf_it_{}", name));
    std::fs::remove_dir_all(&dir).ok();
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn draft(name: &str, category: &str) -> ValidatedDraft {
    validate(AppDraft {
        name: name.to_string(),
        description: format!("{} description", name),
        category: category.to_string(),
        url: format!("https://{}.example.com/", name),
        ..AppDraft::default()
    })
    .unwrap()
}

// ============================================================================
// Add / Edit / Delete
// ============================================================================

#[tokio::test]
async fn test_add_grows_collection_with_fresh_id() {
    let mut session = test_session(true).await;
    let before: Vec<String> = session.apps().iter().map(|a| a.id.clone()).collect();

    let added = session.add(draft("notes", "生产力")).await.unwrap().clone();

    assert_eq!(session.apps().len(), before.len() + 1);
    assert!(!before.contains(&added.id));
    assert!(!added.favorite);
    assert_eq!(added.status, AppStatus::Active);
    assert_eq!(added.icon, "🚀");
}

#[tokio::test]
async fn test_rapid_adds_get_distinct_ids() {
    let mut session = test_session(false).await;
    for i in 0..20 {
        session.add(draft(&format!("app{}", i), "工具")).await.unwrap();
    }
    let mut ids: Vec<&str> = session.apps().iter().map(|a| a.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 20);
}

#[tokio::test]
async fn test_edit_applies_field_updates() {
    let mut session = test_session(true).await;
    let original = session.find("3").unwrap().clone();

    let edited = [
        FieldUpdate::Name("em dash".to_string()),
        FieldUpdate::Status(AppStatus::Inactive),
    ]
    .into_iter()
    .fold(AppDraft::from(&original), AppDraft::with);
    let revised = original.revise(validate(edited).unwrap().into_inner());
    assert!(session.update(&revised).await.unwrap());

    let stored = session.find("3").unwrap();
    assert_eq!(stored.name, "em dash");
    assert_eq!(stored.status, AppStatus::Inactive);
    assert_eq!(stored.description, original.description);
    assert_eq!(stored.created_at, original.created_at);
    assert_eq!(stored.favorite, original.favorite);
}

#[tokio::test]
async fn test_edit_with_invalid_url_is_rejected() {
    let session = test_session(true).await;
    let original = session.find("1").unwrap();

    let errors = validate(
        AppDraft::from(original).with(FieldUpdate::Url("not-a-url".to_string())),
    )
    .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get(Field::Url), Some("Please enter a valid URL"));
}

#[tokio::test]
async fn test_delete_twice_is_idempotent() {
    let mut session = test_session(true).await;

    assert!(session.delete("2").await.unwrap());
    let after_first = session.apps().to_vec();
    assert!(!session.delete("2").await.unwrap());

    assert_eq!(session.apps(), after_first.as_slice());
    assert!(session.find("2").is_none());
}

#[tokio::test]
async fn test_toggle_favorite_twice_restores() {
    let mut session = test_session(true).await;

    assert_eq!(session.toggle_favorite("1").await.unwrap(), Some(false));
    assert_eq!(session.toggle_favorite("1").await.unwrap(), Some(true));
    assert_eq!(session.apps(), seed_apps().as_slice());
}

// ============================================================================
// Query
// ============================================================================

#[tokio::test]
async fn test_query_by_name_returns_everything_sorted() {
    let session = test_session(true).await;
    let names: Vec<&str> = session
        .query(&Query::sorted_by(SortBy::Name))
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(
        names,
        [
            "ai beauty rating",
            "em dash symbol",
            "mii maker online",
            "squared symbol"
        ]
    );
}

#[tokio::test]
async fn test_query_combines_filters() {
    let mut session = test_session(true).await;
    session.set_status("4", AppStatus::Inactive).await.unwrap();

    let q = Query {
        text: "SYMBOL".to_string(),
        category: CategoryFilter::from("工具"),
        status: "inactive".parse::<StatusFilter>().unwrap(),
        sort_by: SortBy::CreatedAt,
    };
    let ids: Vec<&str> = session.query(&q).iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["4"]);
}

#[tokio::test]
async fn test_default_sort_puts_favorites_first_then_newest() {
    let mut session = test_session(true).await;
    session.toggle_favorite("3").await.unwrap();

    let ids: Vec<&str> = session
        .query(&Query::default())
        .iter()
        .map(|a| a.id.as_str())
        .collect();
    assert_eq!(ids, ["3", "1", "4", "2"]);
}

// ============================================================================
// Persistence
// ============================================================================

#[tokio::test]
async fn test_changes_survive_reopen() {
    let dir = temp_dir("reopen");
    let db_path = dir.join("appshelf.db");
    let db_path = db_path.to_str().unwrap();

    let saved = {
        let db = Database::open(db_path).await.unwrap();
        let mut session = Session::open(AppStore::new(db), true).await.unwrap();
        session.add(draft("reader", "生产力")).await.unwrap();
        session.toggle_favorite("2").await.unwrap();
        session.apps().to_vec()
    };

    let db = Database::open(db_path).await.unwrap();
    let session = Session::open(AppStore::new(db), true).await.unwrap();
    assert_eq!(session.source(), LoadSource::Stored);
    assert_eq!(session.apps(), saved.as_slice());

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_emptied_catalog_stays_empty() {
    let dir = temp_dir("emptied");
    let db_path = dir.join("appshelf.db");
    let db_path = db_path.to_str().unwrap();

    {
        let db = Database::open(db_path).await.unwrap();
        let mut session = Session::open(AppStore::new(db), true).await.unwrap();
        for id in ["1", "2", "3", "4"] {
            session.delete(id).await.unwrap();
        }
    }

    // An empty stored list is not the same as no stored list: no reseed
    let db = Database::open(db_path).await.unwrap();
    let session = Session::open(AppStore::new(db), true).await.unwrap();
    assert_eq!(session.source(), LoadSource::Stored);
    assert!(session.apps().is_empty());

    std::fs::remove_dir_all(&dir).ok();
}

// ============================================================================
// Export / Import
// ============================================================================

#[tokio::test]
async fn test_export_then_import_replaces_collection() {
    let dir = temp_dir("export_import");
    let path = dir.join(EXPORT_FILE_NAME);

    let mut source = test_session(true).await;
    source.add(draft("exported", "社交")).await.unwrap();
    assert_eq!(source.export_to_path(&path).unwrap(), 5);

    let exported = std::fs::read_to_string(&path).unwrap();
    assert!(exported.starts_with("[\n  {\n    \"id\": "));
    assert!(exported.contains("\"createdAt\": \"2024-01-01T00:00:00.000Z\""));

    let mut target = test_session(false).await;
    target.add(draft("local only", "工具")).await.unwrap();
    let outcome = target.import_from_path(&path).await.unwrap();

    assert_eq!(outcome, ImportOutcome::Replaced(5));
    assert_eq!(target.apps(), source.apps());
    assert!(target.apps().iter().all(|a| a.name != "local only"));

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_malformed_import_leaves_collection_unchanged() {
    let dir = temp_dir("malformed");
    let path = dir.join("broken.json");
    std::fs::write(&path, "[{\"id\": \"1\", \"name\": ").unwrap();

    let mut session = test_session(true).await;
    session.toggle_favorite("4").await.unwrap();
    let before = session.apps().to_vec();

    let outcome = session.import_from_path(&path).await.unwrap();
    assert!(matches!(outcome, ImportOutcome::Ignored(_)));
    assert_eq!(session.apps(), before.as_slice());

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_import_of_wrong_shape_is_ignored() {
    let dir = temp_dir("wrong_shape");
    let path = dir.join("object.json");
    std::fs::write(&path, "{\"apps\": []}").unwrap();

    let mut session = test_session(true).await;
    let outcome = session.import_from_path(&path).await.unwrap();
    assert!(matches!(outcome, ImportOutcome::Ignored(_)));
    assert_eq!(session.apps(), seed_apps().as_slice());

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_import_legacy_records_without_favorite() {
    let dir = temp_dir("legacy");
    let path = dir.join("legacy.json");
    std::fs::write(
        &path,
        r#"[{"id":"9","name":"old","description":"d","category":"工具","url":"https://old.example/","icon":"📦","status":"inactive","createdAt":"2023-06-01"}]"#,
    )
    .unwrap();

    let mut session = test_session(true).await;
    let outcome = session.import_from_path(&path).await.unwrap();
    assert_eq!(outcome, ImportOutcome::Replaced(1));

    let app = session.find("9").unwrap();
    assert!(!app.favorite);
    assert_eq!(app.status, AppStatus::Inactive);
    assert_eq!(app.created_at.format("%Y-%m-%d").to_string(), "2023-06-01");

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_import_missing_file_is_error() {
    let mut session = test_session(true).await;
    let path = std::env::temp_dir().join("appshelf_it_no_such_file.json");
    assert!(session.import_from_path(&path).await.is_err());
    assert_eq!(session.apps(), seed_apps().as_slice());
}
