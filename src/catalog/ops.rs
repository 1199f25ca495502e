//! Collection operations.
//!
//! Each function takes the current collection by reference and returns the
//! next one; nothing here touches storage. An id that matches no app leaves
//! the collection unchanged.
use super::model::{next_id, now, App, AppStatus};
use super::validate::ValidatedDraft;

/// Look up an app by id.
pub fn find<'a>(apps: &'a [App], id: &str) -> Option<&'a App> {
    apps.iter().find(|app| app.id == id)
}

/// Append a new app built from a validated draft.
///
/// The fresh id is checked against the existing collection, since imported
/// catalogs may carry ids from another clock.
pub fn add(apps: &[App], draft: ValidatedDraft) -> Vec<App> {
    let now = now();
    let mut id = next_id(now);
    while find(apps, &id).is_some() {
        id = next_id(now);
    }

    let mut next = apps.to_vec();
    next.push(App::create_at(draft.into_inner(), id, now));
    next
}

/// Replace the app whose id matches `app.id`.
///
/// The stored creation time wins over whatever the caller passed in.
pub fn update(apps: &[App], app: &App) -> Vec<App> {
    apps.iter()
        .map(|existing| {
            if existing.id == app.id {
                App {
                    created_at: existing.created_at,
                    ..app.clone()
                }
            } else {
                existing.clone()
            }
        })
        .collect()
}

/// Remove the app with the given id.
pub fn delete(apps: &[App], id: &str) -> Vec<App> {
    apps.iter().filter(|app| app.id != id).cloned().collect()
}

/// Change only the status of the matching app.
pub fn set_status(apps: &[App], id: &str, status: AppStatus) -> Vec<App> {
    map_matching(apps, id, |app| app.status = status)
}

/// Flip the favorite flag of the matching app.
pub fn toggle_favorite(apps: &[App], id: &str) -> Vec<App> {
    map_matching(apps, id, |app| app.favorite = !app.favorite)
}

fn map_matching(apps: &[App], id: &str, edit: impl Fn(&mut App)) -> Vec<App> {
    apps.iter()
        .map(|app| {
            let mut app = app.clone();
            if app.id == id {
                edit(&mut app);
            }
            app
        })
        .collect()
}
