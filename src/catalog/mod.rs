//! In-memory catalog logic: the app record, collection operations, queries,
//! and draft validation. Nothing in this module performs I/O.

mod model;
pub mod ops;
mod query;
mod seed;
mod validate;

pub use model::{
    next_id, App, AppDraft, AppStatus, Field, FieldUpdate, ParseStatusError, DEFAULT_ICON,
};
pub use query::{
    compare_names, query, CategoryFilter, Query, QueryParseError, SortBy, StatusFilter, ALL,
};
pub use seed::{seed_apps, DEFAULT_CATEGORIES};
pub use validate::{check, validate, ValidatedDraft, ValidationErrors};
