//! appshelf: a local catalog of bookmarked web applications.
//!
//! The library holds everything except argument parsing: the catalog model
//! and its operations, the SQLite-backed store, configuration, and the
//! terminal renderer.
pub mod catalog;
pub mod config;
pub mod render;
pub mod session;
pub mod storage;
pub mod util;
