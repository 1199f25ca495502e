mod codec;
mod schema;
mod slots;
mod store;
mod types;

pub use codec::{decode_apps, encode_apps, encode_apps_pretty, format_timestamp, parse_timestamp};
pub use schema::Database;
pub use store::{
    export_to_file, export_to_path, import_from_file, import_from_path, AppStore, CATALOG_KEY,
    EXPORT_FILE_NAME,
};
pub use types::StorageError;
