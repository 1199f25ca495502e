//! JSON (de)serialization of the catalog.
//!
//! The storage slot and export files share one shape: a JSON array of
//! camelCase records whose `createdAt` is an RFC 3339 string with
//! millisecond precision, e.g. `2024-01-01T00:00:00.000Z`.
use std::collections::HashSet;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, TimeZone, Utc};

use super::types::{AppRecord, StorageError};
use crate::catalog::App;

/// Stored timestamps carry milliseconds; finer precision is dropped on entry
/// so that a save/load cycle reproduces the exact value.
pub const TIMESTAMP_PRECISION: u16 = 3;

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp.
///
/// Accepts RFC 3339 with any offset, an offset-less date-time (read in the
/// local time zone, as browsers read it), or a bare `YYYY-MM-DD` date
/// (midnight UTC). A local time skipped by a DST change does not parse; an
/// ambiguous one takes the earlier instant.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .and_then(|naive| Local.from_local_datetime(&naive).earliest())
                .map(|dt| dt.with_timezone(&Utc))
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })?;
    Some(parsed.trunc_subsecs(TIMESTAMP_PRECISION))
}

/// Compact encoding used for the storage slot.
pub fn encode_apps(apps: &[App]) -> Result<String, StorageError> {
    let records: Vec<AppRecord> = apps.iter().map(AppRecord::from_app).collect();
    Ok(serde_json::to_string(&records)?)
}

/// Two-space indented encoding used for export files.
pub fn encode_apps_pretty(apps: &[App]) -> Result<String, StorageError> {
    let records: Vec<AppRecord> = apps.iter().map(AppRecord::from_app).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Decode a serialized catalog, rebuilding timestamps.
///
/// All-or-nothing: a single bad record, or two records sharing an id, fails
/// the whole payload with [`StorageError::CorruptData`].
pub fn decode_apps(raw: &str) -> Result<Vec<App>, StorageError> {
    let records: Vec<AppRecord> =
        serde_json::from_str(raw).map_err(|e| StorageError::CorruptData(e.to_string()))?;

    let mut seen = HashSet::with_capacity(records.len());
    let mut apps = Vec::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id.clone()) {
            return Err(StorageError::CorruptData(format!(
                "duplicate app id '{}'",
                record.id
            )));
        }
        apps.push(record.into_app()?);
    }
    Ok(apps)
}
