//! JSON persistence over a [`KeyValueStore`] that never fails the caller.
//!
//! Missing or malformed data loads as the caller's default; failed writes
//! are logged and dropped, leaving the in-memory state authoritative until
//! the next successful write.

use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::kv_store::KeyValueStore;

/// Key prefix for per-date planner data
pub const PLANNER_KEY_PREFIX: &str = "daily-planner-";
/// Key holding the most recently saved subject list
pub const GLOBAL_SUBJECTS_KEY: &str = "daily-planner-subjects";

/// Storage key for one date's aggregate
pub fn planner_key(date: NaiveDate) -> String {
    format!("{}{}", PLANNER_KEY_PREFIX, date.format("%Y-%m-%d"))
}

/// Inverse of [`planner_key`]; `None` for keys that are not date buckets
pub fn date_from_key(key: &str) -> Option<NaiveDate> {
    let rest = key.strip_prefix(PLANNER_KEY_PREFIX)?;
    NaiveDate::parse_from_str(rest, "%Y-%m-%d").ok()
}

/// Load and decode `key`, or return `default`.
pub fn load<T, S>(store: &S, key: &str, default: T) -> T
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return default,
        Err(e) => {
            tracing::warn!(key, error = %e, "could not read stored value, using default");
            return default;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "malformed stored value, using default");
            default
        }
    }
}

/// Encode and write `value` under `key`. Returns whether the write landed.
pub fn save<T, S>(store: &mut S, key: &str, value: &T) -> bool
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let encoded = match serde_json::to_string(value) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(key, error = %e, "could not serialize value, skipping write");
            return false;
        }
    };
    match store.set(key, &encoded) {
        Ok(()) => {
            tracing::trace!(key, bytes = encoded.len(), "saved");
            true
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "could not write value");
            false
        }
    }
}

/// Dates that have a stored aggregate, oldest first
pub fn stored_dates<S: KeyValueStore + ?Sized>(store: &S) -> Vec<NaiveDate> {
    let keys = match store.keys() {
        Ok(keys) => keys,
        Err(e) => {
            tracing::warn!(error = %e, "could not list stored keys");
            return Vec::new();
        }
    };
    let mut dates: Vec<NaiveDate> = keys.iter().filter_map(|k| date_from_key(k)).collect();
    dates.sort();
    dates
}
