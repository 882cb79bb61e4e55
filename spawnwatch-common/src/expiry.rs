use chrono::{DateTime, Utc};

use crate::types::Entry;

/// Recompute `time_left` for every entry against `now`.
///
/// Entries whose expiration is already behind `now` are dropped. Survivors
/// keep their relative order and all provider fields; only `time_left` is
/// overwritten.
pub fn recompute_time_left<I>(entries: I, now: DateTime<Utc>) -> Vec<Entry>
where
    I: IntoIterator<Item = Entry>,
{
    entries
        .into_iter()
        .filter_map(|mut entry| {
            // compare the instants; the millisecond diff truncates toward zero
            if entry.expire_at < now {
                return None;
            }
            let diff_ms = (entry.expire_at - now).num_milliseconds();
            entry.time_left = Some(format_time_left(diff_ms));
            Some(entry)
        })
        .collect()
}

/// Format a non-negative remaining duration in milliseconds as `"Xm Ys"`.
///
/// Minutes are floored, seconds are rounded, so 59.6s reads "0m 60s".
pub fn format_time_left(diff_ms: i64) -> String {
    let minutes = diff_ms.div_euclid(60_000);
    let seconds = ((diff_ms as f64 / 1000.0) % 60.0).round() as i64;
    format!("{}m {}s", minutes, seconds)
}
