use super::LogEntry;
use chrono::{DateTime, Utc};

/// Keeps entries stamped strictly after `cutoff`, in source order. Entries
/// without a parseable timestamp are never in a window.
pub fn entries_after(entries: &[LogEntry], cutoff: DateTime<Utc>) -> Vec<&LogEntry> {
    entries
        .iter()
        .filter(|e| e.timestamp().is_some_and(|ts| ts > cutoff))
        .collect()
}
