pub mod entries;
pub mod fields;
pub mod source;
pub mod summary;
pub mod window;

use chrono::{DateTime, Duration, Utc};
use fields::Classification;
use serde::Serialize;
use source::LogSource;
use summary::ClassificationSummary;
use tracing::{debug, warn};

/// One event record cut out of the raw dump. Timestamp and classification are
/// derived from the text on every call and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    text: String,
}

impl LogEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        fields::extract_timestamp(&self.text)
    }

    pub fn classification(&self) -> Classification {
        fields::extract_classification(&self.text)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LogReportView {
    pub all_time: ClassificationSummary,
    pub recent: ClassificationSummary,
    pub recent_transcript: String,
    pub window_hours: i64,
    pub note: Option<String>,
}

impl LogReportView {
    fn unavailable(note: String, window: Duration) -> Self {
        Self {
            window_hours: window.num_hours(),
            note: Some(note),
            ..Self::default()
        }
    }
}

/// Runs the log source and summarizes its output. A failing source never
/// aborts the report: the view comes back empty with an explanatory note.
pub async fn collect_event_log<S: LogSource>(
    source: &S,
    now: DateTime<Utc>,
    window: Duration,
) -> LogReportView {
    match source.dump().await {
        Ok(raw) => build_view(&raw, now, window),
        Err(err) => {
            warn!(source = source.describe(), error = %err, "event log unavailable");
            LogReportView::unavailable(
                format!("Error invoking {}: {err}", source.describe()),
                window,
            )
        }
    }
}

pub fn build_view(raw: &str, now: DateTime<Utc>, window: Duration) -> LogReportView {
    let entries = entries::split_entries(raw);
    let all_time = ClassificationSummary::from_entries(&entries);

    let recent = window::entries_after(&entries, now - window);
    let recent_summary = ClassificationSummary::from_entries(recent.iter().copied());
    let recent_transcript = recent
        .iter()
        .map(|e| e.text())
        .collect::<Vec<_>>()
        .join("\n\n");

    debug_assert_eq!(all_time.total, all_time.bucket_sum());
    debug_assert!(recent_summary.is_within(&all_time));
    debug!(
        entries = entries.len(),
        recent = recent.len(),
        window_hours = window.num_hours(),
        "event log summarized"
    );

    LogReportView {
        all_time,
        recent: recent_summary,
        recent_transcript,
        window_hours: window.num_hours(),
        note: None,
    }
}
