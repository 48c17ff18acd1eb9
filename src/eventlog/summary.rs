use super::fields::Classification;
use super::LogEntry;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationSummary {
    pub total: usize,
    pub permanent: usize,
    pub temporary: usize,
    pub informational: usize,
    pub unknown: usize,
}

impl ClassificationSummary {
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a LogEntry>,
    {
        let mut summary = Self::default();
        for entry in entries {
            summary.record(entry.classification());
        }
        summary
    }

    pub fn record(&mut self, classification: Classification) {
        self.total += 1;
        match classification {
            Classification::Permanent => self.permanent += 1,
            Classification::Temporary => self.temporary += 1,
            Classification::Informational => self.informational += 1,
            Classification::Unknown => self.unknown += 1,
        }
    }

    pub fn bucket_sum(&self) -> usize {
        self.permanent + self.temporary + self.informational + self.unknown
    }

    /// True when every count is at most the matching count in `other`.
    pub fn is_within(&self, other: &Self) -> bool {
        self.total <= other.total
            && self.permanent <= other.permanent
            && self.temporary <= other.temporary
            && self.informational <= other.informational
            && self.unknown <= other.unknown
    }
}
