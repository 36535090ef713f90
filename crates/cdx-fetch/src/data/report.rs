use std::fmt;

use super::range::ByteRange;

/// One record that could not be fetched or written.
///
/// Carries what is needed to retry it by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFailure {
    pub url: String,
    pub filename: String,
    pub range: Option<ByteRange>,
    pub error: String,
}

impl fmt::Display for EntryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.range {
            Some(range) => write!(f, "{} ({} bytes {}): {}", self.url, self.filename, range, self.error),
            None => write!(f, "{} ({}): {}", self.url, self.filename, self.error),
        }
    }
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Entries received from the index.
    pub entries: u64,
    /// Entries suppressed by the dedup gate.
    pub duplicates: u64,
    /// Records fetched and written.
    pub fetched: u64,
    /// Bytes handed to the sink.
    pub bytes_written: u64,
    /// Per-entry failures, in completion order.
    pub failures: Vec<EntryFailure>,
    /// Index pages that could not be read.
    pub page_failures: u64,
    /// Fetch workers that ended abnormally.
    pub lost_workers: u64,
}

impl PipelineReport {
    /// True when nothing failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.page_failures == 0 && self.lost_workers == 0
    }
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries, {} duplicates, {} fetched ({} bytes), {} failed, {} page failures",
            self.entries,
            self.duplicates,
            self.fetched,
            self.bytes_written,
            self.failures.len(),
            self.page_failures
        )
    }
}
