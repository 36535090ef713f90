//! Immutable types: byte ranges, records, options and run reports.

pub mod options;
pub mod range;
pub mod record;
pub mod report;

pub use options::{FetchOptions, PipelineOptions};
pub use range::ByteRange;
pub use record::RawRecord;
pub use report::{EntryFailure, PipelineReport};
