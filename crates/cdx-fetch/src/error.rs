//! Error types for cdx-fetch.

use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::data::ByteRange;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to fetch {filename} bytes {range}: {message}")]
    FetchFailed {
        filename: String,
        range: ByteRange,
        message: String,
    },

    #[error("fetching {filename} bytes {range} timed out after {after:?}")]
    Timeout {
        filename: String,
        range: ByteRange,
        after: Duration,
    },

    #[error("failed to decompress record from {filename}: {source}")]
    DecompressFailed {
        filename: String,
        #[source]
        source: io::Error,
    },

    #[error("entry for {filename} has no readable range (offset {offset}, length {length})")]
    InvalidRange { filename: String, offset: u64, length: u64 },

    #[error("failed to write record: {0}")]
    Sink(#[source] io::Error),

    #[error(transparent)]
    Index(#[from] cdx_index::Error),

    #[error("aborting after failure on {url}: {source}")]
    Aborted {
        url: String,
        #[source]
        source: Box<Error>,
    },

    #[error("fetch worker failed: {0}")]
    Worker(String),
}

impl Error {
    /// Storage failures worth another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::FetchFailed { .. } | Error::Timeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
