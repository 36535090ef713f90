use std::time::Duration;

use cdx_index::data::default_concurrency;

/// Configuration for fetching a single record.
///
/// # Examples
///
/// ```
/// use cdx_fetch::FetchOptions;
/// use std::time::Duration;
///
/// let options = FetchOptions::default()
///     .timeout(Duration::from_secs(10))
///     .keep_compressed(true);
/// ```
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Upper bound for one range read.
    ///
    /// Default: 60s
    pub timeout: Duration,

    /// Return the gzip member verbatim instead of decompressing it.
    ///
    /// Default: false
    pub keep_compressed: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            keep_compressed: false,
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn keep_compressed(mut self, keep_compressed: bool) -> Self {
        self.keep_compressed = keep_compressed;
        self
    }
}

/// Configuration for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Maximum number of record fetches in flight. Independent of the index
    /// reader's page pool.
    ///
    /// Default: available parallelism
    pub concurrency: usize,

    /// Stop at the first per-entry or per-page failure.
    ///
    /// - Outstanding fetches are still awaited before returning
    /// - The run then fails with [`crate::Error::Aborted`] or the page error
    ///
    /// Default: false
    pub fail_fast: bool,

    /// Retries after the first attempt for storage failures and timeouts.
    /// Decompression failures are never retried.
    ///
    /// Default: 2
    pub max_retries: u32,

    /// Base delay for exponential backoff between retries.
    ///
    /// Default: 100ms
    pub retry_backoff: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            fail_fast: false,
            max_retries: 2,
            retry_backoff: Duration::from_millis(100),
        }
    }
}

impl PipelineOptions {
    /// Set the worker pool size. Zero is raised to one.
    #[must_use]
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    #[must_use]
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }
}
