use std::num::NonZeroUsize;
use std::time::Duration;

/// Configuration for index reading.
///
/// # Examples
///
/// ```
/// use cdx_index::ReaderOptions;
/// use std::time::Duration;
///
/// let options = ReaderOptions::default()
///     .concurrency(8)
///     .timeout(Duration::from_secs(10))
///     .fail_fast(false);
/// ```
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// Maximum number of page requests in flight, shared by every endpoint
    /// of a reader.
    ///
    /// Default: available parallelism
    pub concurrency: usize,

    /// Upper bound for a single index request.
    ///
    /// Default: 30s
    pub timeout: Duration,

    /// Retries after the first attempt for transient page failures.
    /// Decode failures are never retried.
    ///
    /// Default: 2
    pub max_retries: u32,

    /// Base delay for exponential backoff between retries.
    ///
    /// Default: 100ms
    pub retry_backoff: Duration,

    /// End the entry stream after the first page error instead of carrying on
    /// with the remaining pages.
    ///
    /// Default: true
    pub fail_fast: bool,

    /// Completed pages buffered ahead of the consumer.
    ///
    /// Default: 16
    pub channel_capacity: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
            retry_backoff: Duration::from_millis(100),
            fail_fast: true,
            channel_capacity: 16,
        }
    }
}

impl ReaderOptions {
    /// Set the worker pool size. Zero is raised to one.
    #[must_use]
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
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

    #[must_use]
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    #[must_use]
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }
}

/// Worker pool size used when none is configured.
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = ReaderOptions::default();
        assert!(options.concurrency >= 1);
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert_eq!(options.max_retries, 2);
        assert!(options.fail_fast);
    }

    #[test]
    fn zero_sizes_are_clamped() {
        let options = ReaderOptions::default().concurrency(0).channel_capacity(0);
        assert_eq!(options.concurrency, 1);
        assert_eq!(options.channel_capacity, 1);
    }
}
