use std::future::Future;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::core::retry_delay;
use crate::data::{IndexEndpoint, Page, ReaderOptions};
use crate::effects::client::IndexClient;
use crate::effects::http::HttpClient;
use crate::effects::pool::{self, EntryStream};
use crate::error::Result;

/// Reader over every page of one index endpoint for one URL pattern.
///
/// Cloning is cheap and clones share the cached page count, so the count is
/// requested at most once per reader no matter how many times it is asked
/// for.
pub struct IndexReader<C: HttpClient> {
    client: Arc<IndexClient<C>>,
    endpoint: IndexEndpoint,
    pattern: Arc<str>,
    options: ReaderOptions,
    pages: Arc<OnceCell<u64>>,
}

impl<C: HttpClient> Clone for IndexReader<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            endpoint: self.endpoint.clone(),
            pattern: Arc::clone(&self.pattern),
            options: self.options.clone(),
            pages: Arc::clone(&self.pages),
        }
    }
}

impl<C: HttpClient + 'static> IndexReader<C> {
    pub fn open(
        client: Arc<IndexClient<C>>,
        endpoint: IndexEndpoint,
        pattern: impl Into<String>,
        options: ReaderOptions,
    ) -> Self {
        let pattern: String = pattern.into();
        info!(%endpoint, pattern, "opening index reader");
        Self {
            client,
            endpoint,
            pattern: Arc::from(pattern),
            options,
            pages: Arc::new(OnceCell::new()),
        }
    }

    pub fn endpoint(&self) -> &IndexEndpoint {
        &self.endpoint
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Number of matching pages, requested once and cached.
    pub async fn page_count(&self) -> Result<u64> {
        self.pages
            .get_or_try_init(|| {
                with_retries(&self.options, &self.endpoint, None, || {
                    self.client.page_count(&self.endpoint, &self.pattern)
                })
            })
            .await
            .copied()
    }

    /// Fetch one page, retrying transient failures.
    pub async fn fetch_page(&self, page: u64) -> Result<Page> {
        with_retries(&self.options, &self.endpoint, Some(page), || {
            self.client.fetch_page(&self.endpoint, &self.pattern, page)
        })
        .await
    }

    /// Every entry of every page, fetched through a pool of
    /// `options.concurrency` workers.
    ///
    /// Pages arrive in completion order; entries within a page keep their
    /// order. A failed page shows up as an `Err` item where its entries would
    /// have been. Must be called inside a tokio runtime.
    pub fn items(&self) -> EntryStream {
        pool::spawn(vec![self.clone()], self.options.clone())
    }
}

pub(crate) async fn with_retries<T, F, Fut>(
    options: &ReaderOptions,
    endpoint: &IndexEndpoint,
    page: Option<u64>,
    mut attempt: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut retry = 0;
    loop {
        match attempt().await {
            Err(e) if e.is_transient() && retry < options.max_retries => {
                let delay = retry_delay(retry, options.retry_backoff);
                warn!(%endpoint, ?page, error = %e, retry = retry + 1, ?delay, "retrying index request");
                tokio::time::sleep(delay).await;
                retry += 1;
            }
            result => return result,
        }
    }
}
