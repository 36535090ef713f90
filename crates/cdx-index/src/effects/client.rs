use std::time::Duration;

use bytes::Bytes;
use tracing::debug;
use url::Url;

use crate::core::{decode_page, decode_page_count, page_count_url, page_url};
use crate::data::{IndexEndpoint, Page};
use crate::effects::http::HttpClient;
use crate::error::{Error, Result};

/// Fetches page counts and single pages from an index endpoint.
///
/// Stateless apart from the transport: every call is one request, so calls
/// are idempotent and safe to retry.
#[derive(Debug)]
pub struct IndexClient<C: HttpClient> {
    http: C,
    timeout: Duration,
}

impl<C: HttpClient> IndexClient<C> {
    pub fn new(http: C) -> Self {
        Self {
            http,
            timeout: Duration::from_secs(30),
        }
    }

    /// Deadline applied to every request.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    /// Number of pages matching `pattern`. Zero means no matches.
    pub async fn page_count(&self, endpoint: &IndexEndpoint, pattern: &str) -> Result<u64> {
        let body = self.get(page_count_url(endpoint, pattern)).await?;
        let pages = decode_page_count(endpoint, &body)?;
        debug!(%endpoint, pattern, pages, "resolved page count");
        Ok(pages)
    }

    /// Entries of page `page`, in server order.
    pub async fn fetch_page(&self, endpoint: &IndexEndpoint, pattern: &str, page: u64) -> Result<Page> {
        let body = self.get(page_url(endpoint, pattern, page)).await?;
        let entries = decode_page(endpoint, page, &body)?;
        debug!(%endpoint, page, entries = entries.len(), "fetched index page");
        Ok(Page {
            endpoint: endpoint.clone(),
            number: page,
            entries,
        })
    }

    async fn get(&self, url: Url) -> Result<Bytes> {
        let response = tokio::time::timeout(self.timeout, self.http.get(url.as_str(), &[]))
            .await
            .map_err(|_| Error::Timeout {
                url: url.to_string(),
                after: self.timeout,
            })?
            .map_err(|e| Error::Network {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if !response.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: response.status,
            });
        }
        Ok(response.body)
    }
}
