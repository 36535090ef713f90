use std::sync::Arc;

use tracing::info;

use crate::data::{IndexEndpoint, ReaderOptions};
use crate::effects::client::IndexClient;
use crate::effects::http::HttpClient;
use crate::effects::pool::{self, EntryStream};
use crate::effects::reader::IndexReader;
use crate::error::{Error, Result};

/// Several index collections queried as one.
///
/// Page work from every endpoint goes through a single pool of
/// `options.concurrency` workers, scheduled round-robin across endpoints.
pub struct MultiIndexReader<C: HttpClient> {
    readers: Vec<IndexReader<C>>,
    options: ReaderOptions,
}

impl<C: HttpClient + 'static> MultiIndexReader<C> {
    /// Open one reader per endpoint, in the given order.
    ///
    /// Fails with [`Error::NoEndpointsSpecified`] before any I/O when
    /// `endpoints` is empty.
    pub fn open(
        client: Arc<IndexClient<C>>,
        pattern: impl Into<String>,
        endpoints: Vec<IndexEndpoint>,
        options: ReaderOptions,
    ) -> Result<Self> {
        if endpoints.is_empty() {
            return Err(Error::NoEndpointsSpecified);
        }
        let pattern: String = pattern.into();
        info!(pattern, endpoints = endpoints.len(), "opening multi-index reader");

        let readers = endpoints
            .into_iter()
            .map(|endpoint| IndexReader::open(Arc::clone(&client), endpoint, pattern.clone(), options.clone()))
            .collect();
        Ok(Self { readers, options })
    }

    pub fn readers(&self) -> &[IndexReader<C>] {
        &self.readers
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Sum of the page counts of every endpoint.
    pub async fn page_count(&self) -> Result<u64> {
        let mut total = 0_u64;
        for reader in &self.readers {
            total = total.saturating_add(reader.page_count().await?);
        }
        Ok(total)
    }

    /// Entries of every endpoint, flattened into one stream.
    ///
    /// Same ordering and failure semantics as [`IndexReader::items`].
    pub fn items(&self) -> EntryStream {
        self.items_with(self.options.clone())
    }

    /// Like [`items`](Self::items), with the pool run under `options`.
    ///
    /// Concurrency, channel capacity and `fail_fast` come from `options`;
    /// retries and timeouts stay those each endpoint was opened with.
    pub fn items_with(&self, options: ReaderOptions) -> EntryStream {
        pool::spawn(self.readers.clone(), options)
    }
}
