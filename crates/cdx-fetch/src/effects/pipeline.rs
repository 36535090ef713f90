use std::sync::Arc;

use cdx_index::{HttpClient, MetadataEntry, MultiIndexReader, retry_delay};
use futures_util::{Stream, StreamExt};
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};

use crate::core::DedupGate;
use crate::data::{ByteRange, EntryFailure, PipelineOptions, PipelineReport};
use crate::effects::fetcher::ContentFetcher;
use crate::effects::sink::RecordSink;
use crate::effects::store::BlobStore;
use crate::error::{Error, Result};

type Outcome = (MetadataEntry, Result<u64>);

/// Index entries in, deduplicated records out.
///
/// Each run owns a fresh [`DedupGate`] and a pool of
/// `options.concurrency` fetch workers, independent of whatever pool
/// produced the entries.
///
/// # Failure handling
///
/// - Per-entry fetch, decompress and write failures are collected in the
///   [`PipelineReport`] and the run continues
/// - Unreadable index pages are counted and skipped
/// - Fatal index errors end the run with an error
/// - With `fail_fast`, the first failure of any kind ends the run
///
/// In every case outstanding fetches are awaited before `run` returns.
pub struct FetchPipeline<S: BlobStore, K: RecordSink> {
    fetcher: Arc<ContentFetcher<S>>,
    sink: Arc<K>,
    options: PipelineOptions,
}

impl<S: BlobStore + 'static, K: RecordSink + 'static> FetchPipeline<S, K> {
    pub fn new(fetcher: ContentFetcher<S>, sink: K, options: PipelineOptions) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            sink: Arc::new(sink),
            options,
        }
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Read every entry of `reader` and fetch the admitted ones.
    ///
    /// The reader runs with this pipeline's `fail_fast`, so without it an
    /// unreadable page is counted and skipped rather than ending the index
    /// stream early.
    pub async fn run_reader<C: HttpClient + 'static>(&self, reader: &MultiIndexReader<C>) -> Result<PipelineReport> {
        let options = reader.options().clone().fail_fast(self.options.fail_fast);
        self.run(reader.items_with(options)).await
    }

    /// Drain `entries`, fetching each admitted entry into the sink.
    ///
    /// Stops pulling from `entries` as soon as the run is aborted, which in
    /// turn stops an index reader from requesting further pages.
    pub async fn run<St>(&self, entries: St) -> Result<PipelineReport>
    where
        St: Stream<Item = cdx_index::Result<MetadataEntry>> + Send,
    {
        let mut entries = Box::pin(entries);
        let gate = DedupGate::new();
        let semaphore = Arc::new(Semaphore::new(self.options.concurrency.max(1)));
        let mut workers: JoinSet<Outcome> = JoinSet::new();
        let mut report = PipelineReport::default();
        let mut abort: Option<Error> = None;

        info!(concurrency = self.options.concurrency, "starting fetch pipeline");

        while abort.is_none() {
            let Some(item) = entries.next().await else { break };

            let entry = match item {
                Ok(entry) => entry,
                Err(e) if e.is_fatal() => {
                    error!(error = %e, "index unusable, stopping");
                    abort = Some(Error::Index(e));
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "skipping unreadable index page");
                    report.page_failures += 1;
                    if self.options.fail_fast {
                        abort = Some(Error::Index(e));
                    }
                    continue;
                }
            };

            report.entries += 1;
            if !gate.admit(&entry.urlkey, &entry.digest) {
                debug!(url = %entry.url, digest = %entry.digest, "duplicate, skipping");
                report.duplicates += 1;
                continue;
            }

            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    abort = Some(Error::Worker(e.to_string()));
                    break;
                }
            };

            while let Some(joined) = workers.try_join_next() {
                self.settle(joined, &mut report, &mut abort);
            }
            if abort.is_some() {
                break;
            }

            let fetcher = Arc::clone(&self.fetcher);
            let sink = Arc::clone(&self.sink);
            let options = self.options.clone();
            workers.spawn(async move {
                let outcome = deliver(&fetcher, sink.as_ref(), &entry, &options).await;
                drop(permit);
                (entry, outcome)
            });
        }

        // Stop the index side before waiting on stragglers.
        drop(entries);

        while let Some(joined) = workers.join_next().await {
            self.settle(joined, &mut report, &mut abort);
        }

        if let Err(e) = self.sink.flush().await {
            if abort.is_none() {
                return Err(Error::Sink(e));
            }
            warn!(error = %e, "sink flush failed after abort");
        }

        match abort {
            Some(e) => {
                warn!(%report, "fetch pipeline aborted");
                Err(e)
            }
            None => {
                info!(%report, "fetch pipeline finished");
                Ok(report)
            }
        }
    }

    fn settle(
        &self,
        joined: std::result::Result<Outcome, JoinError>,
        report: &mut PipelineReport,
        abort: &mut Option<Error>,
    ) {
        match joined {
            Ok((_, Ok(bytes))) => {
                report.fetched += 1;
                report.bytes_written += bytes;
            }
            Ok((entry, Err(e))) => {
                let failure = EntryFailure {
                    url: entry.url.clone(),
                    filename: entry.filename.clone(),
                    range: ByteRange::for_record(entry.offset, entry.length),
                    error: e.to_string(),
                };
                warn!(
                    url = %failure.url,
                    filename = %failure.filename,
                    range = ?failure.range,
                    error = %failure.error,
                    "record fetch failed"
                );
                report.failures.push(failure);
                if self.options.fail_fast && abort.is_none() {
                    *abort = Some(Error::Aborted {
                        url: entry.url,
                        source: Box::new(e),
                    });
                }
            }
            Err(e) => {
                error!(error = %e, "fetch worker panicked");
                report.lost_workers += 1;
                if self.options.fail_fast && abort.is_none() {
                    *abort = Some(Error::Worker(e.to_string()));
                }
            }
        }
    }
}

/// Fetch with retries, then hand the record to the sink. Returns the number
/// of bytes written.
async fn deliver<S: BlobStore, K: RecordSink>(
    fetcher: &ContentFetcher<S>,
    sink: &K,
    entry: &MetadataEntry,
    options: &PipelineOptions,
) -> Result<u64> {
    let mut retry = 0;
    let record = loop {
        match fetcher.fetch(entry).await {
            Ok(record) => break record,
            Err(e) if e.is_transient() && retry < options.max_retries => {
                let delay = retry_delay(retry, options.retry_backoff);
                warn!(url = %entry.url, error = %e, retry = retry + 1, ?delay, "retrying record fetch");
                tokio::time::sleep(delay).await;
                retry += 1;
            }
            Err(e) => return Err(e),
        }
    };

    sink.write_record(entry, &record).await.map_err(Error::Sink)?;
    Ok(record.len() as u64)
}
