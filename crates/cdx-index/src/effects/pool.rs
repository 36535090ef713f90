//! The page worker pool shared by single- and multi-endpoint readers.

use std::pin::Pin;
use std::sync::Arc;

use futures_util::Stream;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, warn};

use crate::core::PagePlan;
use crate::data::{MetadataEntry, Page, ReaderOptions};
use crate::effects::http::HttpClient;
use crate::effects::reader::IndexReader;
use crate::error::{Error, Result};

/// A boxed stream type for reader output.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Lazily produced index entries; page failures appear as `Err` items.
pub type EntryStream = BoxStream<'static, Result<MetadataEntry>>;

/// Start the pool for `readers` and return the consuming end.
///
/// One semaphore bounds every page request of every reader. Dropping the
/// stream stops new page requests; requests already in flight finish and
/// their results are discarded.
pub(crate) fn spawn<C: HttpClient + 'static>(readers: Vec<IndexReader<C>>, options: ReaderOptions) -> EntryStream {
    let (tx, rx) = mpsc::channel(options.channel_capacity.max(1));
    let fail_fast = options.fail_fast;
    tokio::spawn(drive(readers, options, tx));
    feed(rx, fail_fast)
}

async fn drive<C: HttpClient + 'static>(
    readers: Vec<IndexReader<C>>,
    options: ReaderOptions,
    tx: mpsc::Sender<Result<Page>>,
) {
    let semaphore = Arc::new(Semaphore::new(options.concurrency.max(1)));

    // Each endpoint's pages are scheduled as soon as its own count arrives,
    // so one slow count does not hold back the others.
    let mut counts: JoinSet<(usize, Result<u64>)> = JoinSet::new();
    for (source, reader) in readers.iter().enumerate() {
        let reader = reader.clone();
        let semaphore = Arc::clone(&semaphore);
        counts.spawn(async move {
            let outcome = match semaphore.acquire_owned().await {
                Ok(_permit) => reader.page_count().await,
                Err(e) => Err(Error::Worker(e.to_string())),
            };
            (source, outcome)
        });
    }

    let mut plan = PagePlan::new(readers.len());
    let mut workers = JoinSet::new();
    loop {
        while let Some(joined) = counts.try_join_next() {
            if !admit_count(joined, &readers, &mut plan, &tx, options.fail_fast).await {
                return;
            }
        }

        let Some(task) = plan.next_task() else {
            if counts.is_empty() {
                break;
            }
            let joined = tokio::select! {
                biased;
                _ = tx.closed() => break,
                joined = counts.join_next() => joined,
            };
            if let Some(joined) = joined
                && !admit_count(joined, &readers, &mut plan, &tx, options.fail_fast).await
            {
                return;
            }
            continue;
        };

        let permit = tokio::select! {
            biased;
            _ = tx.closed() => break,
            permit = Arc::clone(&semaphore).acquire_owned() => permit,
        };
        let Ok(permit) = permit else { break };

        while let Some(joined) = workers.try_join_next() {
            report_join(joined, &tx).await;
        }

        let reader = readers[task.source].clone();
        let tx = tx.clone();
        workers.spawn(async move {
            let outcome = reader.fetch_page(task.page).await;
            if let Err(e) = &outcome {
                warn!(endpoint = %reader.endpoint(), page = task.page, error = %e, "index page failed");
            }
            // The permit is held until the page is handed over, so a slow
            // consumer throttles the pool instead of piling up pages.
            let _ = tx.send(outcome).await;
            drop(permit);
        });
    }

    counts.abort_all();
    while let Some(joined) = workers.join_next().await {
        report_join(joined, &tx).await;
    }
}

/// Add a finished page count to `plan`. Returns `false` when the pool should
/// stop: the consumer is gone, or a count failed under `fail_fast`.
async fn admit_count<C: HttpClient + 'static>(
    joined: std::result::Result<(usize, Result<u64>), JoinError>,
    readers: &[IndexReader<C>],
    plan: &mut PagePlan,
    tx: &mpsc::Sender<Result<Page>>,
    fail_fast: bool,
) -> bool {
    match joined {
        Ok((source, Ok(pages))) => {
            let endpoint = readers[source].endpoint();
            if pages == 0 {
                debug!(%endpoint, "no index pages found");
            } else {
                debug!(%endpoint, pages, "scheduling index pages");
            }
            plan.add(source, pages);
            true
        }
        Ok((source, Err(e))) => {
            warn!(endpoint = %readers[source].endpoint(), error = %e, "page count failed");
            tx.send(Err(e)).await.is_ok() && !fail_fast
        }
        Err(e) => {
            error!(error = %e, "page count worker panicked");
            tx.send(Err(Error::Worker(e.to_string()))).await.is_ok() && !fail_fast
        }
    }
}

async fn report_join(joined: std::result::Result<(), JoinError>, tx: &mpsc::Sender<Result<Page>>) {
    if let Err(e) = joined {
        error!(error = %e, "page worker panicked");
        let _ = tx.send(Err(Error::Worker(e.to_string()))).await;
    }
}

struct Feed {
    rx: mpsc::Receiver<Result<Page>>,
    pending: std::vec::IntoIter<MetadataEntry>,
    fail_fast: bool,
    done: bool,
}

fn feed(rx: mpsc::Receiver<Result<Page>>, fail_fast: bool) -> EntryStream {
    let state = Feed {
        rx,
        pending: Vec::new().into_iter(),
        fail_fast,
        done: false,
    };

    Box::pin(futures_util::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(entry) = state.pending.next() {
                return Some((Ok(entry), state));
            }
            if state.done {
                return None;
            }
            match state.rx.recv().await {
                Some(Ok(page)) => state.pending = page.entries.into_iter(),
                Some(Err(e)) => {
                    if state.fail_fast {
                        state.done = true;
                        state.rx.close();
                    }
                    return Some((Err(e), state));
                }
                None => return None,
            }
        }
    }))
}
