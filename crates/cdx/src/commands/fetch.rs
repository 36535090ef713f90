use std::sync::Arc;

use anyhow::Context;
use cdx_fetch::{
    BlobStore, ContentFetcher, DirectorySink, FetchPipeline, FsBlobStore, HttpBlobStore, PipelineReport, RecordSink,
    WriterSink,
};
use cdx_index::{EntryStream, MultiIndexReader, ReqwestClient};
use futures_util::{StreamExt, stream};
use tracing::{info, warn};

use super::interrupted;
use crate::config::{FetchArgs, GlobalArgs};

pub async fn run(global: &GlobalArgs, args: FetchArgs) -> anyhow::Result<()> {
    let http = Arc::new(ReqwestClient::new().context("failed to build HTTP client")?);
    let entries = entries(global, &args, Arc::clone(&http))?;

    let report = match &args.mirror {
        Some(root) => with_store(global, &args, FsBlobStore::new(root), entries).await?,
        None => {
            let store = HttpBlobStore::new(http, &args.blob_url).context("invalid --blob-url")?;
            with_store(global, &args, store, entries).await?
        }
    };

    if !report.is_clean() {
        warn!(failed = report.failures.len(), page_failures = report.page_failures, "some records were not fetched");
    }
    Ok(())
}

/// Entries of every pattern in order, as one stream, ending early on Ctrl-C.
fn entries(global: &GlobalArgs, args: &FetchArgs, http: Arc<ReqwestClient>) -> anyhow::Result<EntryStream> {
    let endpoints = global.endpoints(&args.indices)?;
    let client = global.index_client(http);
    let readers = args
        .patterns
        .iter()
        .map(|pattern| MultiIndexReader::open(Arc::clone(&client), pattern, endpoints.clone(), global.reader_options()))
        .collect::<Result<Vec<_>, _>>()?;

    // Each reader starts its pages only once the previous pattern is done.
    let all = stream::iter(readers).flat_map(|reader| reader.items());
    Ok(Box::pin(all.take_until(Box::pin(interrupted()))))
}

async fn with_store<S: BlobStore + 'static>(
    global: &GlobalArgs,
    args: &FetchArgs,
    store: S,
    entries: EntryStream,
) -> anyhow::Result<PipelineReport> {
    let fetcher = ContentFetcher::new(store, args.fetch_options(global));
    if args.output_to_file {
        let sink = DirectorySink::create(&args.output_dir)
            .await
            .with_context(|| format!("cannot create {}", args.output_dir.display()))?;
        with_sink(global, fetcher, sink, entries).await
    } else {
        let sink = WriterSink::new(tokio::io::stdout()).separator("\n");
        with_sink(global, fetcher, sink, entries).await
    }
}

async fn with_sink<S: BlobStore + 'static, K: RecordSink + 'static>(
    global: &GlobalArgs,
    fetcher: ContentFetcher<S>,
    sink: K,
    entries: EntryStream,
) -> anyhow::Result<PipelineReport> {
    let pipeline = FetchPipeline::new(fetcher, sink, global.pipeline_options());
    let report = pipeline.run(entries).await.context("fetch failed")?;
    info!(%report, "fetch finished");
    Ok(report)
}
