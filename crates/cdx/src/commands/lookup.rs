use std::sync::Arc;

use anyhow::Context;
use cdx_index::{MetadataEntry, MultiIndexReader, ReqwestClient};
use futures_util::StreamExt;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::{info, warn};

use super::interrupted;
use crate::config::{GlobalArgs, LookupArgs};

pub async fn run(global: &GlobalArgs, args: LookupArgs) -> anyhow::Result<()> {
    let endpoints = global.endpoints(&args.indices)?;
    let http = Arc::new(ReqwestClient::new().context("failed to build HTTP client")?);
    let client = global.index_client(http);
    let mut out = BufWriter::new(tokio::io::stdout());
    let mut interrupt = std::pin::pin!(interrupted());

    for pattern in &args.patterns {
        let reader = MultiIndexReader::open(Arc::clone(&client), pattern, endpoints.clone(), global.reader_options())?;
        let mut items = reader.items().take_until(interrupt.as_mut());
        let mut printed = 0_u64;
        let mut page_failures = 0_u64;

        while let Some(item) = items.next().await {
            match item {
                Ok(entry) => {
                    print_entry(&mut out, &entry, args.print_metadata).await?;
                    printed += 1;
                }
                Err(e) if e.is_fatal() || global.fail_fast => {
                    out.flush().await?;
                    return Err(e).with_context(|| format!("lookup of '{pattern}' failed"));
                }
                Err(e) => {
                    warn!(pattern, error = %e, "skipping unreadable index page");
                    page_failures += 1;
                }
            }
        }

        info!(pattern, printed, page_failures, "lookup finished");
        if items.is_stopped() {
            break;
        }
    }

    out.flush().await?;
    Ok(())
}

async fn print_entry<W: AsyncWrite + Unpin>(out: &mut W, entry: &MetadataEntry, metadata: bool) -> anyhow::Result<()> {
    let line = if metadata {
        format!("{}\t{}\n", entry.url, serde_json::to_string(entry)?)
    } else {
        format!("{}\n", entry.url)
    };
    out.write_all(line.as_bytes()).await?;
    Ok(())
}
