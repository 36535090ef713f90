use cdx_index::MetadataEntry;
use tracing::debug;

use crate::core::gunzip;
use crate::data::{ByteRange, FetchOptions, RawRecord};
use crate::effects::store::BlobStore;
use crate::error::{Error, Result};

/// Retrieves the record an index entry points at.
///
/// One range read of `length` bytes at `offset` in `filename`, then gzip
/// decompression unless [`FetchOptions::keep_compressed`] is set. No retries
/// happen here; see [`crate::FetchPipeline`].
#[derive(Debug)]
pub struct ContentFetcher<S: BlobStore> {
    store: S,
    options: FetchOptions,
}

impl<S: BlobStore> ContentFetcher<S> {
    pub fn new(store: S, options: FetchOptions) -> Self {
        Self { store, options }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Fetch and, by default, decompress the record behind `entry`.
    pub async fn fetch(&self, entry: &MetadataEntry) -> Result<RawRecord> {
        let range = ByteRange::for_record(entry.offset, entry.length).ok_or_else(|| Error::InvalidRange {
            filename: entry.filename.clone(),
            offset: entry.offset,
            length: entry.length,
        })?;

        debug!(url = %entry.url, filename = %entry.filename, %range, "fetching record");
        let data = tokio::time::timeout(self.options.timeout, self.store.get(&entry.filename, Some(range)))
            .await
            .map_err(|_| Error::Timeout {
                filename: entry.filename.clone(),
                range,
                after: self.options.timeout,
            })?
            .map_err(|e| Error::FetchFailed {
                filename: entry.filename.clone(),
                range,
                message: e.to_string(),
            })?;

        if data.len() as u64 != range.len() {
            return Err(Error::FetchFailed {
                filename: entry.filename.clone(),
                range,
                message: format!("expected {} bytes, received {}", range.len(), data.len()),
            });
        }

        if self.options.keep_compressed {
            return Ok(RawRecord {
                data,
                compressed: true,
                stored_len: entry.length,
            });
        }

        let plain = gunzip(&data).map_err(|source| Error::DecompressFailed {
            filename: entry.filename.clone(),
            source,
        })?;
        Ok(RawRecord {
            data: plain.into(),
            compressed: false,
            stored_len: entry.length,
        })
    }
}
