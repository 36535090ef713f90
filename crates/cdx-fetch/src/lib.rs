//! Retrieval of archived records located by CDX index entries.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Byte ranges, records, options and run reports
//! - [`core`] - Pure pieces: dedup decisions, gzip decoding, file naming
//! - [`effects`] - Storage reads, sinks and the [`FetchPipeline`]
//!
//! # Key Features
//!
//! - **Fetched once**: entries sharing a urlkey or a digest are downloaded
//!   at most once per run
//! - **Bounded**: record fetches run in their own fixed-size pool
//! - **Partial failure**: a broken record is reported, not fatal
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use cdx_fetch::{ContentFetcher, FetchOptions, FetchPipeline, HttpBlobStore, PipelineOptions, WriterSink};
//! use cdx_index::{IndexClient, IndexEndpoint, MultiIndexReader, ReaderOptions, ReqwestClient};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let http = Arc::new(ReqwestClient::new()?);
//! let endpoint = IndexEndpoint::from_collection(cdx_index::DEFAULT_SERVER, "CC-MAIN-2015-06")?;
//! let reader = MultiIndexReader::open(
//!     Arc::new(IndexClient::new(Arc::clone(&http))),
//!     "example.com/*",
//!     vec![endpoint],
//!     ReaderOptions::default(),
//! )?;
//!
//! let store = HttpBlobStore::new(http, cdx_fetch::DEFAULT_BLOB_URL)?;
//! let pipeline = FetchPipeline::new(
//!     ContentFetcher::new(store, FetchOptions::default()),
//!     WriterSink::new(tokio::io::stdout()),
//!     PipelineOptions::default(),
//! );
//! let report = pipeline.run_reader(&reader).await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use crate::core::{DedupGate, gunzip, record_file_name};
pub use data::{ByteRange, EntryFailure, FetchOptions, PipelineOptions, PipelineReport, RawRecord};
pub use effects::{
    BlobStore, ContentFetcher, DEFAULT_BLOB_URL, DirectorySink, FetchPipeline, FsBlobStore, HttpBlobStore, RecordSink,
    StoreError, WriterSink,
};
pub use error::{Error, Result};
