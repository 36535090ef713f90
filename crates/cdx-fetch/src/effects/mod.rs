//! I/O: blob stores, the content fetcher, record sinks and the pipeline.

mod fetcher;
mod pipeline;
mod sink;
mod store;

pub use fetcher::ContentFetcher;
pub use pipeline::FetchPipeline;
pub use sink::{DirectorySink, RecordSink, WriterSink};
pub use store::{BlobStore, DEFAULT_BLOB_URL, FsBlobStore, HttpBlobStore, StoreError};
