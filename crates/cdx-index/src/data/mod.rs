//! Immutable types for index reading: endpoints, entries and options.

pub mod endpoint;
pub mod entry;
pub mod options;

pub use endpoint::{DEFAULT_COLLECTION, DEFAULT_SERVER, IndexEndpoint};
pub use entry::{MetadataEntry, Page};
pub use options::{ReaderOptions, default_concurrency};
