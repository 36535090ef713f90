//! Concurrent reading of paginated CDX indexes.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable endpoints, entries and options
//! - [`core`] - Pure transformations: query URLs, decoding, scheduling
//! - [`effects`] - I/O behind the [`HttpClient`] trait
//!
//! # Key Features
//!
//! - **One pool, many collections**: page requests of every endpoint share a
//!   single bounded worker pool
//! - **Lazy**: entries are produced as pages complete; dropping the stream
//!   stops further requests
//! - **Contained failures**: a bad page is one `Err` item, not a lost run

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use crate::core::{PageCount, retry_delay};
pub use data::{DEFAULT_COLLECTION, DEFAULT_SERVER, IndexEndpoint, MetadataEntry, Page, ReaderOptions};
pub use effects::{BoxStream, EntryStream, HttpClient, HttpResponse, IndexClient, IndexReader, MultiIndexReader};

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;

pub use error::{Error, Result};
