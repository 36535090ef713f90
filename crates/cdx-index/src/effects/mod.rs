//! I/O: the HTTP seam, the page fetcher and the readers built on it.

mod client;
mod http;
mod multi;
mod pool;
mod reader;

pub use client::IndexClient;
pub use http::{HttpClient, HttpResponse};
pub use multi::MultiIndexReader;
pub use pool::{BoxStream, EntryStream};
pub use reader::IndexReader;

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
