//! Pure pieces of the fetch path: dedup decisions, decompression, naming.

mod decompress;
mod dedup;
mod naming;

pub use decompress::gunzip;
pub use dedup::DedupGate;
pub use naming::record_file_name;
