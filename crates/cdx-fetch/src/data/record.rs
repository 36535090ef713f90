use bytes::Bytes;

/// The bytes of one archived record as handed to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Decompressed record, or the gzip member verbatim when `compressed`.
    pub data: Bytes,
    /// True when decompression was skipped.
    pub compressed: bool,
    /// Size of the gzip member in the container, from the index entry.
    pub stored_len: u64,
}

impl RawRecord {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
