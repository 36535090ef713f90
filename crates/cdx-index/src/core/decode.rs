use serde_json::Value;

use crate::data::{IndexEndpoint, MetadataEntry};
use crate::error::{Error, Result};

/// The two wire shapes a page count may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCount {
    /// A bare JSON integer: `3`.
    Bare(u64),
    /// An object with a `pages` field: `{"pages": 3, "pageSize": 5}`.
    Paged(u64),
}

impl PageCount {
    /// Classify a decoded response. Anything but the two known shapes is `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().map(PageCount::Bare),
            Value::Object(map) => map.get("pages").and_then(Value::as_u64).map(PageCount::Paged),
            _ => None,
        }
    }

    pub fn pages(self) -> u64 {
        match self {
            PageCount::Bare(n) | PageCount::Paged(n) => n,
        }
    }
}

/// Decode the body of a `showNumPages` request.
pub fn decode_page_count(endpoint: &IndexEndpoint, body: &[u8]) -> Result<u64> {
    serde_json::from_slice::<Value>(body)
        .ok()
        .as_ref()
        .and_then(PageCount::from_value)
        .map(PageCount::pages)
        .ok_or_else(|| Error::InvalidIndexResponse {
            endpoint: endpoint.to_string(),
            body: String::from_utf8_lossy(body).into_owned(),
        })
}

/// Decode a newline-delimited JSON page body, skipping blank lines.
///
/// Lines are parsed as raw bytes, so invalid UTF-8 inside a line is a decode
/// error rather than a silently substituted character. The first malformed
/// line fails the whole page.
pub fn decode_page(endpoint: &IndexEndpoint, page: u64, body: &[u8]) -> Result<Vec<MetadataEntry>> {
    body.split(|b| *b == b'\n')
        .map(<[u8]>::trim_ascii)
        .filter(|line| !line.is_empty())
        .map(|line| {
            serde_json::from_slice(line).map_err(|source| Error::Decode {
                endpoint: endpoint.to_string(),
                page,
                line: String::from_utf8_lossy(line).into_owned(),
                source,
            })
        })
        .collect()
}
