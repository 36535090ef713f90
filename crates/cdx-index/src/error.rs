//! Error types for cdx-index.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid page count response from {endpoint}: {body}")]
    InvalidIndexResponse { endpoint: String, body: String },

    #[error("failed to decode line from {endpoint} page {page}: {line:?}: {source}")]
    Decode {
        endpoint: String,
        page: u64,
        line: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no index endpoints specified")]
    NoEndpointsSpecified,

    #[error("invalid index endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} timed out after {after:?}")]
    Timeout { url: String, after: Duration },

    #[error("page worker failed: {0}")]
    Worker(String),
}

impl Error {
    /// Errors that invalidate the whole operation rather than a single page.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::InvalidIndexResponse { .. } | Error::NoEndpointsSpecified | Error::InvalidEndpoint(_)
        )
    }

    /// Errors worth another attempt with the same request.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Network { .. } | Error::Timeout { .. } => true,
            Error::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_errors_are_fatal() {
        assert!(Error::NoEndpointsSpecified.is_fatal());
        assert!(
            Error::InvalidIndexResponse {
                endpoint: "e".into(),
                body: "[]".into()
            }
            .is_fatal()
        );
        assert!(
            !Error::Timeout {
                url: "u".into(),
                after: Duration::from_secs(1)
            }
            .is_fatal()
        );
    }

    #[test]
    fn only_network_shaped_errors_are_transient() {
        assert!(Error::Status { url: "u".into(), status: 503 }.is_transient());
        assert!(Error::Status { url: "u".into(), status: 429 }.is_transient());
        assert!(!Error::Status { url: "u".into(), status: 404 }.is_transient());

        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::Decode {
            endpoint: "e".into(),
            page: 3,
            line: "{".into(),
            source: decode,
        };
        assert!(!err.is_transient());
        assert!(err.to_string().contains("page 3"));
    }
}
