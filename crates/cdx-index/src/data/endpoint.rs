use std::fmt;

use url::Url;

use crate::error::{Error, Result};

/// Index server used when none is configured.
pub const DEFAULT_SERVER: &str = "http://index.commoncrawl.org/";

/// Collection queried when a caller names none.
pub const DEFAULT_COLLECTION: &str = "CC-MAIN-2015-06";

/// Base URL of one queryable index collection.
///
/// Immutable once constructed; cloning is cheap enough to hand one to every
/// page worker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexEndpoint {
    url: Url,
}

impl IndexEndpoint {
    /// Build the endpoint for `collection` hosted on `server`.
    ///
    /// ```
    /// use cdx_index::IndexEndpoint;
    ///
    /// let endpoint = IndexEndpoint::from_collection("http://index.commoncrawl.org/", "CC-MAIN-2015-14").unwrap();
    /// assert_eq!(endpoint.as_str(), "http://index.commoncrawl.org/CC-MAIN-2015-14-index");
    /// ```
    pub fn from_collection(server: &str, collection: &str) -> Result<Self> {
        let collection = collection.trim();
        if collection.is_empty() {
            return Err(Error::InvalidEndpoint("empty collection identifier".into()));
        }
        let base = if server.ends_with('/') {
            server.to_string()
        } else {
            format!("{server}/")
        };
        Self::parse(&format!("{base}{collection}-index"))
    }

    /// Use `url` verbatim as the endpoint.
    pub fn parse(url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| Error::InvalidEndpoint(format!("{url}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidEndpoint(format!(
                "{url}: unsupported scheme '{}'",
                url.scheme()
            )));
        }
        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for IndexEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
