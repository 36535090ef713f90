use std::future::Future;
use std::io::{self, SeekFrom};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use cdx_index::{HttpClient, HttpResponse};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use url::Url;

use crate::data::ByteRange;

/// Range-readable object storage holding container files.
///
/// The only capability the fetch path needs: the bytes of `key`, optionally
/// restricted to `range`. Credentials and provider specifics stay inside the
/// implementation.
pub trait BlobStore: Send + Sync {
    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read `range` of object `key`, or the whole object for `None`.
    fn get(&self, key: &str, range: Option<ByteRange>) -> impl Future<Output = Result<Bytes, Self::Error>> + Send;
}

impl<S: BlobStore> BlobStore for Arc<S> {
    type Error = S::Error;

    fn get(&self, key: &str, range: Option<ByteRange>) -> impl Future<Output = Result<Bytes, Self::Error>> + Send {
        (**self).get(key, range)
    }
}

/// Errors from the bundled stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid object key '{0}'")]
    InvalidKey(String),

    #[error("request to {url} failed: {message}")]
    Http { url: String, message: String },

    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A store reached over HTTP(S) range requests, such as a public bucket
/// gateway.
#[derive(Debug)]
pub struct HttpBlobStore<C: HttpClient> {
    http: C,
    base: Url,
}

/// Public HTTPS gateway for the Common Crawl bucket.
pub const DEFAULT_BLOB_URL: &str = "https://data.commoncrawl.org/";

impl<C: HttpClient> HttpBlobStore<C> {
    /// Objects are resolved relative to `base`.
    pub fn new(http: C, base: &str) -> Result<Self, StoreError> {
        let base = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        let base = Url::parse(&base).map_err(|e| StoreError::InvalidKey(format!("{base}: {e}")))?;
        Ok(Self { http, base })
    }

    fn object_url(&self, key: &str) -> Result<Url, StoreError> {
        self.base
            .join(key.trim_start_matches('/'))
            .map_err(|e| StoreError::InvalidKey(format!("{key}: {e}")))
    }
}

impl<C: HttpClient> BlobStore for HttpBlobStore<C> {
    type Error = StoreError;

    async fn get(&self, key: &str, range: Option<ByteRange>) -> Result<Bytes, StoreError> {
        let url = self.object_url(key)?;
        let headers: Vec<(String, String)> = range
            .map(|r| vec![("Range".to_string(), r.header_value())])
            .unwrap_or_default();

        let HttpResponse { status, body } =
            self.http
                .get(url.as_str(), &headers)
                .await
                .map_err(|e| StoreError::Http {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        match (status, range) {
            (206, _) | (200, None) => Ok(body),
            // Server ignored the Range header and sent the whole object.
            (200, Some(r)) => slice_whole_object(body, r).ok_or(StoreError::Status {
                url: url.to_string(),
                status,
            }),
            _ => Err(StoreError::Status {
                url: url.to_string(),
                status,
            }),
        }
    }
}

fn slice_whole_object(body: Bytes, range: ByteRange) -> Option<Bytes> {
    let start = usize::try_from(range.start).ok()?;
    let end = usize::try_from(range.end).ok()?;
    (end < body.len()).then(|| body.slice(start..=end))
}

/// A store backed by a local mirror directory.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(key.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl BlobStore for FsBlobStore {
    type Error = StoreError;

    async fn get(&self, key: &str, range: Option<ByteRange>) -> Result<Bytes, StoreError> {
        let path = self.object_path(key)?;
        let mut file = tokio::fs::File::open(&path).await?;

        let Some(range) = range else {
            let mut buf = Vec::new();
            file.read_to_end(&mut buf).await?;
            return Ok(Bytes::from(buf));
        };

        let len = usize::try_from(range.len()).map_err(|_| StoreError::InvalidKey(key.to_string()))?;
        file.seek(SeekFrom::Start(range.start)).await?;
        let mut buf = vec![0; len];
        file.read_exact(&mut buf).await?;
        Ok(Bytes::from(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_object_is_sliced_to_range() {
        let body = Bytes::from_static(b"0123456789");
        let range = ByteRange::for_record(2, 3).unwrap();
        assert_eq!(slice_whole_object(body.clone(), range).unwrap(), &b"234"[..]);

        let past_end = ByteRange::for_record(8, 5).unwrap();
        assert!(slice_whole_object(body, past_end).is_none());
    }

    #[test]
    fn fs_keys_cannot_escape_the_root() {
        let store = FsBlobStore::new("/data/mirror");
        assert!(store.object_path("../etc/passwd").is_err());
        assert!(store.object_path("crawl/../../x").is_err());
        assert_eq!(
            store.object_path("/crawl-data/a.warc.gz").unwrap(),
            PathBuf::from("/data/mirror/crawl-data/a.warc.gz")
        );
    }

    #[tokio::test]
    async fn fs_store_reads_exact_range() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("segments")).unwrap();
        std::fs::write(dir.path().join("segments/part-0.warc.gz"), b"abcdefghij").unwrap();
        let store = FsBlobStore::new(dir.path());

        let bytes = store
            .get("segments/part-0.warc.gz", ByteRange::for_record(3, 4))
            .await
            .unwrap();
        assert_eq!(bytes, &b"defg"[..]);

        let whole = store.get("segments/part-0.warc.gz", None).await.unwrap();
        assert_eq!(whole.len(), 10);
    }

    #[tokio::test]
    async fn fs_store_reports_short_objects() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("small"), b"abc").unwrap();
        let store = FsBlobStore::new(dir.path());

        let err = store.get("small", ByteRange::for_record(1, 10)).await.unwrap_err();
        assert!(matches!(err, StoreError::Io(ref e) if e.kind() == io::ErrorKind::UnexpectedEof));
    }
}
