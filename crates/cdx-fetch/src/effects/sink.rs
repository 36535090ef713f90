use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use cdx_index::MetadataEntry;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::core::record_file_name;
use crate::data::RawRecord;

/// Destination for fetched records.
///
/// Each call delivers one complete record. Implementations must keep records
/// from concurrent callers apart; the pipeline calls `write_record` from many
/// workers at once.
pub trait RecordSink: Send + Sync {
    fn write_record(&self, entry: &MetadataEntry, record: &RawRecord) -> impl Future<Output = io::Result<()>> + Send;

    /// Called once after the last record of a run.
    fn flush(&self) -> impl Future<Output = io::Result<()>> + Send {
        async { Ok(()) }
    }
}

/// Appends every record to one writer, such as stdout or a single file.
///
/// The writer is locked for exactly one record write, so outputs of
/// concurrently completing fetches never interleave.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: Mutex<W>,
    separator: Option<Vec<u8>>,
}

impl<W: AsyncWrite + Unpin + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            separator: None,
        }
    }

    /// Write `separator` after each record.
    #[must_use]
    pub fn separator(mut self, separator: impl Into<Vec<u8>>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: AsyncWrite + Unpin + Send> RecordSink for WriterSink<W> {
    async fn write_record(&self, _entry: &MetadataEntry, record: &RawRecord) -> io::Result<()> {
        let mut writer = self.writer.lock().await;
        writer.write_all(&record.data).await?;
        if let Some(separator) = &self.separator {
            writer.write_all(separator).await?;
        }
        Ok(())
    }

    async fn flush(&self) -> io::Result<()> {
        self.writer.lock().await.flush().await
    }
}

/// Writes each record to its own file under a directory, named after the
/// captured URL.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Create `dir` if needed.
    pub async fn create(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, entry: &MetadataEntry, record: &RawRecord) -> PathBuf {
        self.dir.join(record_file_name(&entry.url, record.compressed))
    }
}

impl RecordSink for DirectorySink {
    async fn write_record(&self, entry: &MetadataEntry, record: &RawRecord) -> io::Result<()> {
        tokio::fs::write(self.path_for(entry, record), &record.data).await
    }
}
