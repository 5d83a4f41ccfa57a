//! [`Filesystem`] backed by the local disk.

use async_trait::async_trait;
use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use super::{ByteReader, DirEntry, FileStat, Filesystem};

/// Local disk access through `tokio::fs`, which runs each blocking call on
/// the runtime's blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Filesystem for LocalFs {
    async fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        tokio::fs::canonicalize(path).await
    }

    async fn stat(&self, path: &Path) -> io::Result<FileStat> {
        let metadata = tokio::fs::metadata(path).await?;
        Ok(FileStat {
            is_dir: metadata.is_dir(),
            len: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut dir = tokio::fs::read_dir(path).await?;
        let mut entries = Vec::new();

        while let Some(entry) = dir.next_entry().await? {
            let is_dir = match entry.file_type().await {
                Ok(ft) => ft.is_dir(),
                Err(e) => {
                    tracing::debug!("Failed to read file type of {:?}: {}", entry.path(), e);
                    false
                }
            };
            entries.push(DirEntry {
                name: entry.file_name(),
                is_dir,
            });
        }

        Ok(entries)
    }

    async fn open_range(&self, path: &Path, offset: u64, length: u64) -> io::Result<ByteReader> {
        let mut file = File::open(path).await?;
        if offset > 0 {
            file.seek(SeekFrom::Start(offset)).await?;
        }
        // Take caps reads at exactly `length` bytes.
        Ok(Box::pin(file.take(length)))
    }
}
