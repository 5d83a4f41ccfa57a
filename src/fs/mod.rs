//! Filesystem access behind a narrow interface.
//!
//! The resolver, lister, and media server only ever touch the disk through
//! [`Filesystem`]. [`LocalFs`] is the real implementation on top of
//! `tokio::fs`; [`MemoryFs`] is an in-memory tree for tests.

mod local;
pub mod memory;

pub use local::LocalFs;
pub use memory::MemoryFs;

use async_trait::async_trait;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::SystemTime;
use tokio::io::AsyncRead;

/// Reader over a slice of a file. Owns its handle; dropping it closes the file.
pub type ByteReader = Pin<Box<dyn AsyncRead + Send>>;

/// Metadata returned by [`Filesystem::stat`]. Symlinks are followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub is_dir: bool,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

/// One raw entry returned by [`Filesystem::read_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: OsString,
    /// Directory-ness as reported by the directory itself (symlinks not followed).
    pub is_dir: bool,
}

/// Filesystem operations needed to list directories and serve file bytes.
#[async_trait]
pub trait Filesystem: Send + Sync {
    /// Resolve symlinks and `.`/`..` in an existing path.
    async fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Stat a path, following symlinks.
    async fn stat(&self, path: &Path) -> io::Result<FileStat>;

    /// Immediate children of a directory, in no particular order.
    async fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Open `path` for reading `length` bytes starting at `offset`.
    async fn open_range(&self, path: &Path, offset: u64, length: u64) -> io::Result<ByteReader>;
}
