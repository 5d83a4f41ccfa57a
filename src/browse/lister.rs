//! Directory listings.
//!
//! A listing is a live read of one directory: hidden entries are dropped,
//! every child is canonicalized and stat'ed on its own, and the result is
//! ordered with all directories ahead of everything else. Symlinks that lead
//! out of the root are left out of the listing. Classification goes by the
//! entry's own name, not its link target.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use media_explorer_common::paths::classify;
use media_explorer_common::{
    DirectoryListing, Error, FileEntry, Result, SortField, SortOrder, SortSpec,
};
use std::cmp::Ordering;
use std::path::Path;
use std::sync::Arc;

use super::BoundaryResolver;
use crate::fs::{DirEntry, Filesystem};

/// Entries stat'ed concurrently per listing.
const STAT_CONCURRENCY: usize = 16;

/// Builds [`DirectoryListing`]s for directories already validated by the
/// [`BoundaryResolver`].
pub struct DirectoryLister {
    resolver: Arc<BoundaryResolver>,
    fs: Arc<dyn Filesystem>,
}

impl DirectoryLister {
    pub fn new(resolver: Arc<BoundaryResolver>, fs: Arc<dyn Filesystem>) -> Self {
        Self { resolver, fs }
    }

    /// List the immediate children of `dir`.
    ///
    /// `dir` must be canonical and inside the root. Fails with `NotFound` or
    /// `NotADirectory`; a child that cannot be stat'ed is still listed with
    /// zero size and the current time.
    pub async fn list(&self, dir: &Path, sort: SortSpec) -> Result<DirectoryListing> {
        let stat = self
            .fs
            .stat(dir)
            .await
            .map_err(|e| Error::from_io(e, dir))?;
        if !stat.is_dir {
            return Err(Error::NotADirectory(dir.to_path_buf()));
        }

        let raw = self
            .fs
            .read_dir(dir)
            .await
            .map_err(|e| Error::from_io(e, dir))?;

        let now = Utc::now();
        let mut items: Vec<FileEntry> = stream::iter(raw.into_iter().filter(is_visible))
            .map(|entry| self.build_entry(dir, entry, now))
            .buffered(STAT_CONCURRENCY)
            .filter_map(|entry| async move { entry })
            .collect()
            .await;

        sort_entries(&mut items, sort);

        // The parent is offered only while it is still inside the root.
        let parent = dir
            .parent()
            .filter(|p| self.resolver.contains(p))
            .map(Path::to_path_buf);

        tracing::debug!("Listed {:?}: {} entries", dir, items.len());

        Ok(DirectoryListing {
            path: dir.to_path_buf(),
            parent,
            items,
        })
    }

    /// Describe one child. Returns `None` for a link whose target lies
    /// outside the root, so nothing beyond the root is ever stat'ed.
    async fn build_entry(
        &self,
        dir: &Path,
        entry: DirEntry,
        now: DateTime<Utc>,
    ) -> Option<FileEntry> {
        let name = entry.name.to_string_lossy().into_owned();
        let joined = dir.join(&entry.name);

        let path = match self.resolver.resolve(&joined).await {
            Ok(canonical) if self.resolver.contains(&canonical) => canonical,
            Ok(canonical) => {
                tracing::debug!(
                    "Skipping {:?}: resolves outside media root to {:?}",
                    joined,
                    canonical
                );
                return None;
            }
            Err(e) => {
                tracing::debug!("Failed to resolve {:?}: {}", joined, e);
                joined.clone()
            }
        };

        let entry = match self.fs.stat(&path).await {
            Ok(stat) => FileEntry {
                name,
                media_type: classify(&joined, stat.is_dir),
                size: if stat.is_dir { 0 } else { stat.len },
                mtime: stat.modified.map(DateTime::<Utc>::from).unwrap_or(now),
                path,
            },
            Err(e) => {
                tracing::debug!("Failed to stat {:?}, listing without metadata: {}", path, e);
                FileEntry {
                    name,
                    media_type: classify(&joined, entry.is_dir),
                    size: 0,
                    mtime: now,
                    path,
                }
            }
        };
        Some(entry)
    }
}

fn is_visible(entry: &DirEntry) -> bool {
    let name = entry.name.as_encoded_bytes();
    !name.is_empty() && name[0] != b'.'
}

/// Order entries: directories first, then the rest, each group by `sort`.
///
/// Ties fall back to case-insensitive name, then raw name, so the result is
/// fully deterministic.
pub fn sort_entries(items: &mut [FileEntry], sort: SortSpec) {
    items.sort_by(|a, b| {
        b.is_dir().cmp(&a.is_dir()).then_with(|| {
            let ord = compare_by(a, b, sort.field);
            match sort.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        })
    });
}

fn compare_by(a: &FileEntry, b: &FileEntry, field: SortField) -> Ordering {
    let primary = match field {
        SortField::Name => Ordering::Equal,
        SortField::Size => a.size.cmp(&b.size),
        SortField::Date => a.mtime.cmp(&b.mtime),
        SortField::Type => a.media_type.to_string().cmp(&b.media_type.to_string()),
    };
    primary.then_with(|| compare_names(&a.name, &b.name))
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
