//! Trust boundary around the configured media root.
//!
//! Every client-supplied path is canonicalized and checked against the root
//! with a single predicate, [`is_within`]. The two request kinds apply
//! different policies to a path that escapes:
//!
//! - listings fall back to the root itself ([`BoundaryResolver::resolve_for_listing`])
//! - media reads are refused with `AccessDenied` ([`BoundaryResolver::resolve_for_media`])

use media_explorer_common::{Error, Result};
use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::fs::Filesystem;

/// The canonical root directory this process is allowed to expose.
///
/// Established once at startup and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredRoot(PathBuf);

impl ConfiguredRoot {
    /// Canonicalize `path` and make sure it is an existing directory.
    pub async fn establish(path: &Path, fs: &dyn Filesystem) -> Result<Self> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        let canonical = fs
            .canonicalize(&absolute)
            .await
            .map_err(|e| Error::from_io(e, &absolute))?;

        let stat = fs
            .stat(&canonical)
            .await
            .map_err(|e| Error::from_io(e, &canonical))?;
        if !stat.is_dir {
            return Err(Error::NotADirectory(canonical));
        }

        Ok(Self(canonical))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// Whether `path` is `root` or lies underneath it.
///
/// Both arguments must already be canonical. The comparison is by whole path
/// components, so `/media2` is not inside `/media`.
pub fn is_within(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}

/// Remove `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if out.parent().is_some() {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Canonicalize a path that may not exist.
///
/// Existing paths are resolved by the filesystem. Otherwise the path is
/// normalized lexically, its longest resolvable ancestor is canonicalized, and
/// the remaining components are appended unchanged.
pub async fn canonicalize_lenient(fs: &dyn Filesystem, path: &Path) -> io::Result<PathBuf> {
    if let Ok(canonical) = fs.canonicalize(path).await {
        return Ok(canonical);
    }

    let normalized = normalize_lexically(path);
    let mut tail: Vec<OsString> = Vec::new();
    let mut current = normalized.as_path();

    loop {
        match fs.canonicalize(current).await {
            Ok(mut base) => {
                for name in tail.iter().rev() {
                    base.push(name);
                }
                return Ok(base);
            }
            Err(e) => match (current.parent(), current.file_name()) {
                (Some(parent), Some(name)) => {
                    tail.push(name.to_os_string());
                    current = parent;
                }
                _ => return Err(e),
            },
        }
    }
}

/// Resolves client-supplied paths against the configured root.
pub struct BoundaryResolver {
    root: ConfiguredRoot,
    fs: Arc<dyn Filesystem>,
}

impl BoundaryResolver {
    pub fn new(root: ConfiguredRoot, fs: Arc<dyn Filesystem>) -> Self {
        Self { root, fs }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Whether a canonical path is inside the root.
    pub fn contains(&self, canonical: &Path) -> bool {
        is_within(canonical, self.root.path())
    }

    /// Canonical form of `requested`, whether or not it exists.
    ///
    /// Relative paths are taken relative to the root.
    pub async fn resolve(&self, requested: &Path) -> io::Result<PathBuf> {
        let absolute = if requested.is_absolute() {
            requested.to_path_buf()
        } else {
            self.root.path().join(requested)
        };
        canonicalize_lenient(self.fs.as_ref(), &absolute).await
    }

    /// Directory to list for a request. Never fails: anything absent,
    /// unresolvable, or outside the root becomes the root.
    pub async fn resolve_for_listing(&self, requested: Option<&str>) -> PathBuf {
        let Some(requested) = requested.filter(|p| !p.is_empty()) else {
            return self.root.path().to_path_buf();
        };

        match self.resolve(Path::new(requested)).await {
            Ok(canonical) if self.contains(&canonical) => canonical,
            Ok(canonical) => {
                tracing::debug!(
                    "Listing path {:?} resolves outside media root, using root",
                    canonical
                );
                self.root.path().to_path_buf()
            }
            Err(e) => {
                tracing::warn!("Failed to resolve listing path {:?}: {}", requested, e);
                self.root.path().to_path_buf()
            }
        }
    }

    /// File to serve for a media request.
    ///
    /// Fails with `InvalidRequest` when no path is given and `AccessDenied`
    /// when the path resolves outside the root.
    pub async fn resolve_for_media(&self, requested: Option<&str>) -> Result<PathBuf> {
        let requested = requested
            .filter(|p| !p.is_empty())
            .ok_or_else(|| Error::invalid_request("Path parameter required"))?;
        let requested = Path::new(requested);

        let canonical = self
            .resolve(requested)
            .await
            .map_err(|e| Error::from_io(e, requested))?;

        if !self.contains(&canonical) {
            tracing::warn!(
                "Denied media request outside media root: {:?} -> {:?}",
                requested,
                canonical
            );
            return Err(Error::AccessDenied(requested.to_path_buf()));
        }

        Ok(canonical)
    }
}
