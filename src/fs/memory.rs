//! In-memory [`Filesystem`] for tests.
//!
//! Paths are absolute and Unix-style. Symlinks are resolved during
//! canonicalization exactly like the OS would, so boundary checks can be
//! exercised without touching disk.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::io::{self, Cursor};
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, SystemTime};

use super::{ByteReader, DirEntry, FileStat, Filesystem};

const MAX_SYMLINK_DEPTH: usize = 40;

#[derive(Debug, Clone)]
enum Node {
    Dir,
    File { data: Vec<u8>, modified: SystemTime },
    Symlink(PathBuf),
}

/// Immutable in-memory directory tree, built up front with the `with_*`
/// methods.
#[derive(Debug, Clone)]
pub struct MemoryFs {
    nodes: BTreeMap<PathBuf, Node>,
    unstatable: HashSet<PathBuf>,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFs {
    /// An empty tree containing only `/`.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(PathBuf::from("/"), Node::Dir);
        Self {
            nodes,
            unstatable: HashSet::new(),
        }
    }

    /// Add a directory and any missing ancestors.
    pub fn with_dir(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        self.ensure_parents(path);
        self.nodes.insert(path.to_path_buf(), Node::Dir);
        self
    }

    /// Add a file with an arbitrary fixed modification time.
    pub fn with_file(self, path: impl AsRef<Path>, data: impl Into<Vec<u8>>) -> Self {
        let modified = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        self.with_file_modified(path, data, modified)
    }

    /// Add a file with the given modification time.
    pub fn with_file_modified(
        mut self,
        path: impl AsRef<Path>,
        data: impl Into<Vec<u8>>,
        modified: SystemTime,
    ) -> Self {
        let path = path.as_ref();
        self.ensure_parents(path);
        self.nodes.insert(
            path.to_path_buf(),
            Node::File {
                data: data.into(),
                modified,
            },
        );
        self
    }

    /// Add a symlink at `link` pointing to `target` (absolute or relative to
    /// the link's directory).
    pub fn with_symlink(mut self, link: impl AsRef<Path>, target: impl AsRef<Path>) -> Self {
        let link = link.as_ref();
        self.ensure_parents(link);
        self.nodes
            .insert(link.to_path_buf(), Node::Symlink(target.as_ref().to_path_buf()));
        self
    }

    /// Make `stat` on this exact path fail with `PermissionDenied`.
    pub fn with_unstatable(mut self, path: impl AsRef<Path>) -> Self {
        self.unstatable.insert(path.as_ref().to_path_buf());
        self
    }

    fn ensure_parents(&mut self, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            self.nodes
                .entry(ancestor.to_path_buf())
                .or_insert(Node::Dir);
        }
    }

    fn resolve(&self, path: &Path, depth: usize) -> io::Result<PathBuf> {
        if !path.is_absolute() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("relative path: {}", path.display()),
            ));
        }

        let components: Vec<_> = path.components().collect();
        let mut resolved = PathBuf::from("/");
        for (i, component) in components.iter().enumerate() {
            let has_more = i + 1 < components.len();
            match component {
                Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
                Component::ParentDir => {
                    resolved.pop();
                }
                Component::Normal(name) => {
                    let candidate = resolved.join(name);
                    match self.nodes.get(&candidate) {
                        None => return Err(not_found(&candidate)),
                        Some(Node::Symlink(target)) => {
                            if depth >= MAX_SYMLINK_DEPTH {
                                return Err(symlink_loop());
                            }
                            let target = resolved.join(target);
                            resolved = self.resolve(&target, depth + 1)?;
                        }
                        Some(Node::File { .. }) if has_more => {
                            return Err(io::Error::new(
                                io::ErrorKind::NotADirectory,
                                format!("not a directory: {}", candidate.display()),
                            ));
                        }
                        Some(_) => resolved = candidate,
                    }
                }
            }
        }
        Ok(resolved)
    }

    fn node(&self, path: &Path) -> io::Result<(PathBuf, &Node)> {
        let resolved = self.resolve(path, 0)?;
        let node = self.nodes.get(&resolved).ok_or_else(|| not_found(path))?;
        Ok((resolved, node))
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("no such file or directory: {}", path.display()),
    )
}

/// Same error the OS reports for `ELOOP`.
#[cfg(unix)]
fn symlink_loop() -> io::Error {
    io::Error::from_raw_os_error(nix::errno::Errno::ELOOP as i32)
}

#[cfg(not(unix))]
fn symlink_loop() -> io::Error {
    io::Error::other("too many levels of symbolic links")
}

#[async_trait]
impl Filesystem for MemoryFs {
    async fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        self.resolve(path, 0)
    }

    async fn stat(&self, path: &Path) -> io::Result<FileStat> {
        if self.unstatable.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", path.display()),
            ));
        }

        let (_, node) = self.node(path)?;
        Ok(match node {
            Node::Dir => FileStat {
                is_dir: true,
                len: 0,
                modified: Some(SystemTime::UNIX_EPOCH),
            },
            Node::File { data, modified } => FileStat {
                is_dir: false,
                len: data.len() as u64,
                modified: Some(*modified),
            },
            Node::Symlink(_) => {
                return Err(io::Error::other(format!(
                    "unresolved symlink: {}",
                    path.display()
                )))
            }
        })
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let (dir, node) = self.node(path)?;
        if !matches!(node, Node::Dir) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a directory: {}", path.display()),
            ));
        }

        let entries = self
            .nodes
            .iter()
            .filter(|(p, _)| p.parent() == Some(dir.as_path()))
            .filter_map(|(p, node)| {
                Some(DirEntry {
                    name: p.file_name()?.to_os_string(),
                    is_dir: matches!(node, Node::Dir),
                })
            })
            .collect();
        Ok(entries)
    }

    async fn open_range(&self, path: &Path, offset: u64, length: u64) -> io::Result<ByteReader> {
        let (_, node) = self.node(path)?;
        let Node::File { data, .. } = node else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a file: {}", path.display()),
            ));
        };

        let start = usize::try_from(offset).unwrap_or(usize::MAX).min(data.len());
        let end = usize::try_from(offset.saturating_add(length))
            .unwrap_or(usize::MAX)
            .min(data.len());
        Ok(Box::pin(Cursor::new(data[start..end].to_vec())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    fn sample() -> MemoryFs {
        MemoryFs::new()
            .with_file("/media/photos/a.jpg", vec![1u8; 10])
            .with_dir("/media/empty")
            .with_symlink("/media/link", "photos")
            .with_symlink("/media/escape", "/etc")
            .with_dir("/etc")
    }

    #[tokio::test]
    async fn test_parents_are_created() {
        let fs = sample();
        assert!(fs.stat(Path::new("/media/photos")).await.unwrap().is_dir);
        assert!(fs.stat(Path::new("/media")).await.unwrap().is_dir);
    }

    #[tokio::test]
    async fn test_canonicalize_follows_symlinks() {
        let fs = sample();
        assert_eq!(
            fs.canonicalize(Path::new("/media/link/a.jpg")).await.unwrap(),
            PathBuf::from("/media/photos/a.jpg")
        );
        assert_eq!(
            fs.canonicalize(Path::new("/media/escape")).await.unwrap(),
            PathBuf::from("/etc")
        );
        assert_eq!(
            fs.canonicalize(Path::new("/media/photos/../empty/.")).await.unwrap(),
            PathBuf::from("/media/empty")
        );
    }

    #[tokio::test]
    async fn test_canonicalize_missing() {
        let fs = sample();
        let err = fs.canonicalize(Path::new("/media/nope")).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        let err = fs
            .canonicalize(Path::new("/media/photos/a.jpg/x"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotADirectory);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_loop_errors() {
        let fs = MemoryFs::new()
            .with_symlink("/a", "/b")
            .with_symlink("/b", "/a");
        let err = fs.canonicalize(Path::new("/a")).await.unwrap_err();
        assert_eq!(err.raw_os_error(), Some(nix::errno::Errno::ELOOP as i32));
    }

    #[tokio::test]
    async fn test_read_dir_lists_immediate_children() {
        let fs = sample();
        let mut names: Vec<_> = fs
            .read_dir(Path::new("/media"))
            .await
            .unwrap()
            .into_iter()
            .map(|e| (e.name.to_string_lossy().into_owned(), e.is_dir))
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                ("empty".to_string(), true),
                ("escape".to_string(), false),
                ("link".to_string(), false),
                ("photos".to_string(), true),
            ]
        );
    }

    #[tokio::test]
    async fn test_unstatable() {
        let fs = sample().with_unstatable("/media/photos/a.jpg");
        let err = fs.stat(Path::new("/media/photos/a.jpg")).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[tokio::test]
    async fn test_open_range() {
        let fs = MemoryFs::new().with_file("/f.bin", (0..20u8).collect::<Vec<_>>());
        let mut reader = fs.open_range(Path::new("/f.bin"), 18, 10).await.unwrap();
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, vec![18, 19]);
    }
}
