//! Common error types used throughout media-explorer.
//!
//! Every failure a listing or media read can produce is one of the variants
//! below. Callers get a stable, typed error and derive the HTTP status from
//! [`Error::http_status`]; nothing here is retried internally.

use std::path::{Path, PathBuf};

/// Common error type for media-explorer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested path does not exist.
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A listing was requested for something that is not a directory.
    #[error("Path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// A media read was requested for a directory.
    #[error("Path is a directory: {}", .0.display())]
    IsADirectory(PathBuf),

    /// The requested path resolves outside the configured root.
    #[error("Access denied: path outside media root")]
    AccessDenied(PathBuf),

    /// The request is missing a required parameter or is otherwise unusable.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The byte range lies entirely outside the file.
    #[error("Requested range not satisfiable (file size {size})")]
    RangeNotSatisfiable {
        /// Total size of the file the range was evaluated against.
        size: u64,
    },

    /// An I/O or OS-level failure not otherwise classified.
    #[error("Unexpected error: {source}")]
    Unexpected {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Classify an I/O error raised while touching `path`.
    ///
    /// Anything meaning "this path does not resolve to an entry" becomes
    /// `NotFound`: a missing component, a file used as a directory, or a
    /// symlink loop. Everything else is unexpected.
    pub fn from_io(err: std::io::Error, path: &Path) -> Self {
        if is_missing(&err) {
            Self::NotFound(path.to_path_buf())
        } else {
            Self::Unexpected { source: err }
        }
    }

    /// Create a new InvalidRequest error.
    pub fn invalid_request<S: Into<String>>(msg: S) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Map this error to an HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::NotADirectory(_) => 400,
            Self::IsADirectory(_) => 400,
            Self::AccessDenied(_) => 403,
            Self::InvalidRequest(_) => 400,
            Self::RangeNotSatisfiable { .. } => 416,
            Self::Unexpected { .. } => 500,
        }
    }

    /// Short machine-readable code for API bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::NotADirectory(_) => "not_a_directory",
            Self::IsADirectory(_) => "is_a_directory",
            Self::AccessDenied(_) => "access_denied",
            Self::InvalidRequest(_) => "invalid_request",
            Self::RangeNotSatisfiable { .. } => "range_not_satisfiable",
            Self::Unexpected { .. } => "unexpected",
        }
    }
}

fn is_missing(err: &std::io::Error) -> bool {
    use std::io::ErrorKind;

    match err.kind() {
        ErrorKind::NotFound | ErrorKind::NotADirectory => true,
        _ => is_symlink_loop(err),
    }
}

#[cfg(unix)]
fn is_symlink_loop(err: &std::io::Error) -> bool {
    err.raw_os_error() == Some(nix::errno::Errno::ELOOP as i32)
}

#[cfg(not(unix))]
fn is_symlink_loop(_err: &std::io::Error) -> bool {
    false
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
