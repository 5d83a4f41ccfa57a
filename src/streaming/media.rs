//! Serves file bytes with HTTP partial-content semantics.

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use media_explorer_common::paths::mime_type;
use media_explorer_common::{ByteRange, Error, Result};
use std::path::Path;
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use super::range::parse_range_header;
use crate::fs::{ByteReader, Filesystem};

/// Chunk size for streamed bodies. Memory per stream stays at roughly one
/// chunk no matter how large the file is.
pub const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// A ready-to-send media body plus the headers that describe it.
pub struct MediaStream {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub content_length: u64,
    pub file_size: u64,
    /// Present for 206 responses.
    pub range: Option<ByteRange>,
    pub body: ByteReader,
}

impl std::fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaStream")
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .field("file_size", &self.file_size)
            .field("range", &self.range)
            .finish_non_exhaustive()
    }
}

impl IntoResponse for MediaStream {
    fn into_response(self) -> Response {
        let stream = ReaderStream::with_capacity(self.body, STREAM_CHUNK_SIZE);
        let mut builder = Response::builder()
            .status(self.status)
            .header(header::CONTENT_TYPE, self.content_type)
            .header(header::CONTENT_LENGTH, self.content_length.to_string())
            .header(header::ACCEPT_RANGES, "bytes");

        if let Some(range) = self.range {
            builder = builder.header(header::CONTENT_RANGE, range.content_range(self.file_size));
        }

        match builder.body(Body::from_stream(stream)) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Failed to build media response: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Opens files for streaming, honoring an optional `Range` header.
pub struct MediaServer {
    fs: Arc<dyn Filesystem>,
}

impl MediaServer {
    pub fn new(fs: Arc<dyn Filesystem>) -> Self {
        Self { fs }
    }

    /// Prepare `path` for streaming.
    ///
    /// `path` must already be canonical and inside the root. Without a usable
    /// range the whole file is returned with 200; with one, exactly the
    /// requested inclusive span is returned with 206.
    pub async fn serve(&self, path: &Path, range_header: Option<&str>) -> Result<MediaStream> {
        let stat = self
            .fs
            .stat(path)
            .await
            .map_err(|e| Error::from_io(e, path))?;
        if stat.is_dir {
            return Err(Error::IsADirectory(path.to_path_buf()));
        }

        let file_size = stat.len;
        let content_type = mime_type(path);

        let range = match range_header {
            Some(value) => match parse_range_header(value) {
                Some(spec) => Some(spec.resolve(file_size)?),
                None => {
                    tracing::debug!("Ignoring malformed Range header {:?}", value);
                    None
                }
            },
            None => None,
        };

        let (status, offset, length) = match range {
            Some(r) => (StatusCode::PARTIAL_CONTENT, r.start, r.length()),
            None => (StatusCode::OK, 0, file_size),
        };

        let body = self
            .fs
            .open_range(path, offset, length)
            .await
            .map_err(|e| Error::from_io(e, path))?;

        tracing::debug!(
            "Streaming {:?} ({}): {} bytes from offset {}",
            path,
            status,
            length,
            offset
        );

        Ok(MediaStream {
            status,
            content_type,
            content_length: length,
            file_size,
            range,
            body,
        })
    }
}
