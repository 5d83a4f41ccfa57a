//! Media streaming module.
//!
//! Serves files from the media root directly, with HTTP range requests so
//! players can seek.
//!
//! # Routes
//!
//! - `GET /api/media?path=<file>` - stream a file (200 full, 206 partial)

mod direct;
mod media;
pub mod range;

pub use direct::{stream_media, MediaQuery};
pub use media::{MediaServer, MediaStream, STREAM_CHUNK_SIZE};
pub use range::{parse_range_header, RangeSpec};

use axum::{routing::get, Router};

use crate::server::AppContext;

/// Create media streaming router (nested under `/api`).
pub fn media_router() -> Router<AppContext> {
    Router::new().route("/media", get(stream_media))
}
