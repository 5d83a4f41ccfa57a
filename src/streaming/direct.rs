//! Media read endpoint.
//!
//! `GET /api/media?path=<file>` streams a file from inside the media root,
//! honoring a single `Range` header for seeking.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
};
use serde::Deserialize;

use super::MediaStream;
use crate::server::{AppContext, AppError};

#[derive(Debug, Default, Deserialize)]
pub struct MediaQuery {
    pub path: Option<String>,
}

/// Serve a media file with range request support.
pub async fn stream_media(
    State(ctx): State<AppContext>,
    Query(params): Query<MediaQuery>,
    headers: HeaderMap,
) -> Result<MediaStream, AppError> {
    let path = ctx.resolver.resolve_for_media(params.path.as_deref()).await?;

    let range = headers
        .get(header::RANGE)
        .and_then(|h| h.to_str().ok());

    Ok(ctx.media.serve(&path, range).await?)
}
