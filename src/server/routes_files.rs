//! Directory listing endpoint.
//!
//! `GET /api/files?path=<dir>&sort=<field>&order=<asc|desc>`. The listing
//! never leaves the media root: an absent, unresolvable, or escaping `path`
//! lists the root instead.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use media_explorer_common::{DirectoryListing, SortField, SortOrder, SortSpec};
use serde::Deserialize;

use super::{AppContext, AppError};

/// Create file browsing routes.
pub fn files_routes() -> Router<AppContext> {
    Router::new().route("/files", get(list_files))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListFilesQuery {
    pub path: Option<String>,
    #[serde(default)]
    pub sort: SortField,
    #[serde(default)]
    pub order: SortOrder,
}

async fn list_files(
    State(ctx): State<AppContext>,
    Query(params): Query<ListFilesQuery>,
) -> Result<Json<DirectoryListing>, AppError> {
    let dir = ctx.resolver.resolve_for_listing(params.path.as_deref()).await;
    let listing = ctx
        .lister
        .list(&dir, SortSpec::new(params.sort, params.order))
        .await?;
    Ok(Json(listing))
}
