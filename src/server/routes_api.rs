use crate::server::AppContext;
use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};

pub fn api_routes() -> Router<AppContext> {
    Router::new().route("/health", get(health))
}

async fn health(State(ctx): State<AppContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "mediaRoot": ctx.resolver.root().to_string_lossy(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
