use crate::browse::{BoundaryResolver, ConfiguredRoot, DirectoryLister};
use crate::config::Config;
use crate::fs::{Filesystem, LocalFs};
use crate::streaming::{self, MediaServer};
use anyhow::{Context, Result};
use axum::{
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

mod error;
pub mod routes_api;
pub mod routes_files;

pub use error::AppError;

/// Shared application context
///
/// Holds only immutable state; requests never coordinate with each other.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    /// Boundary checks against the configured media root
    pub resolver: Arc<BoundaryResolver>,
    pub lister: Arc<DirectoryLister>,
    pub media: Arc<MediaServer>,
}

impl AppContext {
    /// Establish the media root and wire every component to `fs`.
    pub async fn new(
        config: Config,
        fs: Arc<dyn Filesystem>,
    ) -> media_explorer_common::Result<Self> {
        let root = ConfiguredRoot::establish(&config.media.root, fs.as_ref()).await?;
        let resolver = Arc::new(BoundaryResolver::new(root, fs.clone()));
        let lister = Arc::new(DirectoryLister::new(resolver.clone(), fs.clone()));
        let media = Arc::new(MediaServer::new(fs));

        Ok(Self {
            config: Arc::new(config),
            resolver,
            lister,
            media,
        })
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::RANGE])
        .expose_headers([
            header::CONTENT_RANGE,
            header::ACCEPT_RANGES,
            header::CONTENT_LENGTH,
        ]);

    let api = routes_api::api_routes()
        .merge(routes_files::files_routes())
        .merge(streaming::media_router());

    let mut app = Router::new()
        // Health check
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(ctx);

    // Serve the browser client if a directory is provided
    // Uses SPA fallback: serves index.html for any route that doesn't match a file
    if let Some(dir) = static_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            let index_path = dir.join("index.html");
            app = app.fallback_service(
                ServeDir::new(&dir)
                    .append_index_html_on_directories(true)
                    .not_found_service(ServeFile::new(index_path)),
            );
        }
    }

    app
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Start the HTTP server on the local filesystem
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let static_dir = config.server.static_dir.clone();
    let ctx = AppContext::new(config, Arc::new(LocalFs::new()))
        .await
        .context("Failed to establish media root")?;

    tracing::info!("Media root: {:?}", ctx.resolver.root());

    let app = create_router(ctx, static_dir);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
