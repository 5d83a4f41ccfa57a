//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which lays out a small media tree in a temp
//! directory and builds the real router on top of [`LocalFs`].

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use http_body_util::BodyExt;
use media_explorer::config::Config;
use media_explorer::fs::LocalFs;
use media_explorer::server::{create_router, AppContext};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// Size of `movies/clip.mp4` in the fixture tree.
pub const CLIP_SIZE: usize = 1000;

/// Deterministic content so any byte span can be checked.
pub fn clip_bytes() -> Vec<u8> {
    (0..CLIP_SIZE).map(|i| (i % 251) as u8).collect()
}

pub struct TestHarness {
    /// Holds the media root and siblings outside it.
    pub dir: TempDir,
    pub ctx: AppContext,
}

impl TestHarness {
    /// Layout:
    ///
    /// ```text
    /// <tmp>/media/
    ///   movies/clip.mp4        (1000 bytes)
    ///   movies/poster.jpg
    ///   music/song.mp3
    ///   notes.txt
    ///   empty.mp3              (0 bytes)
    ///   .hidden.mp4
    /// <tmp>/media2/secret.mp4  (sibling sharing the root's prefix)
    /// <tmp>/outside.txt
    /// ```
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().join("media");

        std::fs::create_dir_all(media.join("movies")).unwrap();
        std::fs::create_dir_all(media.join("music")).unwrap();
        std::fs::create_dir_all(dir.path().join("media2")).unwrap();

        std::fs::write(media.join("movies/clip.mp4"), clip_bytes()).unwrap();
        std::fs::write(media.join("movies/poster.jpg"), b"jpeg").unwrap();
        std::fs::write(media.join("music/song.mp3"), vec![7u8; 300]).unwrap();
        std::fs::write(media.join("notes.txt"), b"hello").unwrap();
        std::fs::write(media.join("empty.mp3"), b"").unwrap();
        std::fs::write(media.join(".hidden.mp4"), b"hidden").unwrap();
        std::fs::write(dir.path().join("media2/secret.mp4"), b"secret").unwrap();
        std::fs::write(dir.path().join("outside.txt"), b"outside").unwrap();

        let mut config = Config::default();
        config.media.root = media;

        let ctx = AppContext::new(config, Arc::new(LocalFs::new()))
            .await
            .unwrap();

        Self { dir, ctx }
    }

    /// Canonical media root.
    pub fn root(&self) -> PathBuf {
        self.ctx.resolver.root().to_path_buf()
    }

    /// Canonical directory that contains the root.
    pub fn outside(&self) -> PathBuf {
        self.root().parent().unwrap().to_path_buf()
    }

    pub fn router(&self) -> Router {
        create_router(self.ctx.clone(), None)
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.router()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn get_with_range(&self, uri: &str, range: &str) -> Response<Body> {
        self.router()
            .oneshot(
                Request::get(uri)
                    .header("range", range)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }
}

/// Percent-encode a filesystem path for use as a query value.
pub fn query_path(path: &Path) -> String {
    let mut out = String::new();
    for b in path.to_string_lossy().bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
