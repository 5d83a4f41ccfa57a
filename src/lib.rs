//! Media Explorer - browse a directory tree and stream its media files
//!
//! This library crate exposes the core functionality for integration testing.

pub mod browse;
pub mod config;
pub mod fs;
pub mod server;
pub mod streaming;
