//! Media-Explorer-Common: Shared types, errors, and extension tables.
//!
//! This crate provides functionality used by every part of media-explorer:
//!
//! - **Core Types**: directory listings, entry classification, sort options, byte ranges
//! - **Path Utilities**: classification and MIME lookup by file extension
//! - **Error Handling**: the unified error type and result alias
//!
//! # Examples
//!
//! ```
//! use media_explorer_common::paths::{classify, mime_type};
//! use media_explorer_common::{Error, MediaType, Result};
//! use std::path::Path;
//!
//! assert_eq!(classify(Path::new("movie.mkv"), false), MediaType::Video);
//! assert_eq!(mime_type(Path::new("movie.mkv")), "video/x-matroska");
//!
//! fn example() -> Result<()> {
//!     Err(Error::invalid_request("Path parameter required"))
//! }
//! assert_eq!(example().unwrap_err().http_status(), 400);
//! ```

pub mod error;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
