//! Directory browsing inside the configured media root.
//!
//! [`BoundaryResolver`] turns client paths into canonical, in-root paths;
//! [`DirectoryLister`] reads one directory into a [`DirectoryListing`].
//!
//! [`DirectoryListing`]: media_explorer_common::DirectoryListing

mod boundary;
mod lister;

pub use boundary::{
    canonicalize_lenient, is_within, normalize_lexically, BoundaryResolver, ConfiguredRoot,
};
pub use lister::{sort_entries, DirectoryLister};
