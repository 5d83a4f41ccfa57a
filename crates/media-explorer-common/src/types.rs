//! Core type definitions for directory listings and byte ranges.
//!
//! Everything here is rebuilt from the filesystem on each request; nothing is
//! cached or persisted. Enums serialize in lowercase to match what the
//! browser client expects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// Coarse category of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Directory,
    Image,
    Video,
    Audio,
    Other,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory => write!(f, "directory"),
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
            Self::Audio => write!(f, "audio"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Base name; never empty, never starts with `.`.
    pub name: String,
    /// Absolute path of the entry inside the configured root.
    #[serde(serialize_with = "serialize_path")]
    pub path: PathBuf,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    /// Byte length, `0` for directories.
    pub size: u64,
    /// Last modification time. Falls back to the listing time when the
    /// entry could not be stat'ed.
    pub mtime: DateTime<Utc>,
}

impl FileEntry {
    pub fn is_dir(&self) -> bool {
        self.media_type == MediaType::Directory
    }
}

/// Snapshot of one directory's immediate children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryListing {
    /// Canonical path that was actually read.
    #[serde(serialize_with = "serialize_path")]
    pub path: PathBuf,
    /// Parent directory, present only while it is still inside the root.
    #[serde(serialize_with = "serialize_opt_path")]
    pub parent: Option<PathBuf>,
    /// Directories first, then everything else.
    pub items: Vec<FileEntry>,
}

/// Field a listing is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Name,
    Size,
    #[serde(alias = "mtime", alias = "modified")]
    Date,
    Type,
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Size => write!(f, "size"),
            Self::Date => write!(f, "date"),
            Self::Type => write!(f, "type"),
        }
    }
}

impl std::str::FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "size" => Ok(Self::Size),
            "date" | "mtime" | "modified" => Ok(Self::Date),
            "type" => Ok(Self::Type),
            other => Err(format!("unknown sort field: {other}")),
        }
    }
}

/// Direction a listing is ordered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Comparator requested for a listing. Defaults to name, ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    #[serde(default)]
    pub field: SortField,
    #[serde(default)]
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }
}

/// Inclusive byte span `[start, end]` of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered. Always at least 1.
    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Value for the `Content-Range` header.
    pub fn content_range(&self, total: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, total)
    }
}

fn serialize_path<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

fn serialize_opt_path<S: Serializer>(
    path: &Option<PathBuf>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match path {
        Some(p) => serializer.serialize_some(p.to_string_lossy().as_ref()),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(name: &str, media_type: MediaType) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            path: PathBuf::from("/media").join(name),
            media_type,
            size: 42,
            mtime: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_media_type_serialization() {
        let json = serde_json::to_string(&MediaType::Directory).unwrap();
        assert_eq!(json, "\"directory\"");
        let parsed: MediaType = serde_json::from_str("\"audio\"").unwrap();
        assert_eq!(parsed, MediaType::Audio);
        assert_eq!(MediaType::Video.to_string(), "video");
    }

    #[test]
    fn test_file_entry_wire_shape() {
        let value = serde_json::to_value(entry("clip.mp4", MediaType::Video)).unwrap();
        assert_eq!(value["name"], "clip.mp4");
        assert_eq!(value["path"], "/media/clip.mp4");
        assert_eq!(value["type"], "video");
        assert_eq!(value["size"], 42);
        assert_eq!(value["mtime"], "2024-05-01T12:00:00Z");
    }

    #[test]
    fn test_listing_null_parent() {
        let listing = DirectoryListing {
            path: PathBuf::from("/media"),
            parent: None,
            items: vec![entry("a", MediaType::Directory)],
        };
        let value = serde_json::to_value(&listing).unwrap();
        assert!(value["parent"].is_null());
        assert_eq!(value["items"][0]["type"], "directory");
    }

    #[test]
    fn test_sort_field_parsing() {
        assert_eq!("SIZE".parse::<SortField>().unwrap(), SortField::Size);
        assert_eq!("mtime".parse::<SortField>().unwrap(), SortField::Date);
        assert!("colour".parse::<SortField>().is_err());
        let parsed: SortField = serde_json::from_str("\"modified\"").unwrap();
        assert_eq!(parsed, SortField::Date);
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
    }

    #[test]
    fn test_sort_spec_default() {
        let spec = SortSpec::default();
        assert_eq!(spec.field, SortField::Name);
        assert_eq!(spec.order, SortOrder::Asc);
    }

    #[test]
    fn test_byte_range() {
        let range = ByteRange { start: 100, end: 199 };
        assert_eq!(range.length(), 100);
        assert_eq!(range.content_range(1000), "bytes 100-199/1000");
        assert_eq!(ByteRange { start: 5, end: 5 }.length(), 1);
    }
}
