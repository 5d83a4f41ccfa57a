//! Path utilities for classifying files by extension.
//!
//! Classification and MIME resolution are driven purely by the (lowercased)
//! file extension; file content is never inspected. Both lookups share the
//! same extension tables, with one wrinkle: `ogg` appears in both the video
//! and the audio table. Classification checks video first, so `.ogg`
//! classifies as [`MediaType::Video`], and the MIME table maps it to
//! `video/ogg`.

use std::path::Path;

use crate::types::MediaType;

/// Image file extensions.
const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "svg", "bmp", "ico", "tiff", "tif",
];

/// Video file extensions.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "webm", "ogg", "mov", "avi", "mkv", "m4v", "wmv", "flv", "3gp",
];

/// Audio file extensions. `ogg` is also listed under video.
const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "ogg", "flac", "aac", "m4a", "wma", "aiff", "opus",
];

/// Content type used when the extension is unknown.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Lowercased extension of `path`, if it has one.
fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Classify a directory entry.
///
/// Directories are always [`MediaType::Directory`] regardless of their name.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use media_explorer_common::paths::classify;
/// use media_explorer_common::MediaType;
///
/// assert_eq!(classify(Path::new("clip.MP4"), false), MediaType::Video);
/// assert_eq!(classify(Path::new("album.mp3"), true), MediaType::Directory);
/// assert_eq!(classify(Path::new("notes.txt"), false), MediaType::Other);
/// ```
pub fn classify(path: &Path, is_dir: bool) -> MediaType {
    if is_dir {
        return MediaType::Directory;
    }

    let Some(ext) = extension(path) else {
        return MediaType::Other;
    };
    let ext = ext.as_str();

    if IMAGE_EXTENSIONS.contains(&ext) {
        MediaType::Image
    } else if VIDEO_EXTENSIONS.contains(&ext) {
        MediaType::Video
    } else if AUDIO_EXTENSIONS.contains(&ext) {
        MediaType::Audio
    } else {
        MediaType::Other
    }
}

/// Resolve the MIME type for a file from its extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use media_explorer_common::paths::mime_type;
///
/// assert_eq!(mime_type(Path::new("movie.mkv")), "video/x-matroska");
/// assert_eq!(mime_type(Path::new("song.OPUS")), "audio/opus");
/// assert_eq!(mime_type(Path::new("data.bin")), "application/octet-stream");
/// ```
pub fn mime_type(path: &Path) -> &'static str {
    let Some(ext) = extension(path) else {
        return DEFAULT_MIME_TYPE;
    };

    match ext.as_str() {
        // Images
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "tiff" | "tif" => "image/tiff",
        // Video
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogg" => "video/ogg",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "m4v" => "video/x-m4v",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        "3gp" => "video/3gpp",
        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "aac" => "audio/aac",
        "m4a" => "audio/mp4",
        "wma" => "audio/x-ms-wma",
        "aiff" => "audio/aiff",
        "opus" => "audio/opus",
        _ => DEFAULT_MIME_TYPE,
    }
}

/// Get the list of image file extensions.
#[must_use]
pub fn image_extensions() -> &'static [&'static str] {
    IMAGE_EXTENSIONS
}

/// Get the list of video file extensions.
#[must_use]
pub fn video_extensions() -> &'static [&'static str] {
    VIDEO_EXTENSIONS
}

/// Get the list of audio file extensions.
#[must_use]
pub fn audio_extensions() -> &'static [&'static str] {
    AUDIO_EXTENSIONS
}
