//! Local video file validation.

use std::path::Path;

/// Recognized video file extensions (lower-case, without the dot).
pub const VIDEO_EXTENSIONS: [&str; 9] = [
    "mp4", "mpeg", "mov", "avi", "flv", "mpg", "webm", "wmv", "3gp",
];

/// Files below this size are likely corrupted.
pub const MIN_VIDEO_SIZE_BYTES: u64 = 10;

/// True when the path carries one of the recognized video extensions,
/// case-insensitively.
pub fn has_video_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| VIDEO_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Check whether a path is a processable video file.
///
/// Returns false when the path does not exist, is not a regular file, is
/// smaller than `min_size_bytes`, has an extension outside the allow-list,
/// or its sniffed content type is determinable and not a video. All of
/// these are normal `false` results, not errors.
pub fn is_valid_video(path: &Path, min_size_bytes: u64) -> bool {
    let Ok(metadata) = std::fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }
    if metadata.len() < min_size_bytes {
        return false;
    }
    if !has_video_extension(path) {
        return false;
    }
    // Content sniff: only reject when a type is determinable and it is not
    // a video. Unrecognized content passes, matching the extension check.
    if let Ok(Some(kind)) = infer::get_from_path(path) {
        if !kind.mime_type().starts_with("video") {
            return false;
        }
    }
    true
}
