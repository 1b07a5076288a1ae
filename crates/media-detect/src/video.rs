//! Direct video file detection

use crate::lowercase_path;
use crate::reference::VideoFileMedia;

/// Recognized video extensions and the MIME type each maps to
const VIDEO_TYPES: [(&str, &str); 4] = [
    (".mp4", "video/mp4"),
    (".mov", "video/mp4"),
    (".webm", "video/webm"),
    (".ogg", "video/ogg"),
];

/// Result of video file detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFileResult {
    /// Source URL
    pub src: String,
    /// Container MIME type
    pub mime_type: &'static str,
}

impl VideoFileResult {
    /// Attach the source URL to build a media reference
    pub fn into_media(self, url: impl Into<String>) -> VideoFileMedia {
        VideoFileMedia { url: url.into(), src: self.src, mime_type: self.mime_type.to_string() }
    }
}

/// Detect a direct link to a video file by its path extension
///
/// The query string and fragment are ignored, and matching is
/// case-insensitive.
pub fn detect_video_file(url: &str) -> Option<VideoFileResult> {
    let path = lowercase_path(url)?;
    VIDEO_TYPES
        .iter()
        .find(|(ext, _)| path.ends_with(ext))
        .map(|(_, mime_type)| VideoFileResult { src: url.to_string(), mime_type: *mime_type })
}
