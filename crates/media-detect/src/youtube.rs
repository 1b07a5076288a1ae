//! YouTube link detection
//!
//! Recognizes `youtu.be` short links and the `youtube.com` family of hosts,
//! extracting a sanitized video ID, a start offset, and whether the link
//! points at a short.

use crate::reference::YouTubeMedia;
use crate::{parse_url, path_segments};
use url::Url;

/// Short-link host
const SHORT_LINK_HOST: &str = "youtu.be";

/// Full-site hosts
const YOUTUBE_HOSTS: [&str; 4] =
    ["www.youtube.com", "youtube.com", "m.youtube.com", "music.youtube.com"];

/// Length of every YouTube video ID
pub const VIDEO_ID_LENGTH: usize = 11;

/// Parameters extracted from a YouTube URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YouTubeParams {
    /// Sanitized video ID
    pub video_id: String,
    /// Start offset in seconds
    pub start_time: u32,
    /// True for `/shorts/` links
    pub is_short: bool,
}

impl YouTubeParams {
    /// Attach the source URL to build a media reference
    pub fn into_media(self, url: impl Into<String>) -> YouTubeMedia {
        YouTubeMedia {
            url: url.into(),
            video_id: self.video_id,
            start_time: self.start_time,
            is_short: self.is_short,
        }
    }
}

/// Detect a YouTube URL
///
/// # Example
///
/// ```
/// use media_detect::youtube::detect_youtube;
///
/// let params = detect_youtube("https://youtu.be/dQw4w9WgXcQ?t=43s").unwrap();
/// assert_eq!(params.video_id, "dQw4w9WgXcQ");
/// assert_eq!(params.start_time, 43);
/// assert!(!params.is_short);
/// ```
pub fn detect_youtube(url: &str) -> Option<YouTubeParams> {
    let parsed = parse_url(url)?;
    let host = parsed.host_str()?.to_ascii_lowercase();

    if host == SHORT_LINK_HOST {
        let raw_id = first_raw_segment(&parsed).filter(|s| !s.is_empty())?;
        let video_id = sanitize_video_id(raw_id)?;
        return Some(YouTubeParams {
            video_id,
            start_time: parse_start_time(query_param(&parsed, "t").as_deref()),
            is_short: false,
        });
    }

    if !YOUTUBE_HOSTS.contains(&host.as_str()) {
        return None;
    }

    let segments = path_segments(&parsed);
    let page = segments.first().copied();
    let path_id = segments.get(1).copied();

    let mut is_short = false;
    let raw_id = match (page, path_id) {
        (Some("shorts"), Some(id)) => {
            is_short = true;
            Some(id.to_string())
        }
        (Some("live"), Some(id)) | (Some("embed"), Some(id)) => Some(id.to_string()),
        (Some("watch"), _) => query_param(&parsed, "v"),
        _ => None,
    }?;

    let video_id = sanitize_video_id(&raw_id)?;
    let start = query_param(&parsed, "t").or_else(|| query_param(&parsed, "start"));

    Some(YouTubeParams { video_id, start_time: parse_start_time(start.as_deref()), is_short })
}

/// First path segment exactly as written, empty segments included
fn first_raw_segment(url: &Url) -> Option<&str> {
    url.path_segments().and_then(|mut segments| segments.next())
}

/// First value of a query parameter
fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs().find(|(key, _)| key == name).map(|(_, value)| value.into_owned())
}

/// Strip characters outside `[A-Za-z0-9_-]` and require exactly 11 left
fn sanitize_video_id(raw: &str) -> Option<String> {
    let cleaned: String =
        raw.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-').collect();

    if cleaned.len() != VIDEO_ID_LENGTH {
        return None;
    }

    Some(cleaned)
}

/// Coerce a `t`/`start` value to whole seconds by keeping only its digits
///
/// Values too large for `u32` saturate.
fn parse_start_time(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return 0;
    };

    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse::<u32>().unwrap_or(u32::MAX)
}

/// YouTube thumbnail quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThumbnailQuality {
    /// Default quality (120x90)
    Default,
    /// Medium quality (320x180)
    Medium,
    /// High quality (480x360)
    #[default]
    High,
    /// Standard definition (640x480)
    StandardDef,
    /// Max resolution (1280x720)
    MaxRes,
}

impl ThumbnailQuality {
    /// Get the filename for this quality
    pub fn filename(&self) -> &'static str {
        match self {
            ThumbnailQuality::Default => "default.jpg",
            ThumbnailQuality::Medium => "mqdefault.jpg",
            ThumbnailQuality::High => "hqdefault.jpg",
            ThumbnailQuality::StandardDef => "sddefault.jpg",
            ThumbnailQuality::MaxRes => "maxresdefault.jpg",
        }
    }
}

/// Thumbnail shown before the player is activated
pub fn thumbnail_url(video_id: &str) -> String {
    thumbnail_url_with_quality(video_id, ThumbnailQuality::High)
}

/// Thumbnail URL for a specific quality
pub fn thumbnail_url_with_quality(video_id: &str, quality: ThumbnailQuality) -> String {
    format!("https://img.youtube.com/vi/{}/{}", video_id, quality.filename())
}

/// Player URL for the embedded iframe
///
/// The player autoplays once activated, plays inline on mobile, and
/// suppresses unrelated suggestions. `start` is only set for non-zero offsets.
pub fn embed_url(video_id: &str, start_time: u32) -> String {
    let mut url = format!(
        "https://www.youtube.com/embed/{}?autoplay=1&rel=0&playsinline=1&modestbranding=1",
        video_id
    );
    if start_time > 0 {
        url.push_str(&format!("&start={}", start_time));
    }
    url
}

/// Canonical watch-page URL
pub fn watch_url(video_id: &str, start_time: u32) -> String {
    let mut url = format!("https://www.youtube.com/watch?v={}", video_id);
    if start_time > 0 {
        url.push_str(&format!("&t={}s", start_time));
    }
    url
}

/// Presentation aspect ratio as `(width, height)`
pub fn aspect_ratio(is_short: bool) -> (u32, u32) {
    if is_short {
        (9, 14)
    } else {
        (16, 9)
    }
}
