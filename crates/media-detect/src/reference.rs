//! Classified media references
//!
//! A [`MediaReference`] is a URL from the source text together with the
//! kind-specific metadata its detector extracted. References are immutable
//! and are rebuilt whenever the source text changes.

use serde::{Deserialize, Serialize};

/// Kind of media a URL resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaKind {
    /// YouTube video or short
    YouTube,
    /// Giphy or Tenor animation
    GifPlatform,
    /// Direct link to a video file
    VideoFile,
    /// Direct link to an image
    Image,
    /// Anything else, rendered as a hyperlink
    Plain,
}

impl MediaKind {
    /// Get the kind as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::YouTube => "youtube",
            MediaKind::GifPlatform => "gif-platform",
            MediaKind::VideoFile => "video-file",
            MediaKind::Image => "image",
            MediaKind::Plain => "plain",
        }
    }

    /// Whether this kind counts against the video budget of a message
    ///
    /// GIF animations are treated as video for both render limits and the
    /// auto-render setting.
    pub fn is_video_like(&self) -> bool {
        matches!(self, MediaKind::YouTube | MediaKind::GifPlatform | MediaKind::VideoFile)
    }
}

/// GIF hosting platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GifPlatform {
    /// giphy.com
    Giphy,
    /// tenor.com
    Tenor,
}

impl GifPlatform {
    /// Get the platform as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            GifPlatform::Giphy => "giphy",
            GifPlatform::Tenor => "tenor",
        }
    }
}

/// YouTube video reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTubeMedia {
    /// URL as it appeared in the text
    pub url: String,
    /// Sanitized 11-character video ID
    pub video_id: String,
    /// Start offset in seconds
    pub start_time: u32,
    /// Whether the link was a `/shorts/` link
    pub is_short: bool,
}

/// Giphy/Tenor animation reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GifMedia {
    /// URL as it appeared in the text
    pub url: String,
    /// Hosting platform
    pub platform: GifPlatform,
    /// Directly fetchable media URL (synthesized for Giphy page links)
    pub media_url: String,
    /// The link the user pasted
    pub original_url: String,
}

/// Direct video file reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoFileMedia {
    /// URL as it appeared in the text
    pub url: String,
    /// Source URL for the player
    pub src: String,
    /// Container MIME type derived from the extension
    pub mime_type: String,
}

/// Direct image reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMedia {
    /// URL as it appeared in the text
    pub url: String,
    /// Source URL for the image element
    pub src: String,
}

/// A URL classified into exactly one media kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MediaReference {
    /// YouTube video
    #[serde(rename = "youtube")]
    YouTube(YouTubeMedia),
    /// Giphy/Tenor animation
    GifPlatform(GifMedia),
    /// Video file
    VideoFile(VideoFileMedia),
    /// Image
    Image(ImageMedia),
    /// Plain hyperlink
    Plain {
        /// The link target
        url: String,
    },
}

impl MediaReference {
    /// Create a plain link reference
    pub fn plain(url: impl Into<String>) -> Self {
        MediaReference::Plain { url: url.into() }
    }

    /// Get the media kind
    pub fn kind(&self) -> MediaKind {
        match self {
            MediaReference::YouTube(_) => MediaKind::YouTube,
            MediaReference::GifPlatform(_) => MediaKind::GifPlatform,
            MediaReference::VideoFile(_) => MediaKind::VideoFile,
            MediaReference::Image(_) => MediaKind::Image,
            MediaReference::Plain { .. } => MediaKind::Plain,
        }
    }

    /// Get the URL exactly as it appeared in the source text
    pub fn url(&self) -> &str {
        match self {
            MediaReference::YouTube(media) => &media.url,
            MediaReference::GifPlatform(media) => &media.url,
            MediaReference::VideoFile(media) => &media.url,
            MediaReference::Image(media) => &media.url,
            MediaReference::Plain { url } => url,
        }
    }

    /// URL a degraded presentation should link to
    pub fn link_target(&self) -> &str {
        match self {
            MediaReference::GifPlatform(media) => &media.original_url,
            MediaReference::VideoFile(media) => &media.src,
            MediaReference::Image(media) => &media.src,
            other => other.url(),
        }
    }

    /// Whether this reference renders as inline media
    pub fn is_media(&self) -> bool {
        !matches!(self, MediaReference::Plain { .. })
    }

    /// Get as YouTube reference if applicable
    pub fn as_youtube(&self) -> Option<&YouTubeMedia> {
        match self {
            MediaReference::YouTube(media) => Some(media),
            _ => None,
        }
    }

    /// Get as GIF reference if applicable
    pub fn as_gif(&self) -> Option<&GifMedia> {
        match self {
            MediaReference::GifPlatform(media) => Some(media),
            _ => None,
        }
    }

    /// Get as video file reference if applicable
    pub fn as_video_file(&self) -> Option<&VideoFileMedia> {
        match self {
            MediaReference::VideoFile(media) => Some(media),
            _ => None,
        }
    }

    /// Get as image reference if applicable
    pub fn as_image(&self) -> Option<&ImageMedia> {
        match self {
            MediaReference::Image(media) => Some(media),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(url: &str) -> MediaReference {
        MediaReference::Image(ImageMedia { url: url.to_string(), src: url.to_string() })
    }

    #[test]
    fn test_kind_as_str() {
        assert_eq!(MediaKind::YouTube.as_str(), "youtube");
        assert_eq!(MediaKind::GifPlatform.as_str(), "gif-platform");
        assert_eq!(MediaKind::VideoFile.as_str(), "video-file");
        assert_eq!(MediaKind::Image.as_str(), "image");
        assert_eq!(MediaKind::Plain.as_str(), "plain");
    }

    #[test]
    fn test_video_like_kinds() {
        assert!(MediaKind::YouTube.is_video_like());
        assert!(MediaKind::GifPlatform.is_video_like());
        assert!(MediaKind::VideoFile.is_video_like());
        assert!(!MediaKind::Image.is_video_like());
        assert!(!MediaKind::Plain.is_video_like());
    }

    #[test]
    fn test_plain_reference() {
        let reference = MediaReference::plain("https://example.com");
        assert_eq!(reference.kind(), MediaKind::Plain);
        assert_eq!(reference.url(), "https://example.com");
        assert!(!reference.is_media());
        assert!(reference.as_image().is_none());
    }

    #[test]
    fn test_gif_link_target_is_original_url() {
        let reference = MediaReference::GifPlatform(GifMedia {
            url: "https://giphy.com/gifs/cat-abc12".to_string(),
            platform: GifPlatform::Giphy,
            media_url: "https://i.giphy.com/media/abc12/giphy.webp".to_string(),
            original_url: "https://giphy.com/gifs/cat-abc12".to_string(),
        });
        assert_eq!(reference.link_target(), "https://giphy.com/gifs/cat-abc12");
        assert_eq!(reference.as_gif().unwrap().platform.as_str(), "giphy");
    }

    #[test]
    fn test_reference_serialization() {
        let reference = MediaReference::YouTube(YouTubeMedia {
            url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
            video_id: "dQw4w9WgXcQ".to_string(),
            start_time: 0,
            is_short: false,
        });

        let json = serde_json::to_string(&reference).unwrap();
        assert!(json.contains("\"type\":\"youtube\""));
        assert!(json.contains("\"videoId\":\"dQw4w9WgXcQ\""));

        let deserialized: MediaReference = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, reference);
    }

    #[test]
    fn test_image_serialization_tag() {
        let json = serde_json::to_string(&image("https://example.com/a.png")).unwrap();
        assert!(json.contains("\"type\":\"image\""));
    }
}
