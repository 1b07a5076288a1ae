//! Media reference detection for rich text
//!
//! This crate classifies URLs found in free-form text into media kinds
//! (YouTube, GIF platforms, video files, images) and splits text into
//! renderable segments. Everything here is pure and synchronous.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classifier;
pub mod extract;
pub mod gif;
pub mod image;
pub mod reference;
pub mod render;
pub mod video;
pub mod youtube;

pub use classifier::{
    classify_media, classify_text, classify_text_excluding, classify_url, MediaCounts,
};
pub use extract::{extract_urls, LinkMatch};
pub use reference::{
    GifMedia, GifPlatform, ImageMedia, MediaKind, MediaReference, VideoFileMedia, YouTubeMedia,
};
pub use render::{render_nodes, RenderNode, RenderOptions};

use url::Url;

/// Parse a URL, failing closed on anything malformed
pub(crate) fn parse_url(raw: &str) -> Option<Url> {
    Url::parse(raw).ok()
}

/// Non-empty path segments of a parsed URL
pub(crate) fn path_segments(url: &Url) -> Vec<&str> {
    url.path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

/// Lowercased path of a URL, used for extension matching
pub(crate) fn lowercase_path(raw: &str) -> Option<String> {
    parse_url(raw).map(|url| url.path().to_ascii_lowercase())
}
