//! Giphy and Tenor link detection
//!
//! Giphy page links do not serve media directly, so they are rewritten to
//! the canonical CDN URL. Direct media links from either platform are used
//! as-is once their ID segment checks out.

use crate::reference::{GifMedia, GifPlatform};
use crate::{parse_url, path_segments};

/// Hosts serving Giphy HTML pages
const GIPHY_PAGE_HOSTS: [&str; 2] = ["giphy.com", "www.giphy.com"];

/// Hosts serving Giphy media directly
const GIPHY_MEDIA_HOSTS: [&str; 7] = [
    "media.giphy.com",
    "media0.giphy.com",
    "media1.giphy.com",
    "media2.giphy.com",
    "media3.giphy.com",
    "media4.giphy.com",
    "i.giphy.com",
];

/// Host serving Tenor media directly
const TENOR_MEDIA_HOST: &str = "media.tenor.com";

/// Shortest ID either platform issues
const MIN_ID_LENGTH: usize = 5;

/// Result of GIF platform detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GifPlatformResult {
    /// Hosting platform
    pub platform: GifPlatform,
    /// Directly fetchable media URL
    pub media_url: String,
    /// The link as pasted
    pub original_url: String,
}

impl GifPlatformResult {
    /// Attach the source URL to build a media reference
    pub fn into_media(self, url: impl Into<String>) -> GifMedia {
        GifMedia {
            url: url.into(),
            platform: self.platform,
            media_url: self.media_url,
            original_url: self.original_url,
        }
    }
}

/// Detect a Giphy or Tenor URL
///
/// # Example
///
/// ```
/// use media_detect::gif::detect_gif_platform;
///
/// let gif = detect_gif_platform("https://giphy.com/gifs/funny-cat-abc12").unwrap();
/// assert_eq!(gif.media_url, "https://i.giphy.com/media/abc12/giphy.webp");
/// ```
pub fn detect_gif_platform(url: &str) -> Option<GifPlatformResult> {
    let parsed = parse_url(url)?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    let segments = path_segments(&parsed);

    if GIPHY_PAGE_HOSTS.contains(&host.as_str()) {
        let (Some(&"gifs"), Some(slug)) = (segments.first(), segments.get(1)) else {
            return None;
        };
        let gif_id = extract_giphy_id(slug)?;
        return Some(GifPlatformResult {
            platform: GifPlatform::Giphy,
            media_url: giphy_cdn_url(gif_id),
            original_url: url.to_string(),
        });
    }

    if GIPHY_MEDIA_HOSTS.contains(&host.as_str()) {
        let gif_id = match (segments.first(), segments.get(1)) {
            (Some(&"media"), Some(id)) => *id,
            (Some(first), _) if *first != "media" => *first,
            _ => return None,
        };
        if gif_id.len() < MIN_ID_LENGTH {
            return None;
        }
        return Some(direct(GifPlatform::Giphy, url));
    }

    if host == TENOR_MEDIA_HOST {
        let media_id = segments.first()?;
        if media_id.len() < MIN_ID_LENGTH {
            return None;
        }
        return Some(direct(GifPlatform::Tenor, url));
    }

    None
}

/// Direct media link, used unchanged
fn direct(platform: GifPlatform, url: &str) -> GifPlatformResult {
    GifPlatformResult { platform, media_url: url.to_string(), original_url: url.to_string() }
}

/// The ID is whatever follows the last hyphen of the slug
fn extract_giphy_id(slug: &str) -> Option<&str> {
    let id = slug.rsplit_once('-').map(|(_, id)| id).unwrap_or(slug);
    if id.len() < MIN_ID_LENGTH || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(id)
}

/// Canonical CDN URL for a Giphy ID
pub fn giphy_cdn_url(gif_id: &str) -> String {
    format!("https://i.giphy.com/media/{}/giphy.webp", gif_id)
}
