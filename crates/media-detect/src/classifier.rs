//! URL classification
//!
//! Runs the kind detectors over a URL in a fixed priority order and keeps
//! the first match: YouTube, then GIF platforms, then video files, then
//! images. A URL no detector accepts is a plain link.

use crate::extract::extract_urls;
use crate::gif::detect_gif_platform;
use crate::image::is_image_url;
use crate::reference::{ImageMedia, MediaKind, MediaReference};
use crate::video::detect_video_file;
use crate::youtube::detect_youtube;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A kind detector: the URL's reference if it is this kind, otherwise `None`
pub type Detector = fn(&str) -> Option<MediaReference>;

/// Detectors in priority order
pub const DETECTORS: [(MediaKind, Detector); 4] = [
    (MediaKind::YouTube, youtube_reference),
    (MediaKind::GifPlatform, gif_reference),
    (MediaKind::VideoFile, video_reference),
    (MediaKind::Image, image_reference),
];

fn youtube_reference(url: &str) -> Option<MediaReference> {
    detect_youtube(url).map(|params| MediaReference::YouTube(params.into_media(url)))
}

fn gif_reference(url: &str) -> Option<MediaReference> {
    detect_gif_platform(url).map(|gif| MediaReference::GifPlatform(gif.into_media(url)))
}

fn video_reference(url: &str) -> Option<MediaReference> {
    detect_video_file(url).map(|video| MediaReference::VideoFile(video.into_media(url)))
}

fn image_reference(url: &str) -> Option<MediaReference> {
    is_image_url(url)
        .then(|| MediaReference::Image(ImageMedia { url: url.to_string(), src: url.to_string() }))
}

/// Classify a URL as inline media, or `None` for a plain link
pub fn classify_media(url: &str) -> Option<MediaReference> {
    DETECTORS.iter().find_map(|(_, detect)| detect(url))
}

/// Classify a URL, falling through to a plain link
///
/// # Example
///
/// ```
/// use media_detect::{classify_url, MediaKind};
///
/// assert_eq!(classify_url("https://youtu.be/dQw4w9WgXcQ").kind(), MediaKind::YouTube);
/// assert_eq!(classify_url("https://example.com/cat.png").kind(), MediaKind::Image);
/// assert_eq!(classify_url("https://example.com").kind(), MediaKind::Plain);
/// ```
pub fn classify_url(url: &str) -> MediaReference {
    classify_media(url).unwrap_or_else(|| MediaReference::plain(url))
}

/// Classify every media URL in a text, in order of appearance
///
/// Plain links are skipped.
pub fn classify_text(text: &str) -> Vec<MediaReference> {
    classify_text_excluding(text, &HashSet::new())
}

/// Classify every media URL in a text, skipping dismissed URLs
///
/// Dismissal matches the extracted URL string exactly.
pub fn classify_text_excluding(text: &str, dismissed: &HashSet<String>) -> Vec<MediaReference> {
    extract_urls(text)
        .into_iter()
        .filter(|link| !dismissed.contains(&link.href))
        .filter_map(|link| classify_media(&link.href))
        .collect()
}

/// Per-kind counts of the media URLs in a text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaCounts {
    /// YouTube links
    pub youtube: usize,
    /// Giphy/Tenor links
    pub gifs: usize,
    /// Video file links
    pub video_files: usize,
    /// Image links
    pub images: usize,
}

impl MediaCounts {
    /// Count the media URLs of each kind in a text
    ///
    /// Each URL counts once, under the kind it classifies as.
    pub fn of_text(text: &str) -> Self {
        let mut counts = Self::default();
        for reference in classify_text(text) {
            match reference.kind() {
                MediaKind::YouTube => counts.youtube += 1,
                MediaKind::GifPlatform => counts.gifs += 1,
                MediaKind::VideoFile => counts.video_files += 1,
                MediaKind::Image => counts.images += 1,
                MediaKind::Plain => {}
            }
        }
        counts
    }

    /// Video-like media (YouTube, GIFs, video files)
    pub fn videos(&self) -> usize {
        self.youtube + self.gifs + self.video_files
    }

    /// All media
    pub fn total(&self) -> usize {
        self.videos() + self.images
    }
}

/// Count URLs in a text that the YouTube detector accepts
pub fn count_youtube_urls(text: &str) -> usize {
    count_matching(text, |url| detect_youtube(url).is_some())
}

/// Count URLs in a text that the GIF platform detector accepts
pub fn count_gif_urls(text: &str) -> usize {
    count_matching(text, |url| detect_gif_platform(url).is_some())
}

/// Count URLs in a text that the video file detector accepts
pub fn count_video_file_urls(text: &str) -> usize {
    count_matching(text, |url| detect_video_file(url).is_some())
}

/// Count URLs in a text that the image detector accepts
///
/// This looks at each detector on its own, so a Giphy `.gif` link counts
/// here as well as in [`count_gif_urls`].
pub fn count_image_urls(text: &str) -> usize {
    count_matching(text, is_image_url)
}

fn count_matching(text: &str, accepts: impl Fn(&str) -> bool) -> usize {
    extract_urls(text).iter().filter(|link| accepts(&link.href)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [&str; 10] = [
        "https://youtu.be/dQw4w9WgXcQ",
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ&x=.mp4",
        "https://giphy.com/gifs/funny-cat-abc12",
        "https://media.giphy.com/media/abc12XYZ/giphy.gif",
        "https://media.tenor.com/AbCdEfGh123/tenor.mp4",
        "https://cdn.example.com/clip.webm",
        "https://cdn.example.com/photo.jpeg",
        "https://example.com/page",
        "https://youtu.be/short.png",
        "nonsense",
    ];

    #[test]
    fn test_exactly_one_kind_per_url() {
        for url in SAMPLES {
            let matches = DETECTORS.iter().filter(|(_, detect)| detect(url).is_some()).count();
            let reference = classify_url(url);
            if matches == 0 {
                assert_eq!(reference.kind(), MediaKind::Plain, "{url}");
            } else {
                let first = DETECTORS.iter().find(|(_, detect)| detect(url).is_some()).unwrap().0;
                assert_eq!(reference.kind(), first, "{url}");
            }
        }
    }

    #[test]
    fn test_priority_gif_over_image() {
        let reference = classify_url("https://media.giphy.com/media/abc12XYZ/giphy.gif");
        assert_eq!(reference.kind(), MediaKind::GifPlatform);
    }

    #[test]
    fn test_priority_gif_over_video() {
        let reference = classify_url("https://media.tenor.com/AbCdEfGh123/tenor.mp4");
        assert_eq!(reference.kind(), MediaKind::GifPlatform);
    }

    #[test]
    fn test_failed_youtube_falls_through() {
        let reference = classify_url("https://youtu.be/short.png");
        assert_eq!(reference.kind(), MediaKind::Image);
    }

    #[test]
    fn test_plain_fallback_keeps_url() {
        let reference = classify_url("https://example.com/page");
        assert_eq!(reference, MediaReference::plain("https://example.com/page"));
    }

    #[test]
    fn test_classify_text_in_order_and_skips_plain() {
        let text = "a https://x.io/a.png b https://example.com c https://youtu.be/dQw4w9WgXcQ";
        let kinds: Vec<_> = classify_text(text).iter().map(|r| r.kind()).collect();
        assert_eq!(kinds, vec![MediaKind::Image, MediaKind::YouTube]);
    }

    #[test]
    fn test_classify_text_excluding() {
        let text = "https://x.io/a.png https://x.io/b.png";
        let dismissed: HashSet<String> = ["https://x.io/a.png".to_string()].into_iter().collect();
        let references = classify_text_excluding(text, &dismissed);
        assert_eq!(references.len(), 1);
        assert_eq!(references[0].url(), "https://x.io/b.png");
    }

    #[test]
    fn test_media_counts() {
        let text = "https://x.io/a.png https://x.io/b.gif https://youtu.be/dQw4w9WgXcQ \
                    https://x.io/c.mp4 https://giphy.com/gifs/cat-abc12 https://example.com";
        let counts = MediaCounts::of_text(text);
        assert_eq!(counts.images, 2);
        assert_eq!(counts.youtube, 1);
        assert_eq!(counts.video_files, 1);
        assert_eq!(counts.gifs, 1);
        assert_eq!(counts.videos(), 3);
        assert_eq!(counts.total(), 5);
    }

    #[test]
    fn test_individual_counts() {
        let text = "https://media.giphy.com/media/abc12XYZ/giphy.gif https://x.io/a.png";
        assert_eq!(count_gif_urls(text), 1);
        assert_eq!(count_image_urls(text), 2);
        assert_eq!(count_youtube_urls(text), 0);
        assert_eq!(count_video_file_urls(text), 0);
    }
}
