//! Direct image link detection

use crate::lowercase_path;

/// Recognized image extensions
const IMAGE_EXTENSIONS: [&str; 6] = [".jpg", ".jpeg", ".png", ".webp", ".gif", ".avif"];

/// Check if a URL points directly at an image
pub fn is_image_url(url: &str) -> bool {
    lowercase_path(url)
        .map(|path| IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extensions() {
        for url in [
            "https://x.io/a.jpg",
            "https://x.io/a.jpeg",
            "https://x.io/a.png",
            "https://x.io/a.webp",
            "https://x.io/a.gif",
            "https://x.io/a.avif",
        ] {
            assert!(is_image_url(url), "{url}");
        }
    }

    #[test]
    fn test_case_insensitive() {
        assert!(is_image_url("https://x.io/Photo.JPG"));
    }

    #[test]
    fn test_not_image() {
        assert!(!is_image_url("https://x.io/a.svg"));
        assert!(!is_image_url("https://x.io/png"));
        assert!(!is_image_url("https://x.io/page?img=a.png"));
        assert!(!is_image_url("not a url.png"));
    }
}
