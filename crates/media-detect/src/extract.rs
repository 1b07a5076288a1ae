//! Link, mention, and hashtag extraction
//!
//! Finds the spans of free-form text that carry meaning: hyperlinks,
//! `@mentions`, and `#hashtags`. Ranges are UTF-8 byte offsets into the
//! original text.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::OnceLock;

/// Longest hashtag body, not counting the `#`
pub const MAX_HASHTAG_LENGTH: usize = 30;

/// A hyperlink found in text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkMatch {
    /// Normalized link target (always carries a scheme)
    pub href: String,
    /// Link text exactly as written
    pub text: String,
    /// Byte range of the link text
    pub range: Range<usize>,
}

/// An `@handle` mention found in text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionMatch {
    /// Handle without the `@`
    pub handle: String,
    /// Byte range of the mention including the `@`
    pub range: Range<usize>,
}

/// A `#tag` found in text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashtagMatch {
    /// Lowercased tag without the `#`
    pub tag: String,
    /// Byte range of the hashtag including the `#`
    pub range: Range<usize>,
}

/// Extract hyperlinks from text
///
/// Matches `http(s)://` URLs and bare `www.` hosts (which get an `https://`
/// scheme). A link may follow any character except a word character or one
/// of `/ . @ -`, so quoted, bracketed and `label:` links are found while
/// `foo.www.x` and `a@www.x` are not. Trailing sentence punctuation is not
/// part of the link.
///
/// # Example
///
/// ```
/// use media_detect::extract_urls;
///
/// let links = extract_urls("Look: https://example.com/cat.png, nice");
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].href, "https://example.com/cat.png");
/// ```
pub fn extract_urls(text: &str) -> Vec<LinkMatch> {
    static LINK_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = LINK_REGEX.get_or_init(|| {
        Regex::new(r#"(?:^|[^\w/.@-])((?i:https?://)[^\s<>"]+|(?i:www\.)[^\s<>"]+)"#)
            .expect("link regex is valid")
    });

    let mut links = Vec::new();

    for cap in re.captures_iter(text) {
        let Some(m) = cap.get(1) else {
            continue;
        };

        let link_text = trim_trailing_punctuation(m.as_str());
        if link_text.is_empty() || link_text.ends_with("://") {
            continue;
        }

        let href = if link_text.len() >= 4 && link_text[..4].eq_ignore_ascii_case("www.") {
            format!("https://{}", link_text)
        } else {
            link_text.to_string()
        };

        let start = m.start();
        links.push(LinkMatch {
            href,
            text: link_text.to_string(),
            range: start..start + link_text.len(),
        });
    }

    links
}

/// Strip sentence punctuation that trails a link
///
/// A closing parenthesis is kept while it balances one opened inside the
/// link, so Wikipedia-style links survive.
fn trim_trailing_punctuation(mut link: &str) -> &str {
    while let Some(last) = link.chars().last() {
        if !matches!(last, '.' | ',' | ';' | ':' | '!' | '?' | ')' | ']' | '}' | '\'' | '"') {
            break;
        }
        if last == ')' && link.matches('(').count() >= link.matches(')').count() {
            break;
        }
        link = &link[..link.len() - last.len_utf8()];
    }
    link
}

/// Extract `@handle` mentions from text
pub fn extract_mentions(text: &str) -> Vec<MentionMatch> {
    static MENTION_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = MENTION_REGEX.get_or_init(|| {
        Regex::new(r"(?:^|\s|\()(@([a-zA-Z0-9][a-zA-Z0-9.-]*[a-zA-Z0-9]))")
            .expect("mention regex is valid")
    });

    re.captures_iter(text)
        .filter_map(|cap| {
            let full = cap.get(1)?;
            let handle = cap.get(2)?;
            Some(MentionMatch { handle: handle.as_str().to_string(), range: full.range() })
        })
        .collect()
}

/// Extract `#hashtags` from text
///
/// A hashtag must start the text or follow whitespace, and must be followed
/// by the end of the text, whitespace, or sentence punctuation.
pub fn extract_hashtags(text: &str) -> Vec<HashtagMatch> {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = TAG_REGEX.get_or_init(|| {
        Regex::new(&format!(r"#[\p{{L}}\p{{N}}_]{{1,{}}}", MAX_HASHTAG_LENGTH))
            .expect("hashtag regex is valid")
    });

    re.find_iter(text)
        .filter(|m| {
            let valid_before =
                text[..m.start()].chars().next_back().map_or(true, char::is_whitespace);
            let valid_after = text[m.end()..].chars().next().map_or(true, |c| {
                c.is_whitespace() || matches!(c, '.' | ',' | ';' | '!' | '?')
            });
            valid_before && valid_after
        })
        .map(|m| HashtagMatch { tag: m.as_str()[1..].to_lowercase(), range: m.range() })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_https() {
        let links = extract_urls("Check out https://example.com for more info");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].href, "https://example.com");
        assert_eq!(links[0].range, 10..29);
    }

    #[test]
    fn test_extract_multiple_in_order() {
        let links = extract_urls("https://a.io/1.png and http://b.io/2.mp4");
        let hrefs: Vec<_> = links.iter().map(|l| l.href.as_str()).collect();
        assert_eq!(hrefs, vec!["https://a.io/1.png", "http://b.io/2.mp4"]);
    }

    #[test]
    fn test_www_gets_scheme() {
        let links = extract_urls("see www.example.com/page");
        assert_eq!(links[0].href, "https://www.example.com/page");
        assert_eq!(links[0].text, "www.example.com/page");
    }

    #[test]
    fn test_trailing_punctuation() {
        let links = extract_urls("Visit https://example.com. It's great!");
        assert_eq!(links[0].href, "https://example.com");

        let links = extract_urls("(see https://en.wikipedia.org/wiki/Rust_(language))");
        assert_eq!(links[0].href, "https://en.wikipedia.org/wiki/Rust_(language)");
    }

    #[test]
    fn test_query_and_fragment_kept() {
        let links = extract_urls("https://youtu.be/dQw4w9WgXcQ?t=43s");
        assert_eq!(links[0].href, "https://youtu.be/dQw4w9WgXcQ?t=43s");
    }

    #[test]
    fn test_wrapped_links() {
        for text in [
            "\"https://x.io/a.png\"",
            "'https://x.io/a.png'",
            "image:https://x.io/a.png",
            "[https://x.io/a.png]",
            "<https://x.io/a.png>",
            "{https://x.io/a.png}",
        ] {
            let links = extract_urls(text);
            assert_eq!(links.len(), 1, "{text}");
            assert_eq!(links[0].href, "https://x.io/a.png", "{text}");
            assert_eq!(&text[links[0].range.clone()], "https://x.io/a.png");
        }
    }

    #[test]
    fn test_embedded_hosts_are_not_links() {
        assert!(extract_urls("foo.www.example.com").is_empty());
        assert!(extract_urls("bob@www.example.com").is_empty());
        assert!(extract_urls("xhttps://example.com").is_empty());

        // A URL in a query string stays part of the outer link
        let links = extract_urls("https://a.io/?u=https://b.io/c.png");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].href, "https://a.io/?u=https://b.io/c.png");
    }

    #[test]
    fn test_no_links_in_prose() {
        assert!(extract_urls("just some words, file.png and a.b").is_empty());
        assert!(extract_urls("https:// nothing").is_empty());
    }

    #[test]
    fn test_byte_ranges_with_unicode_prefix() {
        let text = "héllo 👋 https://example.com/a.png";
        let links = extract_urls(text);
        assert_eq!(&text[links[0].range.clone()], "https://example.com/a.png");
    }

    #[test]
    fn test_extract_mentions() {
        let text = "Hey @alice.bsky.social how are you?";
        let mentions = extract_mentions(text);
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].handle, "alice.bsky.social");
        assert_eq!(&text[mentions[0].range.clone()], "@alice.bsky.social");
    }

    #[test]
    fn test_email_is_not_mention() {
        assert!(extract_mentions("mail me at bob@example.com").is_empty());
    }

    #[test]
    fn test_extract_hashtags() {
        let text = "This is #Awesome and #cool!";
        let tags = extract_hashtags(text);
        let names: Vec<_> = tags.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(names, vec!["awesome", "cool"]);
        assert_eq!(&text[tags[0].range.clone()], "#Awesome");
    }

    #[test]
    fn test_hashtag_boundaries() {
        assert!(extract_hashtags("abc#tag").is_empty());
        assert!(extract_hashtags("#tag-suffix").is_empty());
        assert_eq!(extract_hashtags("#日本語 ok").len(), 1);
        assert!(extract_hashtags(&format!("#{}", "a".repeat(31))).is_empty());
        assert_eq!(extract_hashtags(&format!("#{}", "a".repeat(30))).len(), 1);
    }
}
