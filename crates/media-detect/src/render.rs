//! Text to renderable nodes
//!
//! Splits a message into the ordered segments a rendering surface draws:
//! plain prose, mentions, hashtags, hyperlinks, and media embeds. The source
//! text itself is never rewritten.

use crate::classifier::classify_url;
use crate::extract::{extract_hashtags, extract_mentions, extract_urls};
use crate::reference::{MediaKind, MediaReference};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Options controlling how media URLs render
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    /// Render at most this many image URLs; later ones are omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_images: Option<usize>,
    /// Render at most this many YouTube/GIF/video URLs; later ones are omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_videos: Option<usize>,
    /// Render embeds as static, non-interactive previews
    #[serde(default)]
    pub static_preview: bool,
}

impl RenderOptions {
    /// Limit the number of rendered images
    pub fn with_max_images(mut self, max: usize) -> Self {
        self.max_images = Some(max);
        self
    }

    /// Limit the number of rendered videos
    pub fn with_max_videos(mut self, max: usize) -> Self {
        self.max_videos = Some(max);
        self
    }

    /// Render static previews
    pub fn static_preview(mut self) -> Self {
        self.static_preview = true;
        self
    }
}

/// One renderable segment of a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "camelCase")]
pub enum RenderNode {
    /// Ordinary prose
    Text {
        /// The prose
        text: String,
    },
    /// `@handle` mention
    Mention {
        /// Handle without the `@`
        handle: String,
        /// Mention as written
        text: String,
    },
    /// `#tag` hashtag
    Hashtag {
        /// Lowercased tag without the `#`
        tag: String,
        /// Hashtag as written
        text: String,
    },
    /// Styled hyperlink
    Link {
        /// Link target
        href: String,
        /// Link text as written
        text: String,
    },
    /// Inline media
    Embed {
        /// The classified reference
        reference: MediaReference,
        /// Whether to draw a static preview instead of an interactive embed
        static_preview: bool,
    },
}

impl RenderNode {
    /// Whether this node is an inline media embed
    pub fn is_embed(&self) -> bool {
        matches!(self, RenderNode::Embed { .. })
    }

    /// The media reference of an embed node
    pub fn reference(&self) -> Option<&MediaReference> {
        match self {
            RenderNode::Embed { reference, .. } => Some(reference),
            _ => None,
        }
    }
}

/// A special span before it becomes a node
enum Span {
    Mention(String),
    Hashtag(String),
    Url(String),
}

/// Split text into renderable nodes
///
/// # Example
///
/// ```
/// use media_detect::{render_nodes, RenderNode, RenderOptions};
///
/// let nodes = render_nodes("hi @alice https://example.com/cat.png", &RenderOptions::default());
/// assert_eq!(nodes.len(), 4);
/// assert!(nodes[3].is_embed());
/// ```
pub fn render_nodes(text: &str, options: &RenderOptions) -> Vec<RenderNode> {
    let mut spans: Vec<(Range<usize>, Span)> = extract_urls(text)
        .into_iter()
        .map(|link| (link.range, Span::Url(link.href)))
        .collect();

    // Mentions and hashtags never split a link
    let overlaps_link = |range: &Range<usize>, spans: &[(Range<usize>, Span)]| {
        spans.iter().any(|(taken, _)| range.start < taken.end && taken.start < range.end)
    };
    for mention in extract_mentions(text) {
        if !overlaps_link(&mention.range, &spans) {
            spans.push((mention.range, Span::Mention(mention.handle)));
        }
    }
    for hashtag in extract_hashtags(text) {
        if !overlaps_link(&hashtag.range, &spans) {
            spans.push((hashtag.range, Span::Hashtag(hashtag.tag)));
        }
    }
    spans.sort_by_key(|(range, _)| range.start);

    let mut budget = MediaBudget::new(options);
    let mut nodes = Vec::new();
    let mut last = 0;

    for (range, span) in spans {
        if range.start > last {
            nodes.push(RenderNode::Text { text: text[last..range.start].to_string() });
        }
        let written = text[range.clone()].to_string();

        match span {
            Span::Mention(handle) => nodes.push(RenderNode::Mention { handle, text: written }),
            Span::Hashtag(tag) => nodes.push(RenderNode::Hashtag { tag, text: written }),
            Span::Url(href) => {
                let reference = classify_url(&href);
                if reference.kind() == MediaKind::Plain {
                    nodes.push(RenderNode::Link { href, text: written });
                } else if budget.admit(reference.kind()) {
                    nodes.push(RenderNode::Embed {
                        reference,
                        static_preview: options.static_preview,
                    });
                } else {
                    tracing::trace!("Omitting {} beyond render limit", href);
                }
            }
        }

        last = range.end;
    }

    if last < text.len() || nodes.is_empty() {
        nodes.push(RenderNode::Text { text: text[last..].to_string() });
    }

    nodes
}

/// Remaining image and video allowances for one message
struct MediaBudget {
    images: Option<usize>,
    videos: Option<usize>,
}

impl MediaBudget {
    fn new(options: &RenderOptions) -> Self {
        Self { images: options.max_images, videos: options.max_videos }
    }

    /// Take one slot for a media kind, or report the limit is spent
    fn admit(&mut self, kind: MediaKind) -> bool {
        let slot = if kind.is_video_like() { &mut self.videos } else { &mut self.images };
        match slot {
            None => true,
            Some(0) => false,
            Some(remaining) => {
                *remaining -= 1;
                true
            }
        }
    }
}
