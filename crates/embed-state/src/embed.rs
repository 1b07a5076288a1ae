//! Embed lifecycle state machine
//!
//! One [`Embed`] tracks a single media reference from placeholder to ready
//! (or failed). The machine is synchronous: callers feed it container
//! widths, probe results, and media element events, and it tells them
//! which probe to start next and what to draw.
//!
//! ```text
//! Placeholder --reveal--> Loading --layout known--> Ready
//!                          ^   |                      |
//!                          |   +--load error, budget spent--> Failed
//!                          +------load error (retry)--+
//! ```

use crate::settings::{EmbedConfig, MediaSettings, Surface};
use media_detect::youtube;
use media_detect::{MediaKind, MediaReference};
use media_layout::probe::Result as ProbeResult;
use media_layout::{compute_layout, fallback_layout, Dimensions, Layout};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Widest a YouTube Shorts player is drawn
pub const SHORTS_MAX_WIDTH: u32 = 400;

/// Embed errors
#[derive(Debug, Error)]
pub enum EmbedError {
    /// The reference is a plain link and has nothing to embed
    #[error("Not an embeddable media reference: {0}")]
    NotEmbeddable(String),
}

/// Result type for embed operations
pub type Result<T> = std::result::Result<T, EmbedError>;

/// Lifecycle phase of an embed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EmbedPhase {
    /// Waiting for the user to reveal it
    Placeholder,
    /// Loading media or resolving layout
    Loading,
    /// Layout known, media displayable
    Ready,
    /// Retries exhausted; shown as a bare link
    Failed,
}

impl EmbedPhase {
    /// Whether no further transitions can happen
    pub fn is_terminal(&self) -> bool {
        matches!(self, EmbedPhase::Failed)
    }
}

/// Observable state of one embed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedState {
    /// Current phase
    pub phase: EmbedPhase,
    /// Retries issued so far
    pub attempt: u32,
    /// Whether the user revealed a gated embed
    pub revealed: bool,
    /// Display size, once known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
}

/// A dimension probe the caller should run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    /// Generation to hand back with the result
    pub generation: u64,
    /// URL to probe
    pub url: String,
}

/// Outcome of a media load error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Reload from `src`
    Retry {
        /// Retry number, starting at 1
        attempt: u32,
        /// Cache-busted source to load
        src: String,
    },
    /// The budget is spent; the embed is now failed
    Failed,
    /// The embed was not loading anything
    Ignored,
}

/// Box drawn while loading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Frame {
    /// Size not known yet: a 16:9 box capped at `max_height`
    #[serde(rename_all = "camelCase")]
    Unsized {
        /// Height cap
        max_height: u32,
    },
    /// Size already known
    Sized(Layout),
}

/// Bare hyperlink drawn in place of a failed embed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackLink {
    /// Link target (the original URL)
    pub href: String,
    /// Link label, e.g. `[image]`
    pub label: String,
}

/// What the rendering surface should draw for an embed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum EmbedView {
    /// Click-to-reveal box
    Placeholder {
        /// Prompt text
        prompt: String,
    },
    /// Spinner inside a frame; `src` may be loaded off-screen
    Loading {
        /// Frame to reserve
        frame: Frame,
        /// Source being loaded
        src: String,
    },
    /// The media itself
    Ready {
        /// Source to display
        src: String,
        /// Display size
        layout: Layout,
    },
    /// Bare hyperlink
    Failed(FallbackLink),
}

/// State machine for one embedded media reference
#[derive(Debug, Clone)]
pub struct Embed {
    reference: MediaReference,
    surface: Surface,
    max_height: u32,
    max_retry_attempts: u32,
    state: EmbedState,
    container_width: Option<u32>,
    natural: Option<Dimensions>,
    size_unknown: bool,
    element_loaded: bool,
    generation: u64,
    probe_in_flight: bool,
    torn_down: bool,
}

impl Embed {
    /// Create an embed for a classified reference
    ///
    /// Starts in `Placeholder` if the settings gate this kind, otherwise in
    /// `Loading`. Compose embeds assume the default compose width until a
    /// real width is reported.
    pub fn new(
        reference: MediaReference,
        settings: &MediaSettings,
        surface: Surface,
        config: &EmbedConfig,
    ) -> Result<Self> {
        if !reference.is_media() {
            return Err(EmbedError::NotEmbeddable(reference.url().to_string()));
        }

        let phase = if settings.auto_renders(reference.kind()) {
            EmbedPhase::Loading
        } else {
            EmbedPhase::Placeholder
        };
        let container_width = match surface {
            Surface::Compose => Some(config.compose_default_width),
            Surface::Inline => None,
        };

        Ok(Self {
            reference,
            surface,
            max_height: config.max_height(surface),
            max_retry_attempts: config.max_retry_attempts,
            state: EmbedState { phase, attempt: 0, revealed: false, layout: None },
            container_width,
            natural: None,
            size_unknown: false,
            element_loaded: false,
            generation: 0,
            probe_in_flight: false,
            torn_down: false,
        })
    }

    /// The embedded reference
    pub fn reference(&self) -> &MediaReference {
        &self.reference
    }

    /// The media kind
    pub fn kind(&self) -> MediaKind {
        self.reference.kind()
    }

    /// Where the embed is drawn
    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Height cap for this embed
    pub fn max_height(&self) -> u32 {
        self.max_height
    }

    /// Current state
    pub fn state(&self) -> EmbedState {
        self.state
    }

    /// Current phase
    pub fn phase(&self) -> EmbedPhase {
        self.state.phase
    }

    /// Retries issued so far
    pub fn attempt(&self) -> u32 {
        self.state.attempt
    }

    /// Display size, once known
    pub fn layout(&self) -> Option<Layout> {
        self.state.layout
    }

    /// Last reported container width
    pub fn container_width(&self) -> Option<u32> {
        self.container_width
    }

    /// Generation of the most recent probe request
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a probe result is awaited
    pub fn probe_in_flight(&self) -> bool {
        self.probe_in_flight
    }

    /// Whether [`Embed::teardown`] was called
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Kick off loading with whatever is already known
    ///
    /// Needed when the container width was known up front (compose
    /// previews); otherwise the first width report does the same.
    pub fn start(&mut self) -> Option<ProbeRequest> {
        if self.torn_down || self.state.phase != EmbedPhase::Loading || self.probe_in_flight {
            return None;
        }
        self.advance()
    }

    /// Reveal a gated embed
    pub fn reveal(&mut self) -> Option<ProbeRequest> {
        if self.torn_down || self.state.phase != EmbedPhase::Placeholder {
            return None;
        }
        self.state.revealed = true;
        self.state.phase = EmbedPhase::Loading;
        self.advance()
    }

    /// Report the container's width
    ///
    /// A width of 0 is ignored. Widths only re-drive layout while loading;
    /// a ready embed keeps its layout.
    pub fn set_container_width(&mut self, width: u32) -> Option<ProbeRequest> {
        if self.torn_down || width == 0 {
            return None;
        }
        match self.state.phase {
            EmbedPhase::Placeholder => {
                self.container_width = Some(width);
                None
            }
            EmbedPhase::Loading => {
                self.container_width = Some(width);
                self.advance()
            }
            EmbedPhase::Ready | EmbedPhase::Failed => None,
        }
    }

    /// Apply the result of a probe
    ///
    /// Results from a superseded generation, or arriving after teardown,
    /// are dropped. A failed probe falls back to a 16:9 layout. Returns
    /// whether the result was applied.
    pub fn apply_probe(&mut self, generation: u64, result: ProbeResult<Dimensions>) -> bool {
        if self.torn_down || !self.probe_in_flight || generation != self.generation {
            tracing::trace!("Dropping stale probe result for {}", self.reference.url());
            return false;
        }
        self.probe_in_flight = false;

        match result {
            Ok(dimensions) if dimensions.is_valid() => self.natural = Some(dimensions),
            Ok(_) => self.size_unknown = true,
            Err(e) => {
                tracing::debug!(
                    "Using fallback layout for {}: {}",
                    self.reference.url(),
                    e
                );
                self.size_unknown = true;
            }
        }

        if self.state.phase == EmbedPhase::Loading {
            self.advance();
        }
        true
    }

    /// Apply natural dimensions reported by a video element's metadata
    pub fn apply_metadata(&mut self, dimensions: Dimensions) {
        if self.torn_down || self.kind() != MediaKind::VideoFile {
            return;
        }
        if self.state.phase != EmbedPhase::Loading {
            return;
        }

        if dimensions.is_valid() {
            self.natural = Some(dimensions);
        } else {
            self.size_unknown = true;
        }
        self.advance();

        // Metadata on a retried element means the reload worked
        if self.state.phase == EmbedPhase::Loading && self.state.layout.is_some() {
            self.state.phase = EmbedPhase::Ready;
        }
    }

    /// The media element finished loading
    ///
    /// Completes a retry once layout is known. A load reported before the
    /// layout is remembered and completes the retry when layout arrives.
    pub fn media_loaded(&mut self) {
        if self.torn_down || self.state.phase != EmbedPhase::Loading {
            return;
        }
        self.element_loaded = true;
        if self.state.layout.is_some() {
            if self.state.attempt > 0 {
                tracing::debug!(
                    "Loaded {} after {} retries",
                    self.reference.url(),
                    self.state.attempt
                );
            }
            self.state.phase = EmbedPhase::Ready;
        }
    }

    /// The media element failed to load
    ///
    /// Retries with a cache-busted source until the budget is spent, then
    /// fails for good.
    pub fn media_error(&mut self) -> RetryDecision {
        if self.torn_down
            || !matches!(self.state.phase, EmbedPhase::Loading | EmbedPhase::Ready)
        {
            return RetryDecision::Ignored;
        }

        if self.state.attempt >= self.max_retry_attempts {
            tracing::warn!(
                "Giving up on {} after {} retries",
                self.reference.url(),
                self.state.attempt
            );
            self.state.phase = EmbedPhase::Failed;
            return RetryDecision::Failed;
        }

        self.state.attempt += 1;
        self.state.phase = EmbedPhase::Loading;
        self.element_loaded = false;
        let src = self.current_src();
        tracing::debug!("Retrying {} (attempt {})", self.reference.url(), self.state.attempt);
        RetryDecision::Retry { attempt: self.state.attempt, src }
    }

    /// Source the media element should load right now
    ///
    /// After a retry the base source carries an `_r=<attempt>` query
    /// parameter so a cached failure is not reused.
    pub fn current_src(&self) -> String {
        retry_src(&self.media_src(), self.state.attempt)
    }

    /// Hyperlink shown once the embed has failed
    pub fn fallback_link(&self) -> FallbackLink {
        let label = match self.kind() {
            MediaKind::Image => "[image]",
            MediaKind::GifPlatform => "[GIF]",
            MediaKind::VideoFile => "[video]",
            MediaKind::YouTube => "[YouTube]",
            MediaKind::Plain => "[link]",
        };
        FallbackLink { href: self.reference.link_target().to_string(), label: label.to_string() }
    }

    /// What the surface should draw
    pub fn view(&self) -> EmbedView {
        match self.state.phase {
            EmbedPhase::Placeholder => {
                let noun = match self.kind() {
                    MediaKind::Image => "image",
                    MediaKind::GifPlatform => "GIF",
                    _ => "video",
                };
                EmbedView::Placeholder { prompt: format!("Click to reveal {}", noun) }
            }
            EmbedPhase::Loading => EmbedView::Loading {
                frame: match self.state.layout {
                    Some(layout) => Frame::Sized(layout),
                    None => Frame::Unsized { max_height: self.max_height },
                },
                src: self.current_src(),
            },
            EmbedPhase::Ready => match self.state.layout {
                Some(layout) => EmbedView::Ready { src: self.current_src(), layout },
                None => EmbedView::Loading {
                    frame: Frame::Unsized { max_height: self.max_height },
                    src: self.current_src(),
                },
            },
            EmbedPhase::Failed => EmbedView::Failed(self.fallback_link()),
        }
    }

    /// Stop reacting to events
    ///
    /// Any probe still running is orphaned: its result will not apply.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.probe_in_flight = false;
        self.generation += 1;
    }

    /// Base source before cache busting
    fn media_src(&self) -> String {
        match &self.reference {
            MediaReference::YouTube(media) => youtube::thumbnail_url(&media.video_id),
            MediaReference::GifPlatform(media) => media.media_url.clone(),
            MediaReference::VideoFile(media) => media.src.clone(),
            MediaReference::Image(media) => media.src.clone(),
            MediaReference::Plain { url } => url.clone(),
        }
    }

    /// Layout for a container width, if enough is known to compute one
    fn resolve_layout(&self, width: u32) -> Option<Layout> {
        if let MediaReference::YouTube(media) = &self.reference {
            let (ratio_w, ratio_h) = youtube::aspect_ratio(media.is_short);
            let width = if media.is_short { width.min(SHORTS_MAX_WIDTH) } else { width };
            return Some(compute_layout(ratio_w, ratio_h, width, self.max_height));
        }
        match self.natural {
            Some(natural) => natural.layout_within(width, self.max_height),
            None if self.size_unknown => Some(fallback_layout(width, self.max_height)),
            None => None,
        }
    }

    /// Move a loading embed forward as far as current knowledge allows
    fn advance(&mut self) -> Option<ProbeRequest> {
        let width = self.container_width?;

        if let Some(layout) = self.resolve_layout(width) {
            // First layout completes the initial load; a retry waits for the element
            let settled = self.state.attempt == 0 || self.element_loaded;
            if self.state.layout.is_none() && settled {
                self.state.phase = EmbedPhase::Ready;
            }
            self.state.layout = Some(layout);
            return None;
        }

        let needs_probe = matches!(self.kind(), MediaKind::Image | MediaKind::GifPlatform);
        if needs_probe && !self.probe_in_flight {
            self.generation += 1;
            self.probe_in_flight = true;
            return Some(ProbeRequest { generation: self.generation, url: self.media_src() });
        }
        None
    }
}

/// Append the cache-busting `_r` parameter for a retry
pub fn retry_src(src: &str, attempt: u32) -> String {
    if attempt == 0 {
        return src.to_string();
    }
    let separator = if src.contains('?') { '&' } else { '?' };
    format!("{}{}_r={}", src, separator, attempt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use media_detect::classify_url;
    use media_layout::ProbeError;
    use std::time::Duration;

    const IMAGE: &str = "https://x.io/cat.png";
    const GIF: &str = "https://giphy.com/gifs/funny-cat-abc12";
    const VIDEO: &str = "https://x.io/clip.mp4";
    const YOUTUBE: &str = "https://youtu.be/dQw4w9WgXcQ";
    const SHORT: &str = "https://www.youtube.com/shorts/dQw4w9WgXcQ";

    fn embed(url: &str) -> Embed {
        embed_with(url, MediaSettings::default())
    }

    fn embed_with(url: &str, settings: MediaSettings) -> Embed {
        Embed::new(classify_url(url), &settings, Surface::Inline, &EmbedConfig::default()).unwrap()
    }

    fn ready_image() -> Embed {
        let mut embed = embed(IMAGE);
        let request = embed.set_container_width(800).unwrap();
        embed.apply_probe(request.generation, Ok(Dimensions::new(1920, 1080)));
        embed
    }

    #[test]
    fn test_plain_is_not_embeddable() {
        let result = Embed::new(
            classify_url("https://example.com"),
            &MediaSettings::default(),
            Surface::Inline,
            &EmbedConfig::default(),
        );
        assert!(matches!(result, Err(EmbedError::NotEmbeddable(_))));
    }

    #[test]
    fn test_initial_phase_follows_settings() {
        let settings = MediaSettings { auto_render_images: false, auto_render_videos: true };
        assert_eq!(embed_with(IMAGE, settings).phase(), EmbedPhase::Placeholder);
        assert_eq!(embed_with(GIF, settings).phase(), EmbedPhase::Loading);
        assert_eq!(embed_with(VIDEO, settings).phase(), EmbedPhase::Loading);

        let settings = MediaSettings { auto_render_images: true, auto_render_videos: false };
        assert_eq!(embed_with(IMAGE, settings).phase(), EmbedPhase::Loading);
        assert_eq!(embed_with(YOUTUBE, settings).phase(), EmbedPhase::Placeholder);
    }

    #[test]
    fn test_placeholder_prompts() {
        let settings = MediaSettings::click_to_reveal();
        let prompt = |url| match embed_with(url, settings).view() {
            EmbedView::Placeholder { prompt } => prompt,
            other => panic!("unexpected view {other:?}"),
        };
        assert_eq!(prompt(IMAGE), "Click to reveal image");
        assert_eq!(prompt(GIF), "Click to reveal GIF");
        assert_eq!(prompt(VIDEO), "Click to reveal video");
        assert_eq!(prompt(YOUTUBE), "Click to reveal video");
    }

    #[test]
    fn test_reveal_starts_loading() {
        let mut embed = embed_with(IMAGE, MediaSettings::click_to_reveal());
        assert!(embed.set_container_width(800).is_none());

        let request = embed.reveal().unwrap();
        assert_eq!(request.url, IMAGE);
        assert!(embed.state().revealed);
        assert_eq!(embed.phase(), EmbedPhase::Loading);
        assert!(embed.reveal().is_none());
    }

    #[test]
    fn test_probe_success_computes_layout() {
        let embed = ready_image();
        assert_eq!(embed.phase(), EmbedPhase::Ready);
        assert_eq!(embed.layout(), Some(Layout::new(800, 450)));
        assert_eq!(
            embed.view(),
            EmbedView::Ready { src: IMAGE.to_string(), layout: Layout::new(800, 450) }
        );
    }

    #[test]
    fn test_unsized_frame_before_layout() {
        let embed = embed(IMAGE);
        assert_eq!(
            embed.view(),
            EmbedView::Loading {
                frame: Frame::Unsized { max_height: 540 },
                src: IMAGE.to_string()
            }
        );
    }

    #[test]
    fn test_gif_probes_cdn_url() {
        let mut embed = embed(GIF);
        let request = embed.set_container_width(600).unwrap();
        assert_eq!(request.url, "https://i.giphy.com/media/abc12/giphy.webp");
    }

    #[test]
    fn test_probe_failure_falls_back_to_16_9() {
        let mut embed = embed(IMAGE);
        let request = embed.set_container_width(800).unwrap();
        let timeout = ProbeError::Timeout(Duration::from_secs(8));
        assert!(embed.apply_probe(request.generation, Err(timeout)));

        assert_eq!(embed.phase(), EmbedPhase::Ready);
        assert_eq!(embed.layout(), Some(Layout::new(800, 450)));
        assert_eq!(embed.attempt(), 0);
    }

    #[test]
    fn test_zero_width_ignored() {
        let mut embed = embed(IMAGE);
        assert!(embed.set_container_width(0).is_none());
        assert_eq!(embed.container_width(), None);
    }

    #[test]
    fn test_single_probe_in_flight() {
        let mut embed = embed(IMAGE);
        let first = embed.set_container_width(800).unwrap();
        assert!(embed.set_container_width(600).is_none());
        assert!(embed.probe_in_flight());

        // Layout uses the latest width
        embed.apply_probe(first.generation, Ok(Dimensions::new(1920, 1080)));
        assert_eq!(embed.layout(), Some(Layout::new(600, 338)));
    }

    #[test]
    fn test_resize_after_ready_keeps_layout() {
        let mut embed = ready_image();
        assert!(embed.set_container_width(400).is_none());
        assert_eq!(embed.layout(), Some(Layout::new(800, 450)));
    }

    #[test]
    fn test_stale_probe_result_dropped() {
        let mut embed = embed(IMAGE);
        let request = embed.set_container_width(800).unwrap();
        assert!(!embed.apply_probe(request.generation + 1, Ok(Dimensions::new(10, 10))));
        assert_eq!(embed.phase(), EmbedPhase::Loading);

        embed.teardown();
        assert!(!embed.apply_probe(request.generation, Ok(Dimensions::new(10, 10))));
        assert_eq!(embed.layout(), None);
    }

    #[test]
    fn test_retry_budget() {
        let mut embed = ready_image();

        for attempt in 1..=3 {
            let decision = embed.media_error();
            assert_eq!(
                decision,
                RetryDecision::Retry { attempt, src: format!("{}?_r={}", IMAGE, attempt) }
            );
            assert_eq!(embed.phase(), EmbedPhase::Loading);
        }

        assert_eq!(embed.media_error(), RetryDecision::Failed);
        assert_eq!(embed.phase(), EmbedPhase::Failed);
        assert_eq!(embed.media_error(), RetryDecision::Ignored);
        assert_eq!(embed.attempt(), 3);
    }

    #[test]
    fn test_retry_then_load_recovers() {
        let mut embed = ready_image();
        embed.media_error();
        assert!(matches!(embed.view(), EmbedView::Loading { frame: Frame::Sized(_), .. }));

        embed.media_loaded();
        assert_eq!(embed.phase(), EmbedPhase::Ready);
        assert_eq!(
            embed.view(),
            EmbedView::Ready { src: format!("{}?_r=1", IMAGE), layout: Layout::new(800, 450) }
        );
    }

    #[test]
    fn test_error_before_layout_waits_for_retried_element() {
        let mut embed = embed(IMAGE);
        let request = embed.set_container_width(800).unwrap();
        assert!(matches!(embed.media_error(), RetryDecision::Retry { attempt: 1, .. }));

        embed.apply_probe(request.generation, Ok(Dimensions::new(1920, 1080)));
        assert_eq!(embed.phase(), EmbedPhase::Loading);
        assert_eq!(
            embed.view(),
            EmbedView::Loading {
                frame: Frame::Sized(Layout::new(800, 450)),
                src: format!("{}?_r=1", IMAGE)
            }
        );

        embed.media_loaded();
        assert_eq!(embed.phase(), EmbedPhase::Ready);
    }

    #[test]
    fn test_retried_load_before_layout_completes_on_probe() {
        let mut embed = embed(IMAGE);
        let request = embed.set_container_width(800).unwrap();
        embed.media_error();
        embed.media_loaded();
        assert_eq!(embed.phase(), EmbedPhase::Loading);

        embed.apply_probe(request.generation, Ok(Dimensions::new(1920, 1080)));
        assert_eq!(embed.phase(), EmbedPhase::Ready);
        assert_eq!(embed.layout(), Some(Layout::new(800, 450)));
    }

    #[test]
    fn test_failed_view() {
        let mut embed = embed(GIF);
        embed.set_container_width(800);
        for _ in 0..4 {
            embed.media_error();
        }
        assert_eq!(
            embed.view(),
            EmbedView::Failed(FallbackLink { href: GIF.to_string(), label: "[GIF]".to_string() })
        );
    }

    #[test]
    fn test_failed_link_targets_pasted_url() {
        let reference = MediaReference::GifPlatform(media_detect::GifMedia {
            url: "www.giphy.com/gifs/cat-abc12".to_string(),
            platform: media_detect::GifPlatform::Giphy,
            media_url: "https://i.giphy.com/media/abc12/giphy.webp".to_string(),
            original_url: "https://www.giphy.com/gifs/cat-abc12".to_string(),
        });
        let embed = Embed::new(
            reference,
            &MediaSettings::default(),
            Surface::Inline,
            &EmbedConfig::default(),
        )
        .unwrap();
        assert_eq!(embed.fallback_link().href, "https://www.giphy.com/gifs/cat-abc12");
    }

    #[test]
    fn test_retry_src_separator() {
        assert_eq!(retry_src("https://x.io/a.png", 0), "https://x.io/a.png");
        assert_eq!(retry_src("https://x.io/a.png", 2), "https://x.io/a.png?_r=2");
        assert_eq!(retry_src("https://x.io/a.png?w=1", 1), "https://x.io/a.png?w=1&_r=1");
    }

    #[test]
    fn test_video_layout_from_metadata() {
        let mut embed = embed(VIDEO);
        assert!(embed.set_container_width(800).is_none());
        assert_eq!(embed.phase(), EmbedPhase::Loading);

        embed.apply_metadata(Dimensions::new(1080, 1920));
        assert_eq!(embed.phase(), EmbedPhase::Ready);
        assert_eq!(embed.layout(), Some(Layout::new(304, 540)));
    }

    #[test]
    fn test_video_retry_completes_on_metadata() {
        let mut embed = embed(VIDEO);
        embed.set_container_width(800);
        embed.apply_metadata(Dimensions::new(1920, 1080));
        assert!(matches!(embed.media_error(), RetryDecision::Retry { attempt: 1, .. }));

        embed.apply_metadata(Dimensions::new(1920, 1080));
        assert_eq!(embed.phase(), EmbedPhase::Ready);
        assert_eq!(embed.current_src(), format!("{}?_r=1", VIDEO));
    }

    #[test]
    fn test_video_zero_metadata_falls_back() {
        let mut embed = embed(VIDEO);
        embed.set_container_width(800);
        embed.apply_metadata(Dimensions::new(0, 0));
        assert_eq!(embed.layout(), Some(Layout::new(800, 450)));
    }

    #[test]
    fn test_youtube_ready_from_aspect_ratio() {
        let mut embed = embed(YOUTUBE);
        assert!(embed.set_container_width(800).is_none());
        assert_eq!(embed.phase(), EmbedPhase::Ready);
        assert_eq!(embed.layout(), Some(Layout::new(800, 450)));
        assert_eq!(embed.current_src(), "https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg");
    }

    #[test]
    fn test_youtube_short_capped_width() {
        let mut embed = embed(SHORT);
        embed.set_container_width(800);
        // 9:14 in 400 wide would be 622 tall, so height caps at 540
        assert_eq!(embed.layout(), Some(Layout::new(347, 540)));
    }

    #[test]
    fn test_compose_surface_defaults() {
        let mut embed = Embed::new(
            classify_url(YOUTUBE),
            &MediaSettings::default(),
            Surface::Compose,
            &EmbedConfig::default(),
        )
        .unwrap();
        assert_eq!(embed.max_height(), 200);
        assert_eq!(embed.container_width(), Some(400));

        assert!(embed.start().is_none());
        assert_eq!(embed.layout(), Some(Layout::new(356, 200)));
    }

    #[test]
    fn test_start_requests_probe_for_known_width() {
        let mut embed = Embed::new(
            classify_url(IMAGE),
            &MediaSettings::default(),
            Surface::Compose,
            &EmbedConfig::default(),
        )
        .unwrap();
        let request = embed.start().unwrap();
        assert_eq!(request.generation, embed.generation());
        assert!(embed.start().is_none());
    }

    #[test]
    fn test_teardown_ignores_events() {
        let mut embed = ready_image();
        embed.teardown();
        assert_eq!(embed.media_error(), RetryDecision::Ignored);
        assert!(embed.is_torn_down());
        assert_eq!(embed.phase(), EmbedPhase::Ready);
    }
}
