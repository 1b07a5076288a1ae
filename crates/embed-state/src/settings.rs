//! Media settings and embed configuration

use media_detect::MediaKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Maximum embed height in message bodies
pub const INLINE_MAX_HEIGHT: u32 = 540;

/// Maximum embed height in the compose preview
pub const COMPOSE_MAX_HEIGHT: u32 = 200;

/// Retries allowed after the initial load fails
pub const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Quiet period before compose text is reclassified
pub const COMPOSE_DEBOUNCE: Duration = Duration::from_millis(500);

/// Visible fraction at which a video autoplays
pub const AUTOPLAY_THRESHOLD: f64 = 0.5;

/// Pointer inactivity after which video controls hide
pub const CONTROLS_HIDE_DELAY: Duration = Duration::from_secs(2);

/// Visible fraction below which an active YouTube player is torn down
pub const YOUTUBE_DEACTIVATE_THRESHOLD: f64 = 0.1;

/// Container width assumed for the compose preview before it is measured
pub const COMPOSE_DEFAULT_WIDTH: u32 = 400;

/// User preferences for automatic media rendering
///
/// Missing fields deserialize to `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaSettings {
    /// Load image embeds without a click
    #[serde(default = "default_true")]
    pub auto_render_images: bool,
    /// Load GIF, video, and YouTube embeds without a click
    #[serde(default = "default_true")]
    pub auto_render_videos: bool,
}

fn default_true() -> bool {
    true
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self { auto_render_images: true, auto_render_videos: true }
    }
}

impl MediaSettings {
    /// Settings with every kind gated behind a click
    pub fn click_to_reveal() -> Self {
        Self { auto_render_images: false, auto_render_videos: false }
    }

    /// Whether embeds of this kind load without a click
    pub fn auto_renders(&self, kind: MediaKind) -> bool {
        match kind {
            MediaKind::Image => self.auto_render_images,
            MediaKind::YouTube | MediaKind::GifPlatform | MediaKind::VideoFile => {
                self.auto_render_videos
            }
            MediaKind::Plain => false,
        }
    }
}

/// Where an embed is drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Surface {
    /// Inside a rendered message
    #[default]
    Inline,
    /// Inside the compose preview
    Compose,
}

/// Timing and sizing configuration for embeds
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedConfig {
    /// Maximum height for inline embeds
    pub inline_max_height: u32,
    /// Maximum height for compose previews
    pub compose_max_height: u32,
    /// Retries allowed after the initial load fails
    pub max_retry_attempts: u32,
    /// Time allowed for a dimension probe
    pub probe_timeout: Duration,
    /// Compose reclassification debounce
    pub debounce_delay: Duration,
    /// Visible fraction at which a video autoplays
    pub autoplay_threshold: f64,
    /// Pointer inactivity before controls hide
    pub controls_hide_delay: Duration,
    /// Visible fraction below which a YouTube player deactivates
    pub youtube_deactivate_threshold: f64,
    /// Assumed compose container width before measurement
    pub compose_default_width: u32,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            inline_max_height: INLINE_MAX_HEIGHT,
            compose_max_height: COMPOSE_MAX_HEIGHT,
            max_retry_attempts: MAX_RETRY_ATTEMPTS,
            probe_timeout: media_layout::DEFAULT_PROBE_TIMEOUT,
            debounce_delay: COMPOSE_DEBOUNCE,
            autoplay_threshold: AUTOPLAY_THRESHOLD,
            controls_hide_delay: CONTROLS_HIDE_DELAY,
            youtube_deactivate_threshold: YOUTUBE_DEACTIVATE_THRESHOLD,
            compose_default_width: COMPOSE_DEFAULT_WIDTH,
        }
    }
}

impl EmbedConfig {
    /// Maximum embed height for a surface
    pub fn max_height(&self, surface: Surface) -> u32 {
        match surface {
            Surface::Inline => self.inline_max_height,
            Surface::Compose => self.compose_max_height,
        }
    }

    /// Set the retry budget
    pub fn with_max_retry_attempts(mut self, attempts: u32) -> Self {
        self.max_retry_attempts = attempts;
        self
    }

    /// Set the probe timeout
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Set the compose debounce delay
    pub fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }
}
