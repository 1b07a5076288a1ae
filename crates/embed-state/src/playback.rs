//! Video playback control
//!
//! [`PlaybackController`] decides when an inline video plays, pauses, and
//! mutes, and when its controls overlay hides. It never touches a media
//! element itself: every method returns the [`PlaybackCommand`] the host
//! should apply, and the controls deadline tells the host when to call
//! [`PlaybackController::tick`].
//!
//! [`YouTubePlayer`] is the much smaller equivalent for YouTube embeds.

use crate::settings::EmbedConfig;
use media_detect::youtube;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

/// The user's explicit playback choice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackIntent {
    /// No choice yet: play muted while visible
    #[default]
    Auto,
    /// The user pressed play
    Playing,
    /// The user pressed pause
    Paused,
}

/// Instruction for the host media element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum PlaybackCommand {
    /// Start playback
    Play {
        /// Mute state to apply first
        muted: bool,
    },
    /// Pause playback
    Pause,
    /// Change the mute state
    SetMuted {
        /// New mute state
        muted: bool,
    },
    /// Jump to a position
    Seek {
        /// Position in seconds
        position: f64,
    },
}

/// Playback state machine for one inline video
#[derive(Debug, Clone)]
pub struct PlaybackController {
    intent: PlaybackIntent,
    muted_by_user: bool,
    muted: bool,
    playing: bool,
    visible: bool,
    enabled: bool,
    current_time: f64,
    duration: f64,
    controls_visible: bool,
    controls_deadline: Option<Instant>,
    autoplay_threshold: f64,
    hide_delay: Duration,
}

impl PlaybackController {
    /// Create a controller; videos start muted
    pub fn new(config: &EmbedConfig) -> Self {
        Self {
            intent: PlaybackIntent::Auto,
            muted_by_user: true,
            muted: true,
            playing: false,
            visible: false,
            enabled: false,
            current_time: 0.0,
            duration: 0.0,
            controls_visible: true,
            controls_deadline: None,
            autoplay_threshold: config.autoplay_threshold,
            hide_delay: config.controls_hide_delay,
        }
    }

    /// Enable or disable command output
    ///
    /// A video that is not revealed (or has failed) has no element to
    /// command. Enabling while visible applies the current intent.
    pub fn set_enabled(&mut self, enabled: bool) -> Option<PlaybackCommand> {
        if self.enabled == enabled {
            return None;
        }
        self.enabled = enabled;
        if enabled && self.visible {
            self.visible_command()
        } else {
            None
        }
    }

    /// Current intent
    pub fn intent(&self) -> PlaybackIntent {
        self.intent
    }

    /// Whether the element is playing
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether the element is muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Viewport visibility changed
    ///
    /// Crossing into view resumes according to intent; leaving view always
    /// pauses. Changes that do not cross the threshold do nothing.
    pub fn on_visibility(&mut self, ratio: f64) -> Option<PlaybackCommand> {
        let visible = ratio >= self.autoplay_threshold;
        if visible == self.visible {
            return None;
        }
        self.visible = visible;
        if !self.enabled {
            return None;
        }

        if visible {
            self.visible_command()
        } else {
            Some(PlaybackCommand::Pause)
        }
    }

    fn visible_command(&mut self) -> Option<PlaybackCommand> {
        let muted = match self.intent {
            PlaybackIntent::Paused => return None,
            PlaybackIntent::Auto => true,
            PlaybackIntent::Playing => self.muted_by_user,
        };
        self.muted = muted;
        Some(PlaybackCommand::Play { muted })
    }

    /// Play/pause button or a click on the video
    pub fn toggle_play(&mut self, now: Instant) -> Option<PlaybackCommand> {
        if !self.enabled {
            return None;
        }
        self.reset_hide_timer(now);

        if self.playing {
            self.intent = PlaybackIntent::Paused;
            Some(PlaybackCommand::Pause)
        } else {
            self.intent = PlaybackIntent::Playing;
            self.muted = self.muted_by_user;
            Some(PlaybackCommand::Play { muted: self.muted_by_user })
        }
    }

    /// Mute button; the choice is remembered for later resumes
    pub fn toggle_mute(&mut self, now: Instant) -> Option<PlaybackCommand> {
        if !self.enabled {
            return None;
        }
        self.reset_hide_timer(now);

        self.muted = !self.muted;
        self.muted_by_user = self.muted;
        Some(PlaybackCommand::SetMuted { muted: self.muted })
    }

    /// Seek to a horizontal fraction of the progress bar
    ///
    /// The fraction is clamped to `[0, 1]`. Nothing happens until the
    /// duration is known.
    pub fn seek(&mut self, fraction: f64, now: Instant) -> Option<PlaybackCommand> {
        if !self.enabled || self.duration <= 0.0 || fraction.is_nan() {
            return None;
        }
        self.reset_hide_timer(now);

        let position = fraction.clamp(0.0, 1.0) * self.duration;
        self.current_time = position;
        Some(PlaybackCommand::Seek { position })
    }

    /// Element reported a new playback position
    pub fn time_update(&mut self, current_time: f64) {
        self.current_time = current_time;
    }

    /// Element reported its duration
    pub fn duration_change(&mut self, duration: f64) {
        self.duration = if duration.is_finite() && duration > 0.0 { duration } else { 0.0 };
    }

    /// Element started playing
    pub fn played(&mut self) {
        self.playing = true;
    }

    /// Element paused
    pub fn paused(&mut self) {
        self.playing = false;
    }

    /// Known duration in seconds, 0 if unknown
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Playback position in seconds
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Progress bar fill, `0.0..=100.0`
    pub fn progress_percent(&self) -> f64 {
        if self.duration > 0.0 {
            (self.current_time / self.duration * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        }
    }

    /// Pointer entered the video: show controls and keep them up
    pub fn pointer_enter(&mut self) {
        self.controls_visible = true;
        self.controls_deadline = None;
    }

    /// Pointer moved over the video
    pub fn pointer_move(&mut self, now: Instant) {
        self.reset_hide_timer(now);
    }

    /// Pointer left the video
    pub fn pointer_leave(&mut self, now: Instant) {
        self.reset_hide_timer(now);
    }

    fn reset_hide_timer(&mut self, now: Instant) {
        self.controls_visible = true;
        self.controls_deadline = Some(now + self.hide_delay);
    }

    /// When the host should next call [`PlaybackController::tick`]
    pub fn controls_deadline(&self) -> Option<Instant> {
        self.controls_deadline
    }

    /// Hide controls if their deadline has passed
    ///
    /// Returns whether the controls were hidden by this call.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.controls_deadline {
            Some(deadline) if now >= deadline => {
                self.controls_deadline = None;
                self.controls_visible = false;
                true
            }
            _ => false,
        }
    }

    /// Whether the controls overlay is shown
    pub fn controls_visible(&self) -> bool {
        self.controls_visible
    }

    /// Whether the controls overlay takes pointer input
    ///
    /// Hidden controls stay in place but must not intercept clicks.
    pub fn controls_accept_pointer(&self) -> bool {
        self.controls_visible
    }
}

/// Format seconds as `m:ss`
///
/// # Example
///
/// ```
/// use embed_state::playback::format_time;
///
/// assert_eq!(format_time(75.9), "1:15");
/// assert_eq!(format_time(3600.0), "60:00");
/// ```
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 { seconds.floor() as u64 } else { 0 };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Activation phase of a YouTube embed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayerPhase {
    /// Thumbnail with a play button
    #[default]
    Thumbnail,
    /// Player iframe mounted, not loaded yet
    Loading,
    /// Player iframe loaded
    Active,
}

/// Click-to-activate YouTube player
#[derive(Debug, Clone)]
pub struct YouTubePlayer {
    video_id: String,
    start_time: u32,
    phase: PlayerPhase,
    deactivate_threshold: f64,
}

impl YouTubePlayer {
    /// Create a player showing its thumbnail
    pub fn new(video_id: impl Into<String>, start_time: u32, config: &EmbedConfig) -> Self {
        Self {
            video_id: video_id.into(),
            start_time,
            phase: PlayerPhase::Thumbnail,
            deactivate_threshold: config.youtube_deactivate_threshold,
        }
    }

    /// Current phase
    pub fn phase(&self) -> PlayerPhase {
        self.phase
    }

    /// The user clicked play
    pub fn activate(&mut self) {
        if self.phase == PlayerPhase::Thumbnail {
            self.phase = PlayerPhase::Loading;
        }
    }

    /// The iframe finished loading
    pub fn iframe_loaded(&mut self) {
        if self.phase == PlayerPhase::Loading {
            self.phase = PlayerPhase::Active;
        }
    }

    /// Viewport visibility changed
    ///
    /// An active player scrolled mostly out of view is unmounted and goes
    /// back to its thumbnail. Returns whether that happened.
    pub fn on_visibility(&mut self, ratio: f64) -> bool {
        if self.phase != PlayerPhase::Thumbnail && ratio < self.deactivate_threshold {
            self.phase = PlayerPhase::Thumbnail;
            return true;
        }
        false
    }

    /// Thumbnail image URL
    pub fn thumbnail_url(&self) -> String {
        youtube::thumbnail_url(&self.video_id)
    }

    /// Iframe URL while the player is mounted
    pub fn iframe_src(&self) -> Option<String> {
        match self.phase {
            PlayerPhase::Thumbnail => None,
            PlayerPhase::Loading | PlayerPhase::Active => {
                Some(youtube::embed_url(&self.video_id, self.start_time))
            }
        }
    }
}
