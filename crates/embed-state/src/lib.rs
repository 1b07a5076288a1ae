//! Embed state management
//!
//! Per-embed lifecycle (placeholder, loading, ready, failed) with bounded
//! cache-busting retries, the async driver that runs dimension probes for
//! it, video playback control driven by visibility, and the debounced
//! compose preview pipeline.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compose;
pub mod controller;
pub mod embed;
pub mod observer;
pub mod playback;
pub mod settings;
pub mod video;

pub use compose::{classify_change, ComposePipeline, ComposePreviewSet, InputKind};
pub use controller::EmbedController;
pub use embed::{
    retry_src, Embed, EmbedError, EmbedPhase, EmbedState, EmbedView, FallbackLink, Frame,
    ProbeRequest, RetryDecision,
};
pub use observer::{
    Observer, ResizeEvent, ResizeObserver, Subscription, VisibilityEvent, VisibilityObserver,
};
pub use playback::{
    format_time, PlaybackCommand, PlaybackController, PlaybackIntent, PlayerPhase, YouTubePlayer,
};
pub use settings::{EmbedConfig, MediaSettings, Surface};
pub use video::VideoDriver;
