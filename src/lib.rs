//! Media Embeds
//!
//! Classifies media links in free-form text and drives their inline embeds:
//!
//! - [`detect`]: URL kind detection, classification, and text rendering nodes
//! - [`layout`]: aspect-ratio layout and async dimension probing
//! - [`embed`]: embed lifecycle, playback control, and compose previews

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use embed_state as embed;
pub use media_detect as detect;
pub use media_layout as layout;

pub use embed_state::{
    ComposePipeline, Embed, EmbedConfig, EmbedController, EmbedView, MediaSettings, Surface,
    VideoDriver,
};
pub use media_detect::{
    classify_url, render_nodes, MediaKind, MediaReference, RenderNode, RenderOptions,
};
pub use media_layout::{compute_layout, DimensionProber, HttpDimensionProber, Layout};

use std::sync::Arc;

/// Build one embed driver per media node of a rendered message
///
/// Non-embed nodes are skipped. Must be called from within a tokio runtime.
pub fn controllers_for(
    nodes: &[RenderNode],
    settings: &MediaSettings,
    surface: Surface,
    config: &EmbedConfig,
    prober: Arc<dyn DimensionProber>,
) -> Vec<EmbedController> {
    nodes
        .iter()
        .filter_map(RenderNode::reference)
        .filter_map(|reference| Embed::new(reference.clone(), settings, surface, config).ok())
        .map(|embed| EmbedController::new(embed, Arc::clone(&prober), config.probe_timeout))
        .collect()
}
