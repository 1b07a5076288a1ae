//! Compose media preview
//!
//! Keeps the list of media references previewed under a draft in sync with
//! its text. Typing is debounced, pastes reclassify at once, and URLs the
//! user dismissed stay hidden until they leave the text.

use crate::settings::EmbedConfig;
use media_detect::{classify_text_excluding, extract_urls, MediaReference};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// How a text edit was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputKind {
    /// Several characters arrived at once
    Paste,
    /// Single keystroke or deletion
    Typing,
}

/// Classify an edit by how many characters it added
pub fn classify_change(previous: &str, current: &str) -> InputKind {
    let added = current.chars().count() as i64 - previous.chars().count() as i64;
    if added > 1 {
        InputKind::Paste
    } else {
        InputKind::Typing
    }
}

/// Media previewed for a draft, minus dismissed URLs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposePreviewSet {
    items: Vec<MediaReference>,
    dismissed: HashSet<String>,
}

impl ComposePreviewSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Previewed references in text order
    pub fn items(&self) -> &[MediaReference] {
        &self.items
    }

    /// Whether a URL is currently dismissed
    pub fn is_dismissed(&self, url: &str) -> bool {
        self.dismissed.contains(url)
    }

    /// Rebuild the previews from the draft text
    ///
    /// Dismissals for URLs no longer in the text are forgotten, so a URL
    /// that is removed and typed again comes back.
    pub fn reclassify(&mut self, text: &str) -> &[MediaReference] {
        let present: HashSet<String> =
            extract_urls(text).into_iter().map(|link| link.href).collect();
        self.dismissed.retain(|url| present.contains(url));

        self.items = classify_text_excluding(text, &self.dismissed);
        tracing::trace!(
            "Compose preview has {} items ({} dismissed)",
            self.items.len(),
            self.dismissed.len()
        );
        &self.items
    }

    /// Hide a URL's preview
    ///
    /// Returns whether a visible item was removed.
    pub fn dismiss(&mut self, url: &str) -> bool {
        self.dismissed.insert(url.to_string());
        let before = self.items.len();
        self.items.retain(|item| item.url() != url);
        self.items.len() != before
    }
}

struct Shared {
    set: Mutex<ComposePreviewSet>,
    items_tx: watch::Sender<Vec<MediaReference>>,
}

impl Shared {
    fn reclassify(&self, text: &str) {
        let items = self.set.lock().reclassify(text).to_vec();
        self.items_tx.send_replace(items);
    }
}

/// Debounced preview pipeline for a compose box
///
/// Dropping the pipeline cancels any pending reclassification.
pub struct ComposePipeline {
    shared: Arc<Shared>,
    previous_text: String,
    debounce: Duration,
    timer: Option<JoinHandle<()>>,
}

impl ComposePipeline {
    /// Create a pipeline for an empty draft
    pub fn new(config: &EmbedConfig) -> Self {
        let (items_tx, _) = watch::channel(Vec::new());
        Self {
            shared: Arc::new(Shared { set: Mutex::new(ComposePreviewSet::new()), items_tx }),
            previous_text: String::new(),
            debounce: config.debounce_delay,
            timer: None,
        }
    }

    /// Report the draft's new text
    ///
    /// Pastes reclassify immediately; anything else (re)starts the debounce
    /// timer. Must be called from within a tokio runtime.
    pub fn text_changed(&mut self, text: impl Into<String>) -> InputKind {
        let text = text.into();
        let kind = classify_change(&self.previous_text, &text);
        self.cancel_timer();

        match kind {
            InputKind::Paste => self.shared.reclassify(&text),
            InputKind::Typing => {
                let shared = Arc::clone(&self.shared);
                let delay = self.debounce;
                let pending = text.clone();
                self.timer = Some(tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    shared.reclassify(&pending);
                }));
            }
        }

        self.previous_text = text;
        kind
    }

    /// Reclassify the current text now, skipping any pending debounce
    pub fn flush(&mut self) {
        self.cancel_timer();
        self.shared.reclassify(&self.previous_text);
    }

    /// Hide a URL's preview
    pub fn dismiss(&self, url: &str) {
        let items = {
            let mut set = self.shared.set.lock();
            set.dismiss(url);
            set.items().to_vec()
        };
        self.shared.items_tx.send_replace(items);
    }

    /// Current previews
    pub fn items(&self) -> Vec<MediaReference> {
        self.shared.items_tx.borrow().clone()
    }

    /// Subscribe to preview changes
    pub fn subscribe(&self) -> watch::Receiver<Vec<MediaReference>> {
        self.shared.items_tx.subscribe()
    }

    /// Whether a debounced reclassification is pending
    pub fn is_pending(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for ComposePipeline {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
