//! Async video playback driver
//!
//! [`VideoDriver`] connects a [`PlaybackController`] to the embed that owns
//! the video and to a visibility subscription. Playback commands are only
//! emitted while the embed is ready; they arrive on the receiver returned
//! by [`VideoDriver::new`]. The controls overlay hides on its own once its
//! deadline passes.

use crate::controller::EmbedController;
use crate::embed::EmbedView;
use crate::observer::{Subscription, VisibilityEvent};
use crate::playback::{PlaybackCommand, PlaybackController, PlaybackIntent};
use crate::settings::EmbedConfig;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

struct Shared {
    playback: Mutex<PlaybackController>,
    commands_tx: mpsc::UnboundedSender<PlaybackCommand>,
    deadline_tx: watch::Sender<Option<Instant>>,
}

impl Shared {
    /// Enable playback exactly while the embed is ready
    fn sync_enabled(&self, view: &EmbedView) {
        let ready = matches!(view, EmbedView::Ready { .. });
        let command = self.playback.lock().set_enabled(ready);
        self.emit(command);
    }

    fn emit(&self, command: Option<PlaybackCommand>) {
        if let Some(command) = command {
            tracing::trace!("Playback command {:?}", command);
            // Receiver gone means nobody is drawing the video anymore
            let _ = self.commands_tx.send(command);
        }
    }

    /// Hand the current controls deadline to the timer task
    fn sync_deadline(&self) {
        let deadline = self.playback.lock().controls_deadline();
        self.deadline_tx.send_if_modified(|current| {
            if *current == deadline {
                return false;
            }
            *current = deadline;
            true
        });
    }
}

/// Drives playback of one inline video
///
/// Dropping the driver stops its background tasks.
pub struct VideoDriver {
    shared: Arc<Shared>,
    view_rx: watch::Receiver<EmbedView>,
    tasks: Vec<JoinHandle<()>>,
}

impl VideoDriver {
    /// Start driving playback for the video behind `embed`
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        embed: &EmbedController,
        visibility: Subscription<VisibilityEvent>,
        config: &EmbedConfig,
    ) -> (Self, mpsc::UnboundedReceiver<PlaybackCommand>) {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (deadline_tx, deadline_rx) = watch::channel(None);
        let shared = Arc::new(Shared {
            playback: Mutex::new(PlaybackController::new(config)),
            commands_tx,
            deadline_tx,
        });

        let view_rx = embed.watch();
        let tasks = vec![
            tokio::spawn(follow_embed(Arc::clone(&shared), view_rx.clone(), visibility)),
            tokio::spawn(hide_controls(Arc::clone(&shared), deadline_rx)),
        ];

        (Self { shared, view_rx, tasks }, commands_rx)
    }

    /// Run a user action against the playback state
    fn act(
        &self,
        action: impl FnOnce(&mut PlaybackController, Instant) -> Option<PlaybackCommand>,
    ) {
        self.shared.sync_enabled(&self.view_rx.borrow());
        let command = {
            let mut playback = self.shared.playback.lock();
            action(&mut *playback, Instant::now())
        };
        self.shared.emit(command);
        self.shared.sync_deadline();
    }

    /// Play/pause button or a click on the video
    pub fn toggle_play(&self) {
        self.act(PlaybackController::toggle_play);
    }

    /// Mute button
    pub fn toggle_mute(&self) {
        self.act(PlaybackController::toggle_mute);
    }

    /// Seek to a horizontal fraction of the progress bar
    pub fn seek(&self, fraction: f64) {
        self.act(|playback, now| playback.seek(fraction, now));
    }

    /// Pointer entered the video
    pub fn pointer_enter(&self) {
        self.act(|playback, _| {
            playback.pointer_enter();
            None
        });
    }

    /// Pointer moved over the video
    pub fn pointer_move(&self) {
        self.act(|playback, now| {
            playback.pointer_move(now);
            None
        });
    }

    /// Pointer left the video
    pub fn pointer_leave(&self) {
        self.act(|playback, now| {
            playback.pointer_leave(now);
            None
        });
    }

    /// Element started playing
    pub fn played(&self) {
        self.shared.playback.lock().played();
    }

    /// Element paused
    pub fn paused(&self) {
        self.shared.playback.lock().paused();
    }

    /// Element reported a new playback position
    pub fn time_update(&self, current_time: f64) {
        self.shared.playback.lock().time_update(current_time);
    }

    /// Element reported its duration
    pub fn duration_change(&self, duration: f64) {
        self.shared.playback.lock().duration_change(duration);
    }

    /// Current intent
    pub fn intent(&self) -> PlaybackIntent {
        self.shared.playback.lock().intent()
    }

    /// Whether the element is playing
    pub fn is_playing(&self) -> bool {
        self.shared.playback.lock().is_playing()
    }

    /// Progress bar fill, `0.0..=100.0`
    pub fn progress_percent(&self) -> f64 {
        self.shared.playback.lock().progress_percent()
    }

    /// Whether the controls overlay is shown
    pub fn controls_visible(&self) -> bool {
        self.shared.playback.lock().controls_visible()
    }
}

impl Drop for VideoDriver {
    fn drop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

/// Track the embed's phase and the element's visibility
async fn follow_embed(
    shared: Arc<Shared>,
    mut view_rx: watch::Receiver<EmbedView>,
    mut visibility: Subscription<VisibilityEvent>,
) {
    shared.sync_enabled(&view_rx.borrow_and_update());
    loop {
        tokio::select! {
            changed = view_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                shared.sync_enabled(&view_rx.borrow_and_update());
            }
            event = visibility.next() => {
                let Some(event) = event else {
                    break;
                };
                shared.sync_enabled(&view_rx.borrow_and_update());
                let command = shared.playback.lock().on_visibility(event.ratio);
                shared.emit(command);
            }
        }
    }
}

/// Hide the controls overlay when its deadline passes
async fn hide_controls(shared: Arc<Shared>, mut deadline_rx: watch::Receiver<Option<Instant>>) {
    loop {
        let deadline = *deadline_rx.borrow_and_update();
        if let Some(deadline) = deadline {
            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => {
                    if shared.playback.lock().tick(Instant::now()) {
                        tracing::trace!("Video controls hidden");
                    }
                }
                changed = deadline_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
            }
        }
        if deadline_rx.changed().await.is_err() {
            break;
        }
    }
}
