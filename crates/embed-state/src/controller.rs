//! Async embed driver
//!
//! [`EmbedController`] owns one [`Embed`], runs its dimension probes on the
//! tokio runtime, follows container resizes, and publishes the current
//! [`EmbedView`] on a watch channel. Dropping the controller tears the
//! embed down and aborts everything it spawned.

use crate::embed::{Embed, EmbedState, EmbedView, ProbeRequest, RetryDecision};
use crate::observer::{ResizeEvent, Subscription};
use media_layout::{DimensionProber, Dimensions, ProbeTask};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

struct Inner {
    embed: Mutex<Embed>,
    prober: Arc<dyn DimensionProber>,
    probe_timeout: Duration,
    probe: Mutex<Option<JoinHandle<()>>>,
    view_tx: watch::Sender<EmbedView>,
}

impl Inner {
    /// Send the current view
    ///
    /// The embed stays locked until the send, so concurrent publishers
    /// cannot deliver views out of order.
    fn publish(&self) {
        let embed = self.embed.lock();
        let view = embed.view();
        self.view_tx.send_if_modified(|current| {
            if *current == view {
                return false;
            }
            *current = view;
            true
        });
    }

    /// Start the probe the state machine asked for
    fn dispatch(self: &Arc<Self>, request: Option<ProbeRequest>) {
        if let Some(ProbeRequest { generation, url }) = request {
            tracing::trace!("Probing {} (generation {})", url, generation);
            let task = ProbeTask::spawn(Arc::clone(&self.prober), url, self.probe_timeout);
            let inner = Arc::clone(self);

            let handle = tokio::spawn(async move {
                let result = task.result().await;
                inner.embed.lock().apply_probe(generation, result);
                inner.publish();
            });

            if let Some(previous) = self.probe.lock().replace(handle) {
                previous.abort();
            }
        }
        self.publish();
    }
}

/// Drives one embed on the tokio runtime
pub struct EmbedController {
    inner: Arc<Inner>,
    resize_task: Option<JoinHandle<()>>,
}

impl EmbedController {
    /// Start driving an embed
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(embed: Embed, prober: Arc<dyn DimensionProber>, probe_timeout: Duration) -> Self {
        let (view_tx, _) = watch::channel(embed.view());
        let inner = Arc::new(Inner {
            embed: Mutex::new(embed),
            prober,
            probe_timeout,
            probe: Mutex::new(None),
            view_tx,
        });

        let request = inner.embed.lock().start();
        inner.dispatch(request);

        Self { inner, resize_task: None }
    }

    /// Follow container widths from a resize subscription
    ///
    /// Replaces any previous subscription.
    pub fn observe_resize(&mut self, mut subscription: Subscription<ResizeEvent>) {
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            while let Some(event) = subscription.next().await {
                let request = inner.embed.lock().set_container_width(event.width);
                inner.dispatch(request);
            }
        });

        if let Some(previous) = self.resize_task.replace(handle) {
            previous.abort();
        }
    }

    /// Subscribe to view changes
    pub fn watch(&self) -> watch::Receiver<EmbedView> {
        self.inner.view_tx.subscribe()
    }

    /// Current view
    pub fn view(&self) -> EmbedView {
        self.inner.view_tx.borrow().clone()
    }

    /// Current state
    pub fn state(&self) -> EmbedState {
        self.inner.embed.lock().state()
    }

    /// Report a container width directly
    pub fn set_container_width(&self, width: u32) {
        let request = self.inner.embed.lock().set_container_width(width);
        self.inner.dispatch(request);
    }

    /// The user clicked a placeholder
    pub fn reveal(&self) {
        let request = self.inner.embed.lock().reveal();
        self.inner.dispatch(request);
    }

    /// Video metadata arrived
    pub fn metadata_loaded(&self, dimensions: Dimensions) {
        self.inner.embed.lock().apply_metadata(dimensions);
        self.inner.publish();
    }

    /// The media element finished loading
    pub fn media_loaded(&self) {
        self.inner.embed.lock().media_loaded();
        self.inner.publish();
    }

    /// The media element failed to load
    pub fn media_error(&self) -> RetryDecision {
        let decision = self.inner.embed.lock().media_error();
        self.inner.publish();
        decision
    }

    /// Stop all background work
    pub fn teardown(&mut self) {
        self.inner.embed.lock().teardown();
        if let Some(probe) = self.inner.probe.lock().take() {
            probe.abort();
        }
        if let Some(resize) = self.resize_task.take() {
            resize.abort();
        }
    }
}

impl Drop for EmbedController {
    fn drop(&mut self) {
        self.teardown();
    }
}
