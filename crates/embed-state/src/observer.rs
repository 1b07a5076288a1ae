//! Resize and visibility observation
//!
//! A host reports element measurements through an [`Observer`]; embed
//! drivers hold a [`Subscription`] and wake on each change. Dropping the
//! subscription unsubscribes.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Container size change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeEvent {
    /// New content width in pixels
    pub width: u32,
}

/// Viewport intersection change
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityEvent {
    /// Fraction of the element inside the viewport, `0.0..=1.0`
    pub ratio: f64,
}

impl VisibilityEvent {
    /// Whether the visible fraction meets `threshold`
    pub fn meets(&self, threshold: f64) -> bool {
        self.ratio >= threshold
    }
}

/// Source of observation events
#[derive(Debug)]
pub struct Observer<E> {
    tx: watch::Sender<Option<E>>,
}

impl<E: Clone> Observer<E> {
    /// Create an observer with no events yet
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    /// Publish an event to every subscription
    pub fn notify(&self, event: E) {
        self.tx.send_replace(Some(event));
    }

    /// Subscribe to events
    ///
    /// The latest event, if any, is delivered first.
    pub fn subscribe(&self) -> Subscription<E> {
        let mut rx = self.tx.subscribe();
        if rx.borrow().is_some() {
            rx.mark_changed();
        }
        Subscription { rx }
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<E: Clone> Default for Observer<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Live subscription to an [`Observer`]
#[derive(Debug)]
pub struct Subscription<E> {
    rx: watch::Receiver<Option<E>>,
}

impl<E: Clone> Subscription<E> {
    /// Wait for the next event
    ///
    /// Returns `None` once the observer is gone. Events published faster
    /// than they are read collapse to the latest.
    pub async fn next(&mut self) -> Option<E> {
        loop {
            self.rx.changed().await.ok()?;
            if let Some(event) = self.rx.borrow_and_update().clone() {
                return Some(event);
            }
        }
    }

    /// Most recent event, without waiting
    pub fn latest(&self) -> Option<E> {
        self.rx.borrow().clone()
    }
}

/// Observer of container widths
pub type ResizeObserver = Observer<ResizeEvent>;

/// Observer of viewport visibility
pub type VisibilityObserver = Observer<VisibilityEvent>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscription_receives_events() {
        let observer = ResizeObserver::new();
        let mut subscription = observer.subscribe();

        observer.notify(ResizeEvent { width: 640 });
        assert_eq!(subscription.next().await, Some(ResizeEvent { width: 640 }));
        assert_eq!(subscription.latest(), Some(ResizeEvent { width: 640 }));
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_latest() {
        let observer = ResizeObserver::new();
        observer.notify(ResizeEvent { width: 300 });
        observer.notify(ResizeEvent { width: 500 });

        let mut subscription = observer.subscribe();
        assert_eq!(subscription.next().await, Some(ResizeEvent { width: 500 }));
    }

    #[tokio::test]
    async fn test_observer_dropped_ends_subscription() {
        let observer = VisibilityObserver::new();
        let mut subscription = observer.subscribe();
        drop(observer);
        assert_eq!(subscription.next().await, None);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let observer = VisibilityObserver::new();
        let subscription = observer.subscribe();
        assert_eq!(observer.subscriber_count(), 1);
        drop(subscription);
        assert_eq!(observer.subscriber_count(), 0);
    }

    #[test]
    fn test_visibility_threshold() {
        assert!(VisibilityEvent { ratio: 0.5 }.meets(0.5));
        assert!(!VisibilityEvent { ratio: 0.49 }.meets(0.5));
    }
}
