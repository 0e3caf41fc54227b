use futures::Stream;
use serde::Serialize;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// Fired for every mutation of the document collection, regardless of which
/// row or which user caused it. Carries no scope: subscribers re-fetch a
/// full snapshot and apply their own resolved scope to it.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub document_id: String,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    senders: HashMap<u64, mpsc::UnboundedSender<ChangeEvent>>,
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(|e| e.into_inner())
}

/// Publish/subscribe channel over the document collection.
#[derive(Clone, Default)]
pub struct ChangeNotifier {
    registry: Arc<Mutex<Registry>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber. One subscription per active list-view
    /// session; the owning view must release it on teardown (dropping the
    /// handle releases too).
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.senders.insert(id, tx);
        Subscription {
            id,
            rx,
            registry: Arc::clone(&self.registry),
            released: false,
        }
    }

    pub fn publish(&self, kind: ChangeKind, document_id: &str) {
        let event = ChangeEvent {
            kind,
            document_id: document_id.to_string(),
        };
        let registry = lock(&self.registry);
        tracing::debug!(
            kind = ?event.kind,
            document_id = %event.document_id,
            subscribers = registry.senders.len(),
            "Publishing change event"
        );
        for sender in registry.senders.values() {
            let _ = sender.send(event.clone());
        }
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.registry).senders.len()
    }
}

/// Handle for one subscriber. Events arrive through `recv` (or the `Stream`
/// impl, used by the SSE surface). After `release`, nothing is delivered —
/// including events that were already queued when release happened.
pub struct Subscription {
    id: u64,
    rx: mpsc::UnboundedReceiver<ChangeEvent>,
    registry: Arc<Mutex<Registry>>,
    released: bool,
}

impl Subscription {
    /// Next event, or `None` once released.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        if self.released {
            return None;
        }
        self.rx.recv().await
    }

    /// Idempotent: the second and later calls are no-ops.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        lock(&self.registry).senders.remove(&self.id);
        self.rx.close();
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl Stream for Subscription {
    type Item = ChangeEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<ChangeEvent>> {
        let this = self.get_mut();
        if this.released {
            return Poll::Ready(None);
        }
        this.rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let notifier = ChangeNotifier::new();
        let mut subscription = notifier.subscribe();

        notifier.publish(ChangeKind::Created, "doc-1");

        let event = subscription.recv().await.expect("event expected");
        assert_eq!(event.kind, ChangeKind::Created);
        assert_eq!(event.document_id, "doc-1");
    }

    #[tokio::test]
    async fn every_subscriber_sees_every_mutation() {
        let notifier = ChangeNotifier::new();
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();

        notifier.publish(ChangeKind::Deleted, "doc-2");

        assert_eq!(first.recv().await.unwrap().document_id, "doc-2");
        assert_eq!(second.recv().await.unwrap().document_id, "doc-2");
    }

    #[tokio::test]
    async fn release_is_idempotent_and_count_never_underflows() {
        let notifier = ChangeNotifier::new();
        let mut subscription = notifier.subscribe();
        assert_eq!(notifier.subscriber_count(), 1);

        subscription.release();
        subscription.release();
        assert!(subscription.is_released());
        assert_eq!(notifier.subscriber_count(), 0);

        let other = notifier.subscribe();
        assert_eq!(notifier.subscriber_count(), 1);
        drop(other);
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn event_after_release_is_never_delivered() {
        let notifier = ChangeNotifier::new();
        let mut subscription = notifier.subscribe();

        subscription.release();
        notifier.publish(ChangeKind::Created, "doc-3");

        assert!(subscription.recv().await.is_none());
    }

    #[tokio::test]
    async fn queued_event_is_discarded_once_released() {
        let notifier = ChangeNotifier::new();
        let mut subscription = notifier.subscribe();

        // Queued but not yet consumed when the view tears down.
        notifier.publish(ChangeKind::Created, "doc-4");
        subscription.release();

        assert!(subscription.recv().await.is_none());
    }

    #[tokio::test]
    async fn dropping_the_handle_releases_the_subscription() {
        let notifier = ChangeNotifier::new();
        let subscription = notifier.subscribe();
        assert_eq!(notifier.subscriber_count(), 1);

        drop(subscription);
        assert_eq!(notifier.subscriber_count(), 0);
    }
}
