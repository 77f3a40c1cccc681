//! Typed publish/subscribe for preference transitions.
//!
//! Delivery is synchronous and at-most-once: handlers run inline during
//! `emit`, channel subscribers get a copy pushed onto their queue. Nothing is
//! retained for subscribers that join later.

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

/// What happened to a title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    AddedToLikes,
    RemovedFromLikes,
    AddedToList,
    RemovedFromList,
    Started,
    Resumed,
    /// A snapshot could not be persisted
    SaveFailed,
}

impl NotificationKind {
    fn message_prefix(&self) -> &'static str {
        match self {
            NotificationKind::AddedToLikes => "Added to Likes",
            NotificationKind::RemovedFromLikes => "Removed from Likes",
            NotificationKind::AddedToList => "Added to My List",
            NotificationKind::RemovedFromList => "Removed from My List",
            NotificationKind::Started => "Started",
            NotificationKind::Resumed => "Resumed",
            NotificationKind::SaveFailed => "Changes may not be saved",
        }
    }
}

impl Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NotificationKind::AddedToLikes => "added-to-likes",
            NotificationKind::RemovedFromLikes => "removed-from-likes",
            NotificationKind::AddedToList => "added-to-list",
            NotificationKind::RemovedFromList => "removed-from-list",
            NotificationKind::Started => "started",
            NotificationKind::Resumed => "resumed",
            NotificationKind::SaveFailed => "save-failed",
        };
        write!(f, "{}", name)
    }
}

/// A human-readable transition event
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    /// Display name of the title involved
    pub title: String,
    /// Toast text, e.g. "Added to Likes: Dark"
    pub message: String,
    pub emitted_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            kind,
            message: format!("{}: {}", kind.message_prefix(), title),
            title,
            emitted_at: Utc::now(),
        }
    }
}

/// Token returned by [`Notifier::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

type Handler = Arc<dyn Fn(&Notification) + Send + Sync>;

enum Sink {
    Handler(Handler),
    Channel(mpsc::UnboundedSender<Notification>),
}

struct Subscriber {
    kind: Option<NotificationKind>,
    sink: Sink,
}

impl Subscriber {
    fn wants(&self, kind: NotificationKind) -> bool {
        self.kind.map_or(true, |k| k == kind)
    }
}

/// Broadcasts notifications to independent subscribers
///
/// Clones share the subscriber table.
#[derive(Clone, Default)]
pub struct Notifier {
    subscribers: Arc<RwLock<Vec<(SubscriptionId, Subscriber)>>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for one kind, or for every kind when `kind` is `None`
    pub fn subscribe<F>(&self, kind: Option<NotificationKind>, handler: F) -> SubscriptionId
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        self.register(kind, Sink::Handler(Arc::new(handler)))
    }

    /// Registers a queue-backed subscriber for async consumers
    ///
    /// The subscription is dropped automatically once the receiver is closed.
    pub fn subscribe_channel(
        &self,
        kind: Option<NotificationKind>,
    ) -> (SubscriptionId, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.register(kind, Sink::Channel(tx));
        (id, rx)
    }

    fn register(&self, kind: Option<NotificationKind>, sink: Sink) -> SubscriptionId {
        let id = SubscriptionId::new();
        match self.subscribers.write() {
            Ok(mut subscribers) => subscribers.push((id, Subscriber { kind, sink })),
            Err(_) => tracing::error!(subscription = %id, "Subscriber table poisoned"),
        }
        id
    }

    /// Removes a subscription; returns whether it was registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let Ok(mut subscribers) = self.subscribers.write() else {
            return false;
        };
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().map(|s| s.len()).unwrap_or(0)
    }

    /// Delivers `notification` to every interested subscriber
    pub fn emit(&self, notification: Notification) {
        tracing::debug!(kind = %notification.kind, title = %notification.title, "Notification");

        // Handlers run outside the lock so they may subscribe or unsubscribe.
        let mut handlers: Vec<Handler> = Vec::new();
        let mut closed: Vec<SubscriptionId> = Vec::new();
        {
            let Ok(subscribers) = self.subscribers.read() else {
                tracing::error!("Subscriber table poisoned, dropping notification");
                return;
            };
            for (id, subscriber) in subscribers.iter() {
                if !subscriber.wants(notification.kind) {
                    continue;
                }
                match &subscriber.sink {
                    Sink::Handler(handler) => handlers.push(Arc::clone(handler)),
                    Sink::Channel(tx) => {
                        if tx.send(notification.clone()).is_err() {
                            closed.push(*id);
                        }
                    }
                }
            }
        }

        for handler in handlers {
            handler(&notification);
        }

        for id in closed {
            self.unsubscribe(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&Notification) + Send + Sync) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |n: &Notification| {
            sink.lock().unwrap().push(n.message.clone())
        })
    }

    #[test]
    fn test_notification_message() {
        let n = Notification::new(NotificationKind::AddedToLikes, "Dark");
        assert_eq!(n.message, "Added to Likes: Dark");
        assert_eq!(n.title, "Dark");

        let n = Notification::new(NotificationKind::RemovedFromList, "Ozark");
        assert_eq!(n.message, "Removed from My List: Ozark");
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(NotificationKind::AddedToList.to_string(), "added-to-list");
        assert_eq!(NotificationKind::Resumed.to_string(), "resumed");
    }

    #[test]
    fn test_subscriber_filtered_by_kind() {
        let notifier = Notifier::new();
        let (seen, handler) = recorder();
        notifier.subscribe(Some(NotificationKind::Started), handler);

        notifier.emit(Notification::new(NotificationKind::AddedToLikes, "Dark"));
        notifier.emit(Notification::new(NotificationKind::Started, "Dark"));

        assert_eq!(*seen.lock().unwrap(), vec!["Started: Dark".to_string()]);
    }

    #[test]
    fn test_wildcard_subscriber_sees_everything() {
        let notifier = Notifier::new();
        let (seen, handler) = recorder();
        notifier.subscribe(None, handler);

        notifier.emit(Notification::new(NotificationKind::AddedToList, "Narcos"));
        notifier.emit(Notification::new(NotificationKind::Resumed, "Narcos"));

        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let notifier = Notifier::new();
        let (seen, handler) = recorder();
        let id = notifier.subscribe(None, handler);

        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        notifier.emit(Notification::new(NotificationKind::Started, "Dark"));

        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn test_handler_may_unsubscribe_itself() {
        let notifier = Notifier::new();
        let slot: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));
        let inner_notifier = notifier.clone();
        let inner_slot = Arc::clone(&slot);
        let id = notifier.subscribe(None, move |_| {
            if let Some(id) = inner_slot.lock().unwrap().take() {
                inner_notifier.unsubscribe(id);
            }
        });
        *slot.lock().unwrap() = Some(id);

        notifier.emit(Notification::new(NotificationKind::Started, "Dark"));
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_channel_subscriber_receives_copy() {
        let notifier = Notifier::new();
        let (_id, mut rx) = notifier.subscribe_channel(Some(NotificationKind::Resumed));

        notifier.emit(Notification::new(NotificationKind::Started, "Dark"));
        notifier.emit(Notification::new(NotificationKind::Resumed, "Dark"));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.kind, NotificationKind::Resumed);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_channel_is_pruned() {
        let notifier = Notifier::new();
        let (_id, rx) = notifier.subscribe_channel(None);
        drop(rx);

        notifier.emit(Notification::new(NotificationKind::Started, "Dark"));
        assert_eq!(notifier.subscriber_count(), 0);
    }
}
