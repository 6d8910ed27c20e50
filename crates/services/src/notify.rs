//! Bundled `EventNotifier` implementations.

use domains::{EventNotifier, ForumEvent};
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Writes every event to the tracing pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl EventNotifier for LogNotifier {
    fn notify(&self, event: &ForumEvent) {
        match event.to_json() {
            Ok(payload) => info!(event = event.name(), payload = %payload, "forum event"),
            Err(e) => warn!(event = event.name(), error = %e, "forum event without payload"),
        }
    }
}

/// Fans events out to any number of in-process subscribers, e.g. a
/// websocket relay task per connected client.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<ForumEvent>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ForumEvent> {
        self.sender.subscribe()
    }
}

impl EventNotifier for BroadcastNotifier {
    fn notify(&self, event: &ForumEvent) {
        // no subscribers is not an error
        let _ = self.sender.send(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::UserId;

    #[tokio::test]
    async fn broadcast_reaches_every_subscriber() {
        let notifier = BroadcastNotifier::new(16);
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();
        let event = ForumEvent::UserRegistered {
            user_id: UserId::new(),
            username: "tank".into(),
        };

        notifier.notify(&event);

        assert_eq!(first.recv().await.unwrap(), event);
        assert_eq!(second.recv().await.unwrap(), event);
    }

    #[test]
    fn broadcast_without_subscribers_is_silent() {
        let notifier = BroadcastNotifier::new(1);
        notifier.notify(&ForumEvent::UserRegistered {
            user_id: UserId::new(),
            username: "dozer".into(),
        });
    }
}
