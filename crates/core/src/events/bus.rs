use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::WorkspaceEvent;

/// In-process event bus backed by `tokio::broadcast`.
/// Single-node; one bus per running service.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<WorkspaceEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Publish an event to all current subscribers. Sending with no
    /// subscribers is not an error worth surfacing; callers discard the
    /// result.
    pub fn publish(
        &self,
        event: WorkspaceEvent,
    ) -> Result<usize, broadcast::error::SendError<WorkspaceEvent>> {
        self.sender.send(event)
    }

    /// Subscribe to the event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<WorkspaceEvent> {
        self.sender.subscribe()
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::types::DocumentEvent;
    use uuid::Uuid;

    fn created() -> WorkspaceEvent {
        WorkspaceEvent::DocumentCreated(DocumentEvent::now(Uuid::new_v4(), Uuid::new_v4()))
    }

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        let event = created();
        let id = event.document_id();
        bus.publish(event).unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received.document_id(), id);
    }

    #[tokio::test]
    async fn multiple_subscribers_see_every_event() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        assert_eq!(bus.subscriber_count(), 2);

        let event = created();
        let id = event.document_id();
        bus.publish(event).unwrap();

        assert_eq!(rx1.recv().await.unwrap().document_id(), id);
        assert_eq!(rx2.recv().await.unwrap().document_id(), id);
    }
}
