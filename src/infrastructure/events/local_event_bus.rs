use crate::domain::errors::ApiResult;
use crate::domain::events::NotificationUpdated;
use crate::domain::ports::{EventBus, EventStream};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Local in-memory implementation of EventBus
#[derive(Clone)]
pub struct LocalEventBus {
    tx: broadcast::Sender<NotificationUpdated>,
}

impl LocalEventBus {
    /// Create a new event bus with specified capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl EventBus for LocalEventBus {
    fn publish(&self, event: NotificationUpdated) -> ApiResult<()> {
        // Nobody listening is not a failure
        if let Err(e) = self.tx.send(event) {
            tracing::debug!("No active subscribers for event: {}", e);
        }
        Ok(())
    }

    fn subscribe(&self) -> EventStream {
        let rx = self.tx.subscribe();
        Box::pin(BroadcastStream::new(rx).map(|item| item.map_err(|e| e.to_string())))
    }
}

impl Default for LocalEventBus {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NotificationId;

    #[test]
    fn test_event_bus_creation() {
        let bus = LocalEventBus::new(100);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_publish_without_subscribers_succeeds() {
        let bus = LocalEventBus::new(4);
        let event = NotificationUpdated::MarkAsRead {
            notification_id: NotificationId::Number(1),
        };
        assert!(bus.publish(event).is_ok());
    }

    #[tokio::test]
    async fn test_event_publish_subscribe() {
        let bus = LocalEventBus::new(100);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        let event = NotificationUpdated::MarkAsRead {
            notification_id: NotificationId::from("n-1"),
        };
        bus.publish(event.clone()).unwrap();

        assert_eq!(first.next().await.unwrap().unwrap(), event);
        assert_eq!(second.next().await.unwrap().unwrap(), event);
    }

    #[tokio::test]
    async fn test_lagging_subscriber_sees_error() {
        let bus = LocalEventBus::new(1);
        let mut rx = bus.subscribe();

        for id in 0..3 {
            bus.publish(NotificationUpdated::MarkAsRead {
                notification_id: NotificationId::Number(id),
            })
            .unwrap();
        }

        assert!(rx.next().await.unwrap().is_err());
        let latest = rx.next().await.unwrap().unwrap();
        assert_eq!(latest.notification_id(), &NotificationId::Number(2));
    }
}
