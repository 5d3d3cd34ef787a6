use crate::domain::errors::ApiResult;
use crate::domain::events::NotificationUpdated;
use futures::Stream;
use std::pin::Pin;

pub type EventStream = Pin<Box<dyn Stream<Item = Result<NotificationUpdated, String>> + Send>>;

pub trait EventBus: Send + Sync {
    /// Publish an event to all subscribers
    fn publish(&self, event: NotificationUpdated) -> ApiResult<()>;

    /// Subscribe to events
    /// Returns a stream of events, abstracting away underlying transport errors
    fn subscribe(&self) -> EventStream;
}
