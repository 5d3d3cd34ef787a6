use notisync::domain::ports::{EventBus, EventStream};
use notisync::{ApiResult, NotificationUpdated};
use std::sync::Mutex;

/// EventBus that keeps every published event for inspection
#[derive(Default)]
pub struct RecordingEventBus {
    published: Mutex<Vec<NotificationUpdated>>,
}

impl RecordingEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<NotificationUpdated> {
        self.published.lock().unwrap().clone()
    }
}

impl EventBus for RecordingEventBus {
    fn publish(&self, event: NotificationUpdated) -> ApiResult<()> {
        self.published.lock().unwrap().push(event);
        Ok(())
    }

    fn subscribe(&self) -> EventStream {
        Box::pin(futures::stream::empty())
    }
}
