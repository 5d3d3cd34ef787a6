use super::{FixedClock, MockNotificationApi, RecordingEventBus};
use chrono::{DateTime, TimeZone, Utc};
use notisync::infrastructure::session::StaticSession;
use notisync::{IncomingNotification, NotificationId, NotificationStore};
use serde_json::Value;
use std::sync::Arc;

pub struct TestStore {
    pub store: NotificationStore,
    pub api: Arc<MockNotificationApi>,
    pub events: Arc<RecordingEventBus>,
}

/// Instant every test store reports as "now"
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
}

pub const FIXED_NOW_ISO: &str = "2024-06-01T09:00:00.000Z";

pub fn build_store(api: MockNotificationApi) -> TestStore {
    build_store_with_session(api, StaticSession::authenticated("test-token"))
}

pub fn build_store_with_session(api: MockNotificationApi, session: StaticSession) -> TestStore {
    let api = Arc::new(api);
    let events = Arc::new(RecordingEventBus::new());
    let store = NotificationStore::new(
        api.clone(),
        events.clone(),
        Arc::new(session),
        Arc::new(FixedClock(fixed_now())),
    );

    TestStore { store, api, events }
}

pub fn nid(n: i64) -> NotificationId {
    NotificationId::Number(n)
}

pub fn incoming(value: Value) -> IncomingNotification {
    IncomingNotification::from_json(value).unwrap()
}

pub fn ids(notifications: &[notisync::Notification]) -> Vec<NotificationId> {
    notifications.iter().map(|n| n.id.clone()).collect()
}
