use crate::domain::entities::{IncomingNotification, Notification, NotificationId};
use crate::domain::errors::ApiResult;
use crate::domain::events::NotificationUpdated;
use crate::domain::ports::{Clock, EventBus, NotificationApi, SessionProvider};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Maximum number of entries in the recent view
pub const RECENT_LIMIT: usize = 10;

/// Result of a full load from the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    /// The fetch failed and the local list was cleared
    Failed,
}

/// How a single optimistic read-marking settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Confirmed,
    /// The server rejected the change and the store was reloaded
    Resynced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Loaded(LoadOutcome),
    NoSession,
    AlreadyActive,
}

/// Per-notification outcomes of a mark-all batch
#[derive(Debug, Default)]
pub struct BatchReport {
    pub results: Vec<(NotificationId, ApiResult<()>)>,
    pub resynced: bool,
}

impl BatchReport {
    pub fn attempted(&self) -> usize {
        self.results.len()
    }

    pub fn failed(&self) -> Vec<&NotificationId> {
        self.results
            .iter()
            .filter(|(_, result)| result.is_err())
            .map(|(id, _)| id)
            .collect()
    }

    pub fn all_confirmed(&self) -> bool {
        self.results.iter().all(|(_, result)| result.is_ok())
    }
}

/// Consistent view of the store taken under a single lock
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    pub notifications: Vec<Notification>,
    pub recent: Vec<Notification>,
    pub unread_count: usize,
    pub is_loading: bool,
}

#[derive(Debug, Default)]
struct StoreState {
    notifications: Vec<Notification>,
    loads_in_flight: usize,
}

impl StoreState {
    fn contains(&self, id: &NotificationId) -> bool {
        self.notifications.iter().any(|n| &n.id == id)
    }

    fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    fn recent(&self) -> Vec<Notification> {
        let mut sorted: Vec<&Notification> = self.notifications.iter().collect();
        sorted.sort_by(|a, b| a.cmp_newest_first(b));
        sorted.into_iter().take(RECENT_LIMIT).cloned().collect()
    }
}

fn lock_state(state: &Mutex<StoreState>) -> MutexGuard<'_, StoreState> {
    // Every critical section leaves the state consistent, so poisoning is ignored.
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Keeps the loading flag raised for as long as it lives, so the flag drops
/// even when a load future is abandoned mid-flight.
struct LoadingGuard<'a> {
    state: &'a Mutex<StoreState>,
}

impl<'a> LoadingGuard<'a> {
    fn begin(state: &'a Mutex<StoreState>) -> Self {
        lock_state(state).loads_in_flight += 1;
        Self { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut state = lock_state(self.state);
        state.loads_in_flight = state.loads_in_flight.saturating_sub(1);
    }
}

struct StoreInner {
    api: Arc<dyn NotificationApi>,
    event_bus: Arc<dyn EventBus>,
    session: Arc<dyn SessionProvider>,
    clock: Arc<dyn Clock>,
    state: Mutex<StoreState>,
    activated: AtomicBool,
}

/// In-memory notification list kept in step with the server.
///
/// Local mutations apply immediately; remote confirmation runs afterwards and
/// any rejection is repaired by reloading the whole list from the server.
/// Cloning yields another handle to the same store.
#[derive(Clone)]
pub struct NotificationStore {
    inner: Arc<StoreInner>,
}

impl NotificationStore {
    pub fn new(
        api: Arc<dyn NotificationApi>,
        event_bus: Arc<dyn EventBus>,
        session: Arc<dyn SessionProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                api,
                event_bus,
                session,
                clock,
                state: Mutex::new(StoreState::default()),
                activated: AtomicBool::new(false),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        lock_state(&self.inner.state)
    }

    /// Load once on first activation, provided the session is authenticated
    pub async fn activate(&self) -> Activation {
        if self.inner.activated.swap(true, Ordering::SeqCst) {
            return Activation::AlreadyActive;
        }

        if !self.inner.session.is_authenticated() {
            tracing::debug!("No authenticated session, skipping initial notification load");
            return Activation::NoSession;
        }

        Activation::Loaded(self.load().await)
    }

    /// Replace the local list with the server's.
    ///
    /// On failure the list is emptied rather than left stale.
    pub async fn load(&self) -> LoadOutcome {
        let _loading = LoadingGuard::begin(&self.inner.state);

        match self.inner.api.fetch_all().await {
            Ok(records) => {
                let notifications =
                    normalize_batch(records.unwrap_or_default(), self.inner.clock.now());
                let count = notifications.len();
                self.lock().notifications = notifications;
                tracing::debug!("Loaded {} notifications", count);
                LoadOutcome::Loaded(count)
            }
            Err(e) => {
                tracing::error!("Failed to load notifications: {}", e);
                self.lock().notifications.clear();
                LoadOutcome::Failed
            }
        }
    }

    /// Prepend an incoming notification. Returns `false` when its id is
    /// already present, in which case nothing changes.
    pub fn add_notification(&self, incoming: IncomingNotification) -> bool {
        let mut state = self.lock();

        if let Some(id) = &incoming.id {
            if state.contains(id) {
                tracing::debug!("Ignoring duplicate notification {}", id);
                return false;
            }
        }

        let notification = incoming.normalize(self.inner.clock.now());
        state.notifications.insert(0, notification);
        true
    }

    /// Local-only removal
    pub fn remove_notification(&self, id: &NotificationId) -> bool {
        let mut state = self.lock();
        let before = state.notifications.len();
        state.notifications.retain(|n| &n.id != id);
        state.notifications.len() != before
    }

    /// Flip the read flag now and return the server confirmation as a future.
    ///
    /// The local change is visible before this method returns, whether or not
    /// the returned future is ever polled.
    pub fn mark_as_read(
        &self,
        id: &NotificationId,
    ) -> impl Future<Output = SyncOutcome> + Send + 'static {
        {
            let mut state = self.lock();
            for notification in state.notifications.iter_mut().filter(|n| &n.id == id) {
                notification.read = true;
            }
        }

        let store = self.clone();
        let id = id.clone();
        async move { store.confirm_read(id).await }
    }

    async fn confirm_read(&self, id: NotificationId) -> SyncOutcome {
        match self.inner.api.mark_read(&id).await {
            Ok(()) => {
                let event = NotificationUpdated::MarkAsRead {
                    notification_id: id,
                };
                if let Err(e) = self.inner.event_bus.publish(event) {
                    tracing::warn!("Failed to publish {}: {}", NotificationUpdated::NAME, e);
                }
                SyncOutcome::Confirmed
            }
            Err(e) => {
                tracing::error!("Failed to mark notification {} as read: {}", id, e);
                self.load().await;
                SyncOutcome::Resynced
            }
        }
    }

    /// Flip every unread entry now, then confirm each one with the server
    /// concurrently. Any rejection triggers a single full reload.
    pub fn mark_all_as_read(&self) -> impl Future<Output = BatchReport> + Send + 'static {
        let unread: Vec<NotificationId> = {
            let mut state = self.lock();
            state
                .notifications
                .iter_mut()
                .filter(|n| !n.read)
                .map(|n| {
                    n.read = true;
                    n.id.clone()
                })
                .collect()
        };

        let store = self.clone();
        async move { store.confirm_batch(unread).await }
    }

    async fn confirm_batch(&self, ids: Vec<NotificationId>) -> BatchReport {
        if ids.is_empty() {
            return BatchReport::default();
        }

        let api = &self.inner.api;
        let results = join_all(ids.into_iter().map(|id| async move {
            let result = api.mark_read(&id).await;
            (id, result)
        }))
        .await;

        let mut report = BatchReport {
            results,
            resynced: false,
        };

        let failed = report.failed().len();
        if failed > 0 {
            for (id, result) in &report.results {
                if let Err(e) = result {
                    tracing::debug!("Mark-read rejected for {}: {}", id, e);
                }
            }
            tracing::error!(
                "Failed to mark {} of {} notifications as read, reloading",
                failed,
                report.attempted()
            );
            self.load().await;
            report.resynced = true;
        }

        report
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().notifications.clone()
    }

    pub fn get(&self, id: &NotificationId) -> Option<Notification> {
        self.lock().notifications.iter().find(|n| &n.id == id).cloned()
    }

    pub fn unread_count(&self) -> usize {
        self.lock().unread_count()
    }

    /// Newest first by creation time, at most [`RECENT_LIMIT`] entries
    pub fn recent_notifications(&self) -> Vec<Notification> {
        self.lock().recent()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loads_in_flight > 0
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.lock();
        StoreSnapshot {
            notifications: state.notifications.clone(),
            recent: state.recent(),
            unread_count: state.unread_count(),
            is_loading: state.loads_in_flight > 0,
        }
    }
}

fn normalize_batch(records: Vec<IncomingNotification>, now: DateTime<Utc>) -> Vec<Notification> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut notifications = Vec::with_capacity(records.len());

    for record in records {
        let notification = record.normalize(now);
        if !seen.insert(notification.id.clone()) {
            tracing::warn!(
                "Dropping repeated notification {} from server response",
                notification.id
            );
            continue;
        }
        notifications.push(notification);
    }

    notifications
}
