use async_trait::async_trait;
use notisync::domain::ports::NotificationApi;
use notisync::{ApiError, ApiResult, IncomingNotification, NotificationId};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Scripted stand-in for the notifications server.
/// Holds the server-side records and applies confirmed reads to them.
#[derive(Default)]
pub struct MockNotificationApi {
    server: Mutex<Vec<Value>>,
    fail_fetch: AtomicBool,
    absent_list: AtomicBool,
    rejected_ids: Mutex<HashSet<NotificationId>>,
    fetch_calls: AtomicUsize,
    mark_read_calls: Mutex<Vec<NotificationId>>,
    fetch_gate: Mutex<Option<Arc<Notify>>>,
    mark_read_gate: Mutex<Option<Arc<Notify>>>,
}

impl MockNotificationApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_server(records: Vec<Value>) -> Self {
        let api = Self::default();
        api.set_server(records);
        api
    }

    pub fn set_server(&self, records: Vec<Value>) {
        *self.server.lock().unwrap() = records;
    }

    pub fn server_records(&self) -> Vec<Value> {
        self.server.lock().unwrap().clone()
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    /// Answer the list request without a body
    pub fn respond_absent(&self, absent: bool) {
        self.absent_list.store(absent, Ordering::SeqCst);
    }

    pub fn reject_mark_read(&self, id: NotificationId) {
        self.rejected_ids.lock().unwrap().insert(id);
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn mark_read_calls(&self) -> Vec<NotificationId> {
        self.mark_read_calls.lock().unwrap().clone()
    }

    /// Hold every fetch until the returned handle is notified
    pub fn gate_fetch(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.fetch_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Hold every mark-read until the returned handle is notified
    pub fn gate_mark_read(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.mark_read_gate.lock().unwrap() = Some(gate.clone());
        gate
    }
}

#[async_trait]
impl NotificationApi for MockNotificationApi {
    async fn fetch_all(&self) -> ApiResult<Option<Vec<IncomingNotification>>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.fetch_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(ApiError::Transport("connection refused".to_string()));
        }
        if self.absent_list.load(Ordering::SeqCst) {
            return Ok(None);
        }

        let records = self
            .server_records()
            .into_iter()
            .map(|record| {
                IncomingNotification::from_json(record)
                    .map_err(|e| ApiError::Decode(e.to_string()))
            })
            .collect::<ApiResult<Vec<_>>>()?;
        Ok(Some(records))
    }

    async fn mark_read(&self, id: &NotificationId) -> ApiResult<()> {
        self.mark_read_calls.lock().unwrap().push(id.clone());

        let gate = self.mark_read_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.rejected_ids.lock().unwrap().contains(id) {
            return Err(ApiError::Status {
                status: 500,
                message: format!("could not update {}", id),
            });
        }

        let id_value = serde_json::to_value(id).unwrap();
        for record in self.server.lock().unwrap().iter_mut() {
            if record.get("id") == Some(&id_value) {
                record["read"] = Value::Bool(true);
            }
        }
        Ok(())
    }
}
