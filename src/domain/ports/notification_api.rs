use crate::domain::entities::{IncomingNotification, NotificationId};
use crate::domain::errors::ApiResult;

/// Remote source of truth for notifications
#[async_trait::async_trait]
pub trait NotificationApi: Send + Sync {
    /// Fetch every notification for the current session.
    /// `None` means the server answered without a list.
    async fn fetch_all(&self) -> ApiResult<Option<Vec<IncomingNotification>>>;

    /// Mark a single notification as read on the server
    async fn mark_read(&self, id: &NotificationId) -> ApiResult<()>;
}
