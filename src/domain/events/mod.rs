use crate::domain::entities::NotificationId;
use serde::{Deserialize, Serialize};

/// Events broadcast to other parts of the application when notification
/// state changes after server confirmation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NotificationUpdated {
    MarkAsRead {
        #[serde(rename = "notificationId")]
        notification_id: NotificationId,
    },
}

impl NotificationUpdated {
    /// Name observers subscribe under
    pub const NAME: &'static str = "notificationUpdated";

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    pub fn notification_id(&self) -> &NotificationId {
        match self {
            NotificationUpdated::MarkAsRead { notification_id } => notification_id,
        }
    }
}
