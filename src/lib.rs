pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::services::{
    Activation, BatchReport, LoadOutcome, NotificationStore, StoreSnapshot, SyncOutcome,
    RECENT_LIMIT,
};
pub use config::{Config, ConfigError};
pub use domain::entities::{IncomingNotification, Notification, NotificationId};
pub use domain::errors::{ApiError, ApiResult};
pub use domain::events::NotificationUpdated;
