pub mod clock;
pub mod event_bus;
pub mod notification_api;
pub mod session_provider;

pub use clock::Clock;
pub use event_bus::{EventBus, EventStream};
pub use notification_api::NotificationApi;
pub use session_provider::SessionProvider;
