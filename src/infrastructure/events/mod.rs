pub mod local_event_bus;

pub use local_event_bus::LocalEventBus;
