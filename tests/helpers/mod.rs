#![allow(dead_code, unused_imports)]
pub mod fixed_clock;
pub mod mock_api;
pub mod recording_bus;
pub mod store_helpers;

pub use fixed_clock::*;
pub use mock_api::*;
pub use recording_bus::*;
pub use store_helpers::*;
