pub mod config;
pub mod dwell;
pub mod error;
pub mod light;
pub mod logging;
pub mod phase;
pub mod queue;
