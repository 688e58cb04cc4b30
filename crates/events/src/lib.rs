//! Studio job event bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`JobEvent`]: the envelope published whenever a job is created,
//!   reaches a terminal state, or is deleted.

pub mod bus;

pub use bus::{EventBus, JobEvent};
