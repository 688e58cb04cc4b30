//! Domain building blocks shared by every studio crate.
//!
//! Holds the job model and its status state machine, the localized vendor
//! error payload, the generic task poller and the `JobStore` seam. This crate
//! has no internal dependencies so adapters, orchestrators and the HTTP layer
//! can all build on it.

pub mod error;
pub mod job;
pub mod messages;
pub mod poller;
pub mod store;
pub mod submission;
pub mod types;
pub mod vendor_error;
