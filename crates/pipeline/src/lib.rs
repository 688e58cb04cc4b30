//! Task orchestration: the "submit then wait" sequences per job kind and
//! the background scheduler that resolves fire-and-forget voice clones.
//!
//! Orchestrators talk to vendors through the traits in [`vendor`] so each
//! sequence can be driven by scripted fakes. The real implementations are
//! the `studio-vendors` clients.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod scheduler;
pub mod tracker;
pub mod vendor;

pub use config::PollingConfig;
pub use error::PipelineError;
pub use scheduler::VoiceCloneScheduler;
pub use tracker::JobTracker;
