//! HTTP adapters for the third-party generation vendors.
//!
//! One client per provider translates normalized requests into the vendor's
//! REST calls and normalizes responses and errors into the shapes the
//! orchestrators consume. Adapters never retry; retry and polling live in
//! `studio_core::poller` and the pipeline crate.

pub mod chanjing;
pub mod config;
pub mod hedra;
pub mod http;
pub mod omnihuman;
pub mod sentinel;
pub mod stable_avatar;
pub mod topview;
pub mod voice_clone;

pub use config::{VendorClients, VendorEndpoints};
pub use http::VendorApiError;
