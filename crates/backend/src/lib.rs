//! Backend crate for the CineSense demo.
//!
//! Wraps a catalog store in an async service with simulated latency, the
//! way the front end expects its data API to behave.

pub mod config;
pub mod error;
pub mod service;

pub use config::BackendConfig;
pub use error::{BackendError, Result};
pub use service::{AdminStats, Backend, Dashboard, SignupRequest};
