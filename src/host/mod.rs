//! Host module - runtime plumbing around the core
//!
//! - HTTP client for the ranked API
//! - Configuration loading
//! - Logging setup
//! - Thread-backed timers
//! - Runtime wiring a streaming host to the session

pub mod config;
pub mod http;
pub mod logging;
pub mod runtime;
pub mod ticker;

pub use config::Config;
pub use http::HttpJsonClient;
pub use runtime::{OverlayRuntime, RuntimeError};
pub use ticker::ThreadTicker;
