//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware layers)
//!     → proxy middleware (dispatcher decides)
//!     → proxied upstream response, or
//!     → static file service (project root)
//! ```

pub mod server;

pub use server::{app, proxy_middleware, HttpServer};
