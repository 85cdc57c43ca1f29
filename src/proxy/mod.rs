//! Proxy routing subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Ui5Config + ResourceReader
//!         → version resolution (once)
//!         → UpstreamTarget (origin + optional /<version> segment)
//!         → Dispatcher (immutable decision state)
//!
//! Per request:
//!     request path
//!         → dispatcher.decide (reserved prefix? route prefix?)
//!         → Proxy: lazily-built cached transport forwards upstream
//!         → PassThrough: next handler in the chain
//! ```
//!
//! # Design Decisions
//! - Decision state is frozen at startup; no per-request recomputation
//! - The transport is built on first matching request, exactly once,
//!   guarded by a OnceCell rather than a nullable field
//! - No regex in the hot path (prefix matching only)

pub mod dispatcher;
pub mod transport;
pub mod upstream;

use thiserror::Error;

pub use dispatcher::{Dispatcher, RouteDecision, ANTARES_RESOURCES_PREFIX};
pub use transport::ProxyTransport;
pub use upstream::UpstreamTarget;

use crate::version::VersionError;

/// Error type for proxy initialization.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error(transparent)]
    Version(#[from] VersionError),

    #[error("invalid upstream URL {url:?}: {reason}")]
    InvalidUpstreamUrl { url: String, reason: String },

    #[error("failed to build upstream client: {0}")]
    Transport(#[from] reqwest::Error),
}
