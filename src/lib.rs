//! Development-time reverse proxy for SAP UI5 resources.
//!
//! Serves a local UI5 application while transparently forwarding framework
//! resource requests (`/resources`, `/test-resources`) to a remote UI5
//! content delivery host, pinned to the version the project declares.

pub mod config;
pub mod http;
pub mod proxy;
pub mod resources;
pub mod version;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use proxy::Dispatcher;
