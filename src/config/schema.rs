//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the development proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// UI5 proxy settings (route prefixes, upstream host, version pin).
    pub ui5: Ui5Config,

    /// Static file serving settings.
    pub serve: ServeConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// UI5 proxy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Ui5Config {
    /// Path prefixes whose requests are forwarded upstream.
    pub route_paths: RoutePaths,

    /// Base origin of the UI5 content delivery host.
    pub upstream_url: String,

    /// Explicit UI5 version. Overrides the version declared in the
    /// project's manifest.json.
    pub version: Option<String>,
}

impl Default for Ui5Config {
    fn default() -> Self {
        Self {
            route_paths: RoutePaths::default(),
            upstream_url: "https://ui5.sap.com".to_string(),
            version: None,
        }
    }
}

/// One or more route path prefixes.
///
/// Accepts either a single string or an ordered list in the config file:
/// `route_paths = "/resources"` or `route_paths = ["/resources", "/test-resources"]`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RoutePaths {
    One(String),
    Many(Vec<String>),
}

impl RoutePaths {
    /// Iterate over the configured prefixes in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            RoutePaths::One(path) => std::slice::from_ref(path),
            RoutePaths::Many(paths) => paths,
        };
        slice.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(str::to_string).collect()
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RoutePaths::One(_) => false,
            RoutePaths::Many(paths) => paths.is_empty(),
        }
    }
}

impl Default for RoutePaths {
    fn default() -> Self {
        RoutePaths::Many(vec![
            "/resources".to_string(),
            "/test-resources".to_string(),
        ])
    }
}

/// Static file serving configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Project root served for non-proxied requests. Also the root the
    /// manifest.json lookup globs under.
    pub root: PathBuf,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("webapp"),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProxyConfig::default();
        assert_eq!(config.listener.bind_address, "127.0.0.1:8080");
        assert_eq!(config.ui5.upstream_url, "https://ui5.sap.com");
        assert_eq!(
            config.ui5.route_paths.to_vec(),
            vec!["/resources", "/test-resources"]
        );
        assert!(config.ui5.version.is_none());
        assert_eq!(config.serve.root, PathBuf::from("webapp"));
    }

    #[test]
    fn test_route_paths_single_string() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [ui5]
            route_paths = "/resources"
            "#,
        )
        .unwrap();
        assert_eq!(config.ui5.route_paths, RoutePaths::One("/resources".into()));
        assert_eq!(config.ui5.route_paths.to_vec(), vec!["/resources"]);
    }

    #[test]
    fn test_route_paths_list() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [ui5]
            route_paths = ["/resources", "/test-resources", "/ext"]
            version = "1.120.1"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.ui5.route_paths.to_vec(),
            vec!["/resources", "/test-resources", "/ext"]
        );
        assert_eq!(config.ui5.version.as_deref(), Some("1.120.1"));
    }

    #[test]
    fn test_empty_config_parses() {
        let config: ProxyConfig = toml::from_str("").unwrap();
        assert_eq!(config.timeouts.request_secs, 30);
    }
}
