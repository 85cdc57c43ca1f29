//! Per-request routing decisions.
//!
//! # Responsibilities
//! - Resolve the upstream target once, at construction
//! - Decide per request: proxy upstream or pass to the next handler
//! - Lazily build and cache the proxy transport, exactly once

use tokio::sync::OnceCell;

use crate::config::Ui5Config;
use crate::proxy::{ProxyError, ProxyTransport, UpstreamTarget};
use crate::resources::ResourceReader;
use crate::version::{resolve_version, ManifestStore};

/// Path under which this tool serves its own injected assets. Always
/// excluded from proxying so the remote framework's identically-prefixed
/// resources cannot shadow them.
pub const ANTARES_RESOURCES_PREFIX: &str = "/resources/ui5/antares/pro";

/// Routing decision for one request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Forward to the upstream host.
    Proxy,
    /// Let the next handler in the chain serve the request.
    PassThrough,
}

/// Immutable routing state plus the cached transport.
///
/// Each instance owns its own state; constructing several dispatchers (as
/// tests do) never shares caches between them.
pub struct Dispatcher {
    route_paths: Vec<String>,
    target: UpstreamTarget,
    transport: OnceCell<ProxyTransport>,
}

impl Dispatcher {
    /// Resolve the upstream target and freeze the routing state.
    ///
    /// Runs the one-time manifest lookup; any failure here must abort
    /// server startup rather than install a misconfigured proxy.
    pub async fn new<R: ResourceReader>(config: &Ui5Config, reader: R) -> Result<Self, ProxyError> {
        let manifests = ManifestStore::new(reader);
        let resolved = resolve_version(config, &manifests).await?;
        let target = UpstreamTarget::new(&config.upstream_url, resolved.version.as_deref())?;

        tracing::info!(upstream = %target, "UI5 proxy target resolved");

        Ok(Self {
            route_paths: config.route_paths.to_vec(),
            target,
            transport: OnceCell::new(),
        })
    }

    /// Decide how a request path is handled. The reserved prefix is checked
    /// first and always wins over the configured route prefixes.
    pub fn decide(&self, path: &str) -> RouteDecision {
        if path.starts_with(ANTARES_RESOURCES_PREFIX) {
            return RouteDecision::PassThrough;
        }

        if self
            .route_paths
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
        {
            RouteDecision::Proxy
        } else {
            RouteDecision::PassThrough
        }
    }

    /// The transport bound to this dispatcher's target, built on first use.
    ///
    /// The OnceCell guarantees at-most-once construction even when the
    /// first matching requests arrive concurrently.
    pub async fn transport(&self) -> Result<&ProxyTransport, ProxyError> {
        self.transport
            .get_or_try_init(|| async { ProxyTransport::new(self.target.clone()) })
            .await
    }

    pub fn target(&self) -> &UpstreamTarget {
        &self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{Resource, ResourceError};

    /// Reader with a fixed set of resources.
    struct FixedReader(Vec<Resource>);

    impl ResourceReader for FixedReader {
        async fn by_glob(&self, _pattern: &str) -> Result<Vec<Resource>, ResourceError> {
            Ok(self.0.clone())
        }
    }

    fn empty_reader() -> FixedReader {
        FixedReader(vec![])
    }

    fn manifest_reader(version: &str) -> FixedReader {
        FixedReader(vec![Resource::new(
            "webapp/manifest.json",
            format!(
                r#"{{ "sap.ui5": {{ "dependencies": {{ "minUI5Version": "{version}" }} }} }}"#
            ),
        )])
    }

    async fn dispatcher(config: Ui5Config) -> Dispatcher {
        Dispatcher::new(&config, empty_reader()).await.unwrap()
    }

    #[tokio::test]
    async fn test_default_prefixes_proxied() {
        let d = dispatcher(Ui5Config::default()).await;

        assert_eq!(d.decide("/resources/sap-ui-core.js"), RouteDecision::Proxy);
        assert_eq!(
            d.decide("/test-resources/sap/m/qunit.js"),
            RouteDecision::Proxy
        );
        assert_eq!(d.decide("/app/index.html"), RouteDecision::PassThrough);
        assert_eq!(d.decide("/"), RouteDecision::PassThrough);
    }

    #[tokio::test]
    async fn test_reserved_prefix_never_proxied() {
        let d = dispatcher(Ui5Config::default()).await;

        // /resources would match, but the reserved prefix wins.
        assert_eq!(
            d.decide("/resources/ui5/antares/pro/Bundle.js"),
            RouteDecision::PassThrough
        );
        assert_eq!(
            d.decide(ANTARES_RESOURCES_PREFIX),
            RouteDecision::PassThrough
        );
        // Sibling framework paths still proxy.
        assert_eq!(
            d.decide("/resources/ui5/antares/other.js"),
            RouteDecision::Proxy
        );
    }

    #[tokio::test]
    async fn test_custom_route_paths() {
        let config = Ui5Config {
            route_paths: crate::config::RoutePaths::One("/ui5".into()),
            ..Ui5Config::default()
        };
        let d = dispatcher(config).await;

        assert_eq!(d.decide("/ui5/core.js"), RouteDecision::Proxy);
        assert_eq!(d.decide("/resources/core.js"), RouteDecision::PassThrough);
    }

    #[tokio::test]
    async fn test_target_uses_explicit_version_over_manifest() {
        let config = Ui5Config {
            version: Some("1.96.0".into()),
            ..Ui5Config::default()
        };
        let d = Dispatcher::new(&config, manifest_reader("1.90.0"))
            .await
            .unwrap();

        assert!(d.target().as_str().ends_with("/1.96.0"));
    }

    #[tokio::test]
    async fn test_target_uses_manifest_version() {
        let d = Dispatcher::new(&Ui5Config::default(), manifest_reader("1.90.0"))
            .await
            .unwrap();

        assert!(d.target().as_str().ends_with("/1.90.0"));
    }

    #[tokio::test]
    async fn test_target_without_version_is_bare_origin() {
        let d = dispatcher(Ui5Config::default()).await;
        assert_eq!(d.target().as_str(), "https://ui5.sap.com");
    }

    #[tokio::test]
    async fn test_transport_built_once_and_reused() {
        let d = dispatcher(Ui5Config::default()).await;

        let first = d.transport().await.unwrap() as *const ProxyTransport;
        let second = d.transport().await.unwrap() as *const ProxyTransport;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_malformed_manifest_aborts_construction() {
        let reader = FixedReader(vec![Resource::new("webapp/manifest.json", "{ nope")]);
        let result = Dispatcher::new(&Ui5Config::default(), reader).await;

        assert!(matches!(result, Err(ProxyError::Version(_))));
    }

    #[tokio::test]
    async fn test_reader_failure_aborts_construction() {
        struct FailingReader;

        impl ResourceReader for FailingReader {
            async fn by_glob(&self, _pattern: &str) -> Result<Vec<Resource>, ResourceError> {
                Err(ResourceError::Io {
                    path: "webapp".into(),
                    source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
                })
            }
        }

        let result = Dispatcher::new(&Ui5Config::default(), FailingReader).await;
        assert!(matches!(
            result,
            Err(ProxyError::Version(
                crate::version::VersionError::ResourceReader(_)
            ))
        ));
    }
}
