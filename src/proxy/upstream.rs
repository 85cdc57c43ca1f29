//! Upstream target construction.

use url::Url;

use crate::proxy::ProxyError;

/// The remote origin matched requests are forwarded to, with the version
/// path segment already applied. Computed once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    base: String,
}

impl UpstreamTarget {
    /// Build the target from the configured origin and the resolved version.
    pub fn new(upstream_url: &str, version: Option<&str>) -> Result<Self, ProxyError> {
        let parsed = Url::parse(upstream_url).map_err(|e| ProxyError::InvalidUpstreamUrl {
            url: upstream_url.to_string(),
            reason: e.to_string(),
        })?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ProxyError::InvalidUpstreamUrl {
                url: upstream_url.to_string(),
                reason: format!("unsupported scheme {:?}", parsed.scheme()),
            });
        }

        let mut base = upstream_url.trim_end_matches('/').to_string();
        if let Some(version) = version {
            base.push('/');
            base.push_str(version);
        }

        Ok(Self { base })
    }

    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// Absolute upstream URL for a request's path and query.
    pub fn url_for(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base, path_and_query)
    }
}

impl std::fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.base)
    }
}
