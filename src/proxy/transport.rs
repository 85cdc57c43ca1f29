//! Upstream request forwarding.
//!
//! # Responsibilities
//! - Rebuild the request URI against the upstream target
//! - Rewrite the origin: the upstream Host derives from the target URL,
//!   never from the incoming request
//! - Strip hop-by-hop headers in both directions
//! - Stream the upstream response body back to the client
//!
//! # Design Decisions
//! - Expensive to construct (connection pool); built once and cached
//! - Transport failures surface as 502, not as initialization errors

use axum::{
    body::Body,
    http::{header::HeaderName, HeaderMap, Request, Response, StatusCode},
    response::IntoResponse,
};

use crate::proxy::{ProxyError, UpstreamTarget};

/// Maximum buffered request body. Framework resource requests are GETs;
/// anything larger is misdirected traffic.
const MAX_REQUEST_BODY: usize = 2 * 1024 * 1024;

/// Connection-scoped headers that must not be forwarded (RFC 9110 §7.6.1).
static HOP_BY_HOP_HEADERS: [HeaderName; 8] = [
    HeaderName::from_static("connection"),
    HeaderName::from_static("keep-alive"),
    HeaderName::from_static("proxy-authenticate"),
    HeaderName::from_static("proxy-authorization"),
    HeaderName::from_static("te"),
    HeaderName::from_static("trailer"),
    HeaderName::from_static("transfer-encoding"),
    HeaderName::from_static("upgrade"),
];

/// Forwards requests to one upstream target for the process lifetime.
#[derive(Debug)]
pub struct ProxyTransport {
    client: reqwest::Client,
    target: UpstreamTarget,
}

impl ProxyTransport {
    /// Build a transport bound to `target`.
    pub fn new(target: UpstreamTarget) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, target })
    }

    pub fn target(&self) -> &UpstreamTarget {
        &self.target
    }

    /// Forward a request upstream and return the upstream response.
    pub async fn forward(&self, req: Request<Body>) -> Response<Body> {
        let (parts, body) = req.into_parts();

        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let url = self.target.url_for(path_and_query);

        let body_bytes = match axum::body::to_bytes(body, MAX_REQUEST_BODY).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Request body too large to forward");
                return StatusCode::PAYLOAD_TOO_LARGE.into_response();
            }
        };

        let mut headers = parts.headers;
        strip_connection_headers(&mut headers);
        // Origin rewrite: reqwest derives Host from the target URL.
        headers.remove(axum::http::header::HOST);

        let upstream = self
            .client
            .request(parts.method, &url)
            .headers(headers)
            .body(body_bytes)
            .send()
            .await;

        match upstream {
            Ok(upstream) => {
                let status = upstream.status();
                let mut upstream_headers = upstream.headers().clone();
                strip_connection_headers(&mut upstream_headers);

                let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
                *response.status_mut() = status;
                *response.headers_mut() = upstream_headers;
                response
            }
            Err(e) => {
                tracing::error!(url = %url, error = %e, "Upstream request failed");
                (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
            }
        }
    }
}

fn strip_connection_headers(headers: &mut HeaderMap) {
    for name in &HOP_BY_HOP_HEADERS {
        headers.remove(name);
    }
}
