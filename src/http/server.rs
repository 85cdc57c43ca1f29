//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the proxy middleware applied
//! - Serve the project root for non-proxied requests
//! - Wire up middleware (tracing, timeout, request ID)
//! - Graceful shutdown on Ctrl+C

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::proxy::{Dispatcher, RouteDecision};

/// Tower middleware wrapping the whole application: framework resource
/// requests are forwarded upstream, everything else continues down the
/// chain to the inner handler.
pub async fn proxy_middleware(
    State(dispatcher): State<Arc<Dispatcher>>,
    req: Request,
    next: Next,
) -> Response {
    match dispatcher.decide(req.uri().path()) {
        RouteDecision::PassThrough => next.run(req).await,
        RouteDecision::Proxy => match dispatcher.transport().await {
            Ok(transport) => transport.forward(req).await,
            Err(e) => {
                tracing::error!(error = %e, "Failed to build proxy transport");
                (StatusCode::BAD_GATEWAY, "Upstream unavailable").into_response()
            }
        },
    }
}

/// Build the application router: static file fallback wrapped in the proxy
/// middleware and the ambient layers.
pub fn app(config: &ProxyConfig, dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(&config.serve.root))
        .layer(middleware::from_fn_with_state(dispatcher, proxy_middleware))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.timeouts.request_secs,
        )))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// HTTP server for the development proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and a fully
    /// initialized dispatcher.
    pub fn new(config: ProxyConfig, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            router: app(&config, dispatcher),
        }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
