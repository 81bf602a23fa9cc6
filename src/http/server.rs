//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the navigation handler
//! - Wire up middleware (tracing, timeout, request ID, security headers)
//! - Bind server to listener with graceful shutdown
//! - Dispatch every GET/HEAD request to the route table

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{set_header::SetResponseHeaderLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::lifecycle::ShutdownSignal;
use crate::routing::RouteTable;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RouteTable>,
}

/// HTTP server hosting the route table.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
    table: Arc<RouteTable>,
}

impl HttpServer {
    /// Create a new HTTP server over an already registered route table.
    pub fn new(config: GatewayConfig, table: Arc<RouteTable>) -> Self {
        let state = AppState { table: table.clone() };
        let router = Self::build_router(&config, state);
        Self { router, config, table }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let router = Router::new()
            .fallback(navigate_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id(request.headers()),
                )
            }))
            .layer(set_request_id_layer());

        if config.security.enable_headers {
            router.layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
        } else {
            router
        }
    }

    /// The router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.table.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.recv())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Navigation handler.
/// Resolves the request path through the route table and serves the view.
async fn navigate_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "GET, HEAD")],
            "Method not allowed",
        )
            .into_response();
    }

    let target = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    match state.table.resolve(target).await {
        Ok(resolution) => resolution.into_response(),
        Err(e) => {
            if e.is_retryable() {
                tracing::warn!(request_id = %request_id(&headers), path = %target, error = %e, "Navigation failed");
            } else {
                tracing::debug!(request_id = %request_id(&headers), path = %target, "No route matched");
            }
            e.into_response()
        }
    }
}
