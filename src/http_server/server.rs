//! Gateway HTTP server
//!
//! Axum router assembly and the serving loop. Routing is exact-match on
//! path only; preflight requests short-circuit in middleware before the
//! router ever sees them, and every response carries a permissive
//! allow-origin header.

use std::io;
use std::net::SocketAddr;

use axum::extract::Request;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::observability::Logger;

use super::config::HttpServerConfig;
use super::routes::{self, SharedState};

/// How long browsers may cache a preflight decision, in seconds.
const PREFLIGHT_MAX_AGE_SECS: &str = "3600";

/// Gateway HTTP server.
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, state: SharedState) -> Self {
        let router = build_router(state);
        Self { config, router }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until shutdown is requested (Ctrl-C).
    ///
    /// Dropping out of this function releases the listener and the last
    /// shared reference to the warehouse client.
    pub async fn start(self) -> Result<(), io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let listener = TcpListener::bind(addr).await?;
        println!("trendgate listening on http://{}", addr);
        Logger::info("gateway_listening", &[("addr", &addr.to_string())]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Logger::info("gateway_stopped", &[]);
        Ok(())
    }
}

/// Build the gateway router around shared boot-time state.
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/search", any(routes::search))
        .route("/cluster", any(routes::cluster))
        .route("/monthlyTimeSeries", any(routes::monthly_time_series))
        .route("/questionsByCluster", any(routes::questions_by_cluster))
        .route("/yearRange", any(routes::year_range))
        .fallback(routes::unknown_route)
        .with_state(state)
        .layer(cors)
        // outermost: preflight never reaches routing
        .layer(middleware::from_fn(preflight))
}

/// Cross-origin preflight short-circuit.
///
/// Any OPTIONS request is answered immediately with no content and
/// permissive headers, independent of path.
async fn preflight(request: Request, next: Next) -> Response {
    if request.method() != Method::OPTIONS {
        return next.run(request).await;
    }

    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(PREFLIGHT_MAX_AGE_SECS),
    );
    response
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    Logger::info("gateway_shutdown_requested", &[]);
}
