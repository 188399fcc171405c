//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router for pages, static files and form submission
//! - Wire up middleware (tracing, request ID, timeout, body limit)
//! - Hand each submitted body to the relay as one datagram, then redirect

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{FormRelayConfig, HttpConfig};
use crate::http::forward::DatagramForwarder;
use crate::http::pages::{Page, Pages};
use crate::observability::metrics;

/// Fatal front-end errors.
#[derive(Debug, thiserror::Error)]
pub enum FrontendError {
    #[error("invalid relay address '{0}'")]
    RelayAddress(String),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pages: Arc<Pages>,
    pub forwarder: DatagramForwarder,
}

/// The HTTP front-end.
pub struct HttpServer {
    router: Router,
    config: HttpConfig,
}

impl HttpServer {
    /// Create a server that forwards submissions to `config.relay.bind_address`.
    pub fn new(config: &FormRelayConfig) -> Result<Self, FrontendError> {
        let relay_addr: SocketAddr = config
            .relay
            .bind_address
            .parse()
            .map_err(|_| FrontendError::RelayAddress(config.relay.bind_address.clone()))?;

        let state = AppState {
            pages: Arc::new(Pages::new(&config.http.web_root)),
            forwarder: DatagramForwarder::new(relay_addr),
        };

        Ok(Self {
            router: Self::build_router(&config.http, state),
            config: config.http.clone(),
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &HttpConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(index).post(submit))
            .route("/message", get(message_form).post(submit))
            .route("/{*path}", get(static_file).post(submit))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(DefaultBodyLimit::disable())
                    .layer(RequestBodyLimitLayer::new(config.max_body_size))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs))),
            )
    }

    /// The configured router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Bind the configured TCP address.
    pub async fn bind(&self) -> Result<TcpListener, FrontendError> {
        TcpListener::bind(&self.config.bind_address)
            .await
            .map_err(|source| FrontendError::Bind {
                address: self.config.bind_address.clone(),
                source,
            })
    }

    /// Serve on `listener` until shutdown.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), FrontendError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server started on http://{}", addr);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server received shutdown signal");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn index(State(state): State<AppState>) -> Response {
    state.pages.fixed(Page::Index, StatusCode::OK).await
}

async fn message_form(State(state): State<AppState>) -> Response {
    state.pages.fixed(Page::Message, StatusCode::OK).await
}

async fn static_file(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    state.pages.static_file(&path).await
}

/// Forward the raw body and redirect without waiting for the relay.
async fn submit(State(state): State<AppState>, body: Bytes) -> Response {
    match state.forwarder.forward(&body).await {
        Ok(sent) => {
            metrics::record_submission("forwarded");
            tracing::debug!(bytes = sent, relay = %state.forwarder.relay_addr(), "Submission forwarded");
        }
        Err(e) => {
            metrics::record_submission("send_failed");
            tracing::error!(relay = %state.forwarder.relay_addr(), error = %e, "Failed to forward submission");
        }
    }

    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}
