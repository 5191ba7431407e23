//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all API handlers
//! - Wire up middleware (request ID, tracing, CORS, body limit)
//! - Serve the bundled client when a static directory is configured
//! - Run until the shutdown signal, then drain in-flight requests

use std::path::Path;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, Request},
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::annotate::Annotator;
use crate::config::ServerConfig;
use crate::http::handlers::{collections, history, relay, system};
use crate::relay::RelayClient;
use crate::store::Store;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub relay: RelayClient,
    pub annotator: Annotator,
}

impl AppState {
    /// Bundle the shared clients for handlers.
    pub fn new(store: Store, relay: RelayClient, annotator: Annotator) -> Self {
        Self {
            store,
            relay,
            annotator,
        }
    }
}

/// HTTP server for the API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Build the router and middleware stack for `config`.
    pub fn new(config: &ServerConfig, state: AppState) -> Self {
        Self {
            router: build_router(config, state),
        }
    }

    /// The fully layered router, for driving requests without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until a value arrives on `shutdown`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server received shutdown signal, draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
fn build_router(config: &ServerConfig, state: AppState) -> Router {
    let api = Router::new()
        .route("/request", post(relay::send_request))
        .route("/history", get(history::list).delete(history::clear))
        .route("/history/{id}", get(history::get).delete(history::delete))
        .route("/collections", get(collections::list).post(collections::create))
        .route(
            "/collections/{id}",
            get(collections::get)
                .put(collections::update)
                .delete(collections::delete),
        )
        .route("/collections/{id}/requests", post(collections::add_request))
        .route(
            "/collections/{id}/requests/{request_id}",
            delete(collections::remove_request),
        )
        .route("/health", get(system::health))
        .fallback(system::not_found);

    let mut router = Router::new().nest("/api", api);
    router = match &config.static_dir {
        Some(dir) => {
            let index = Path::new(dir).join("index.html");
            tracing::info!(static_dir = %dir, "Serving client files");
            router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
        }
        None => router.fallback(system::not_found),
    };

    router
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("-");
                    tracing::info_span!(
                        "http",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(RequestBodyLimitLayer::new(config.max_body_size))
                .layer(cors_layer(&config.client_url)),
        )
}

fn cors_layer(client_url: &str) -> CorsLayer {
    let origin = match HeaderValue::from_str(client_url.trim_end_matches('/')) {
        Ok(value) => AllowOrigin::exact(value),
        Err(_) => {
            tracing::warn!(client_url = %client_url, "Client URL is not a valid origin, CORS disabled");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}
