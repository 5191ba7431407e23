//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Initialize subsystems in dependency order
//! - Start the retention sweeper alongside the HTTP server
//! - Bind the listener last

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::annotate::{AnnotationError, Annotator};
use crate::config::{validation::validate_config, AppConfig, ConfigError};
use crate::http::{AppState, HttpServer};
use crate::lifecycle::Shutdown;
use crate::relay::{RelayClient, RelayError};
use crate::store::{RetentionSweeper, Store, StoreError};

/// Fatal errors while bringing the service up or serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to open store: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error("Failed to build completion client: {0}")]
    Annotation(#[from] AnnotationError),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// A fully initialized service, bound but not yet serving.
pub struct Application {
    config: AppConfig,
    state: AppState,
    listener: TcpListener,
}

impl Application {
    /// Validate `config`, initialize every subsystem, and bind the listener.
    pub async fn build(config: AppConfig) -> Result<Self, StartupError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let store = Store::connect(&config.database).await?;
        let relay = RelayClient::new(&config.relay)?;
        let annotator = Annotator::from_config(&config.ai)?;
        tracing::info!(
            ai_enabled = annotator.is_enabled(),
            model = %config.ai.model,
            relay_timeout_secs = config.relay.timeout_secs,
            "Clients initialized"
        );

        let state = AppState::new(store, relay, annotator);

        let address = config.server.bind_address.clone();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| StartupError::Bind { address, source })?;

        Ok(Self {
            config,
            state,
            listener,
        })
    }

    /// Address the listener is bound to (useful when binding port 0).
    pub fn local_addr(&self) -> Result<SocketAddr, StartupError> {
        self.listener.local_addr().map_err(StartupError::Serve)
    }

    /// Shared handler state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve until `shutdown` fires, then stop background tasks and close the store.
    pub async fn run(self, shutdown: Shutdown) -> Result<(), StartupError> {
        let sweeper = RetentionSweeper::new(
            self.state.store.history().clone(),
            Duration::from_secs(self.config.database.purge_interval_secs),
        );
        let sweeper_handle = tokio::spawn(sweeper.run(shutdown.subscribe()));

        let server = HttpServer::new(&self.config.server, self.state.clone());
        let served = server.run(self.listener, shutdown.subscribe()).await;

        // The server may also stop on its own; make sure the sweeper follows.
        shutdown.trigger();
        if let Err(e) = sweeper_handle.await {
            tracing::error!(error = %e, "Retention sweeper task failed");
        }
        self.state.store.close().await;

        served.map_err(StartupError::Serve)
    }
}
