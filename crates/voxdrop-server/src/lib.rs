#![allow(clippy::missing_errors_doc)]

mod cors;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, routing::get};
use voxdrop_config::Config;
use tower_http::trace::TraceLayer;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration, with Polly and S3 behind the speech endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the speech server fails to initialize
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let speech = tts::build_server(config).await?;
        Ok(Self::with_speech_server(config, speech))
    }

    /// Build the server around an already constructed speech server
    pub fn with_speech_server(config: &Config, speech: Arc<tts::Server>) -> Self {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let mut app = Router::new();

        if config.server.health.enabled {
            app = app.route(&config.server.health.path, get(health_handler));
        }

        app = app.merge(cors::with_static_cors_headers(tts::endpoint_router().with_state(speech)));

        app = app.layer(TraceLayer::new_for_http());

        Self {
            router: app,
            listen_address,
        }
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Override the listen address (e.g. from the command line)
    #[must_use]
    pub fn with_listen_address(mut self, listen_address: SocketAddr) -> Self {
        self.listen_address = listen_address;
        self
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}

async fn health_handler() -> &'static str {
    "ok"
}
