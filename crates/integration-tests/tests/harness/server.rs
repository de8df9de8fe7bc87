//! Test server wrapper that starts voxdrop on a random port

use std::{net::SocketAddr, sync::Arc};

use tokio_util::sync::CancellationToken;
use tts::{ObjectStore, SpeechSynthesizer, TtsServerBuilder};
use voxdrop_config::Config;
use voxdrop_server::Server;

/// A running test server instance
pub struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    client: reqwest::Client,
}

impl TestServer {
    /// Start a test server with the given configuration and collaborators
    ///
    /// Binds to port 0 for automatic port assignment
    pub async fn start(
        config: Config,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        store: Arc<dyn ObjectStore>,
    ) -> anyhow::Result<Self> {
        let speech = TtsServerBuilder::new(&config)
            .with_synthesizer(synthesizer)
            .with_store(store)
            .build()
            .await?;
        let server = Server::with_speech_server(&config, Arc::new(speech));
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        // Bind the listener here so we know the actual port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, server.into_router())
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        let client = reqwest::Client::new();

        Ok(Self { addr, shutdown, client })
    }

    /// Base URL of the running test server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Get a reference to the HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// POST a JSON body to the speech endpoint
    pub async fn speak(&self, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url(tts::SPEECH_PATH))
            .json(&body)
            .send()
            .await
            .unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
