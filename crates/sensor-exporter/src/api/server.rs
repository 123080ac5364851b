use std::sync::Arc;

use error_stack::Report;
use poem::get;
use poem::listener::TcpListener;
use poem::middleware::Tracing;
use poem::Endpoint;
use poem::EndpointExt;
use poem::Route;
use poem::Server;
use tokio::sync::oneshot;
use tracing::error;
use tracing::info;

use super::errors::ApiError;
use super::handlers::get_metrics;
use super::handlers::healthz;
use super::ScrapeContext;

/// Routes served by [`ApiServer`], exposed separately for in-process testing.
pub fn routes(context: Arc<ScrapeContext>) -> impl Endpoint {
    Route::new()
        .at("/metrics", get(get_metrics))
        .at("/healthz", get(healthz))
        .data(context)
        .with(Tracing)
}

/// HTTP server exposing sensor metrics to pull-based scrapers
pub struct ApiServer {
    context: Arc<ScrapeContext>,
    listen_addr: String,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(context: Arc<ScrapeContext>, listen_addr: String) -> Self {
        Self {
            context,
            listen_addr,
        }
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    /// Start the API server
    ///
    /// # Errors
    ///
    /// - [`ApiError::ServerError`] if the server fails to start or bind to the address
    pub async fn run(self, mut shutdown_rx: oneshot::Receiver<()>) -> Result<(), Report<ApiError>> {
        info!(
            listen_addr = %self.listen_addr,
            content_type = self.context.encoder.content_type(),
            sense_timeout_ms = self.context.registry.sense_timeout().as_millis(),
            on_failure = %self.context.policy,
            "Starting metrics server"
        );

        let app = routes(self.context);
        let listener = TcpListener::bind(&self.listen_addr);
        let server = Server::new(listener);

        tokio::select! {
            result = server.run(app) => {
                match result {
                    Ok(()) => {
                        info!("Metrics server stopped normally");
                        Ok(())
                    }
                    Err(e) => {
                        error!("Metrics server failed: {e}");
                        Err(Report::new(ApiError::ServerError {
                            message: format!("Server failed: {e}"),
                        }))
                    }
                }
            }
            _ = &mut shutdown_rx => {
                info!("Metrics server shutdown requested");
                Ok(())
            }
        }
    }
}
