mod convert;
mod error;
mod handlers;
mod types;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use log::info;
use tower_http::trace::TraceLayer;

use crate::core::CsvqlError;
use crate::service::CsvqlService;

pub use error::ApiError;
pub use types::{ErrorResponse, QueryRequest, TableJson};

/// HTTP command interface: one route per user action.
pub struct CsvqlApi {
    service: Arc<CsvqlService>,
}

impl CsvqlApi {
    pub fn new(service: CsvqlService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    pub fn service(&self) -> &Arc<CsvqlService> {
        &self.service
    }

    pub fn router(&self) -> Router {
        let upload_limit = self.service.config().server.max_upload_bytes;
        Router::new()
            .route("/health", get(handlers::health))
            .route("/api/v1/session", post(handlers::create_session))
            .route("/api/v1/session/{id}", delete(handlers::close_session))
            .route(
                "/api/v1/session/{id}/upload",
                put(handlers::upload).layer(DefaultBodyLimit::max(upload_limit)),
            )
            .route("/api/v1/session/{id}/table", get(handlers::get_table))
            .route(
                "/api/v1/session/{id}/query",
                get(handlers::default_query).post(handlers::run_query),
            )
            .route("/api/v1/session/{id}/download", get(handlers::download))
            .route("/api/v1/history", get(handlers::history))
            .layer(TraceLayer::new_for_http())
            .with_state(self.service.clone())
    }

    /// Serves until ctrl-c, then drops all sessions and the history.
    pub async fn serve(self, addr: &str) -> Result<(), CsvqlError> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| CsvqlError::IoError(format!("binding to {addr}: {e}")))?;
        info!("listening on {}", addr);
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| CsvqlError::IoError(format!("serving: {e}")))?;
        self.service.shutdown().await;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("cannot listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
