//! HTTP surface
//!
//! One generation endpoint plus a liveness check, served with axum.

pub mod response;
pub mod routes;

pub use response::{ErrorBody, GenerateResponse};

use crate::app::App;
use crate::Result;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Inline images arrive base64-encoded inside the JSON body.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn router(app: Arc<App>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/generate", post(routes::generate))
        .route("/health", get(routes::health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app)
}

pub async fn serve(app: Arc<App>, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    info!("Listening on http://{}", addr);
    axum::serve(listener, router(app)).await?;
    Ok(())
}
