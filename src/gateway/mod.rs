//! Gateway 应用层
//!
//! HTTP 服务器和请求处理

mod handlers;
mod middleware;
mod state;

pub use state::AppState;

use anyhow::{Context, Result};
use axum::{
    error_handling::HandleErrorLayer,
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post},
    BoxError, Json, Router,
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::providers;
use crate::story::{StoryResponse, GENERATION_FAILED_MESSAGE};

/// 整个 HTTP 请求的超时，需大于模型调用超时
const REQUEST_TIMEOUT_GRACE_SECS: u64 = 5;

pub async fn serve(config: Config) -> Result<()> {
    tracing::debug!(?config, "loaded config");

    let provider = providers::create_provider(&config)?;
    let state = AppState::new(provider, config.model_timeout);
    let app = build_router(state, request_timeout(&config));
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid listen address")?;
    tracing::info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

fn request_timeout(config: &Config) -> Duration {
    config.model_timeout + Duration::from_secs(REQUEST_TIMEOUT_GRACE_SECS)
}

fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(handlers::handle_landing))
        .route("/health", get(handlers::handle_health))
        .route("/generate_story", post(handlers::handle_generate_story))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(middleware::request_logger))
                .layer(TraceLayer::new_for_http())
                .layer(HandleErrorLayer::new(handle_layer_error))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .with_state(state)
}

/// 中间件层的错误（目前只有整体请求超时）同样返回 `{"error": ...}` 响应体
async fn handle_layer_error(err: BoxError) -> (StatusCode, Json<StoryResponse>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::error!("request timed out");
    } else {
        tracing::error!("unhandled middleware error: {}", err);
    }
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(StoryResponse::Error(GENERATION_FAILED_MESSAGE.to_string())),
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    #[cfg(not(unix))]
    tokio::select! {
        _ = ctrl_c => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
