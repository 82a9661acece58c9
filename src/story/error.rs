//! 故事请求错误
//!
//! 区分客户端错误（400）与服务端错误（500）。服务端错误的细节只写入日志，
//! 不会返回给客户端。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::time::Duration;
use thiserror::Error;

use super::StoryResponse;

pub const INVALID_REQUEST_MESSAGE: &str = "Invalid request. 'prompt' is required.";
pub const GENERATION_FAILED_MESSAGE: &str =
    "Failed to generate story. Please check the backend logs.";

#[derive(Debug, Error)]
pub enum StoryError {
    /// 请求体缺少 prompt 或不是合法 JSON
    #[error("{}", INVALID_REQUEST_MESSAGE)]
    InvalidRequest,

    #[error("creativity must be a number, got {0}")]
    InvalidCreativity(String),

    #[error("model returned empty text")]
    EmptyOutput,

    #[error("model call timed out after {0:?}")]
    Timeout(Duration),

    #[error("model call failed: {0:#}")]
    Generation(#[from] anyhow::Error),
}

impl StoryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StoryError::InvalidRequest => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for StoryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_client_error() {
            tracing::debug!("rejected story request: {}", self);
            INVALID_REQUEST_MESSAGE
        } else {
            tracing::error!("story generation failed: {}", self);
            GENERATION_FAILED_MESSAGE
        };

        (status, Json(StoryResponse::Error(message.to_string()))).into_response()
    }
}
