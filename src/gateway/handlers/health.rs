//! 健康检查处理器

use axum::{extract::State, Json};
use serde::Serialize;

use crate::gateway::state::AppState;
use crate::story::prompt::MODEL_NAME;

/// 健康检查响应
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    provider: String,
    model: &'static str,
    /// 是否已配置 API 密钥；未配置时服务可用但生成请求会失败
    configured: bool,
}

/// GET /health
pub async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider = state.provider();

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        provider: provider.name().to_string(),
        model: MODEL_NAME,
        configured: provider.is_configured(),
    })
}
