use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

/// 是否禁用 TLS 验证（用于调试 mitmproxy 等场景）
pub fn should_disable_tls_verify() -> bool {
    std::env::var("STORYTELLER_DISABLE_TLS_VERIFY")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// 创建访问上游 API 的 HTTP 客户端
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    let mut builder = Client::builder()
        .timeout(timeout)
        .user_agent(user_agent())
        .pool_max_idle_per_host(10);

    if should_disable_tls_verify() {
        tracing::warn!("TLS certificate verification is DISABLED - for debugging only!");
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder.build().context("Failed to create HTTP client")
}

fn user_agent() -> String {
    format!("storyteller/{}", env!("CARGO_PKG_VERSION"))
}

/// 截断字符串用于日志输出（按字符边界）
#[inline]
pub fn truncate_for_log(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
