//! Provider 抽象层
//!
//! 定义文本生成服务的统一接口，当前只有 Gemini 一种实现

pub mod gemini;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Config;
use crate::story::GenerationConfig;
use gemini::GeminiProvider;

/// Provider Trait - 文本生成服务的统一接口
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider 名称（用于日志和标识）
    fn name(&self) -> &str;

    /// 根据提示词和生成参数返回模型输出的原始文本
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String>;

    /// 是否具备调用上游所需的凭据
    fn is_configured(&self) -> bool {
        true
    }
}

/// 根据应用配置创建 Provider
///
/// 缺少 API 密钥时仍会创建 Provider，只记录一次警告，之后每次调用都会失败
pub fn create_provider(config: &Config) -> Result<Arc<dyn Provider>> {
    if !config.has_api_key() {
        tracing::warn!(
            "GEMINI_API_KEY environment variable not set. Story generation requests will fail."
        );
    }

    let provider = GeminiProvider::new(
        config.gemini_api_key.clone(),
        config.gemini_api_base.clone(),
        config.model_timeout,
    )?;
    Ok(Arc::new(provider))
}
