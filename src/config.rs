//! 应用配置模块
//!
//! 负责从环境变量加载应用配置，包括：
//! - 服务器监听地址和端口
//! - Gemini API 密钥与接口地址
//! - 模型调用超时

use anyhow::{Context, Result};
use std::time::Duration;

use crate::providers::gemini::GEMINI_API_BASE;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: &str = "5000";
const DEFAULT_MODEL_TIMEOUT_SECS: &str = "60";

/// 应用配置
///
/// 进程启动时加载一次，之后以只读方式传递给各组件
#[derive(Clone)]
pub struct Config {
    /// 服务器监听地址（如 "0.0.0.0" 或 "127.0.0.1"）
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
    /// Gemini API 密钥，未设置时服务以降级模式运行
    pub gemini_api_key: Option<String>,
    /// Gemini API 基础地址
    pub gemini_api_base: String,
    /// 单次模型调用的超时时间
    pub model_timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field("gemini_api_base", &self.gemini_api_base)
            .field("model_timeout", &self.model_timeout)
            .finish()
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// # 环境变量
    ///
    /// - `STORYTELLER_HOST`: 服务器监听地址（默认: "0.0.0.0"）
    /// - `STORYTELLER_PORT`: 服务器监听端口（默认: 5000）
    /// - `GEMINI_API_KEY`: Gemini API 密钥（可选，缺失时降级运行）
    /// - `GEMINI_API_BASE`: Gemini API 基础地址
    /// - `STORYTELLER_MODEL_TIMEOUT_SECS`: 模型调用超时秒数（默认: 60）
    ///
    /// # 错误
    ///
    /// - 如果 `STORYTELLER_PORT` 不是有效的端口号
    /// - 如果 `STORYTELLER_MODEL_TIMEOUT_SECS` 不是正整数
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 使用自定义的查找函数加载配置
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("STORYTELLER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = lookup("STORYTELLER_PORT")
            .unwrap_or_else(|| DEFAULT_PORT.to_string())
            .parse()
            .context("STORYTELLER_PORT must be a valid port number")?;

        let gemini_api_key = lookup("GEMINI_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let gemini_api_base = lookup("GEMINI_API_BASE")
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|| GEMINI_API_BASE.to_string());

        let timeout_secs: u64 = lookup("STORYTELLER_MODEL_TIMEOUT_SECS")
            .unwrap_or_else(|| DEFAULT_MODEL_TIMEOUT_SECS.to_string())
            .parse()
            .context("STORYTELLER_MODEL_TIMEOUT_SECS must be a positive integer")?;
        if timeout_secs == 0 {
            anyhow::bail!("STORYTELLER_MODEL_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Self {
            host,
            port,
            gemini_api_key,
            gemini_api_base,
            model_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// 是否已配置 Gemini API 密钥
    pub fn has_api_key(&self) -> bool {
        self.gemini_api_key.is_some()
    }
}
