//! Gemini 配置常量

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// 认证头，避免把密钥放进 URL 查询参数
pub const API_KEY_HEADER: &str = "x-goog-api-key";

pub const GENERATE_CONTENT_METHOD: &str = "generateContent";

/// 上游错误响应写入日志时保留的最大字符数
pub const ERROR_BODY_LOG_CHARS: usize = 500;
