//! 故事生成
//!
//! 解析请求、构造提示词、调用模型并整理输出

mod error;
pub mod prompt;

pub use error::{StoryError, GENERATION_FAILED_MESSAGE};
pub use prompt::{build_prompt, GenerationConfig};

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::providers::Provider;
use prompt::{DEFAULT_TEMPERATURE, MAX_TEMPERATURE, MIN_TEMPERATURE};

const DEFAULT_GENRE: &str = "creative";
const DEFAULT_LENGTH: &str = "short";
const DEFAULT_TONE: &str = "neutral";

/// 故事生成请求
#[derive(Debug, Clone, PartialEq)]
pub struct StoryRequest {
    pub prompt: String,
    pub genre: String,
    pub length: String,
    pub tone: String,
    pub creativity: f64,
}

/// 故事生成响应，序列化后只包含 `story` 或 `error` 之一
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryResponse {
    Story(String),
    Error(String),
}

impl StoryRequest {
    /// 从原始请求体解析
    ///
    /// 请求体为空、不是合法 JSON、不是对象或缺少非空 `prompt` 时返回
    /// [`StoryError::InvalidRequest`]
    pub fn from_body(body: &[u8]) -> Result<Self, StoryError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|_| StoryError::InvalidRequest)?;
        Self::from_json(&value)
    }

    pub fn from_json(value: &Value) -> Result<Self, StoryError> {
        let data = value.as_object().ok_or(StoryError::InvalidRequest)?;

        let prompt = data
            .get("prompt")
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
            .ok_or(StoryError::InvalidRequest)?
            .to_string();

        let creativity = match data.get("creativity") {
            None => DEFAULT_TEMPERATURE,
            Some(v) => parse_creativity(v)?,
        };

        Ok(Self {
            prompt,
            genre: text_field(data.get("genre"), DEFAULT_GENRE),
            length: text_field(data.get("length"), DEFAULT_LENGTH),
            tone: text_field(data.get("tone"), DEFAULT_TONE),
            creativity,
        })
    }

    /// 发送给模型的完整指令
    pub fn instruction(&self) -> String {
        build_prompt(&self.prompt, &self.length, &self.genre, &self.tone)
    }

    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig::with_temperature(self.creativity)
    }
}

/// 可选文本字段：缺失或 null 时使用默认值，非字符串标量按 JSON 文本展示
fn text_field(value: Option<&Value>, default: &str) -> String {
    match value {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// 解析 creativity，接受数字、数字字符串或布尔值（true 为 1.0），并限制在采样区间内
///
/// 显式的 `null` 不等同于缺省，按无法转换处理
fn parse_creativity(value: &Value) -> Result<f64, StoryError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(c) if c.is_finite() => Ok(c.clamp(MIN_TEMPERATURE, MAX_TEMPERATURE)),
        _ => Err(StoryError::InvalidCreativity(value.to_string())),
    }
}

/// 生成一篇故事
///
/// 模型调用受 `timeout` 约束，返回的文本会去掉首尾空白
pub async fn write_story(
    provider: &dyn Provider,
    request: &StoryRequest,
    timeout: Duration,
) -> Result<String, StoryError> {
    let instruction = request.instruction();
    let config = request.generation_config();

    tracing::info!(
        provider = provider.name(),
        model = config.model,
        genre = %request.genre,
        length = %request.length,
        tone = %request.tone,
        temperature = config.temperature,
        prompt_chars = request.prompt.chars().count(),
        "story request"
    );

    let text = tokio::time::timeout(timeout, provider.generate(&instruction, &config))
        .await
        .map_err(|_| StoryError::Timeout(timeout))??;

    let story = text.trim().to_string();
    if story.is_empty() {
        return Err(StoryError::EmptyOutput);
    }
    tracing::info!(story_chars = story.chars().count(), "story generated");
    Ok(story)
}
