//! 提示词与生成参数
//!
//! 提示词构造是纯函数：相同输入必须得到逐字节相同的输出。

use serde::Serialize;

/// 使用的模型（固定常量，不接受用户指定）
pub const MODEL_NAME: &str = "gemini-2.5-flash";

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const MIN_TEMPERATURE: f64 = 0.0;
pub const MAX_TEMPERATURE: f64 = 2.0;

const TOP_P: f64 = 0.95;
const TOP_K: u32 = 64;
const MAX_OUTPUT_TOKENS: u32 = 8192;

/// 模型生成参数
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationConfig {
    pub model: &'static str,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl GenerationConfig {
    /// 以 creativity 作为 temperature 构造生成参数
    pub fn with_temperature(temperature: f64) -> Self {
        Self {
            model: MODEL_NAME,
            temperature,
            top_p: TOP_P,
            top_k: TOP_K,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::with_temperature(DEFAULT_TEMPERATURE)
    }
}

/// 构造发送给模型的完整指令
pub fn build_prompt(prompt: &str, length: &str, genre: &str, tone: &str) -> String {
    format!(
        "Write a {length} story based on this idea: '{prompt}'.\n\n\
         The story should be a {genre} story with a {tone} tone.\n\
         Use simple sentences and easy words that a child can understand.\n\
         Please only write the story, with nothing else before or after it."
    )
}
