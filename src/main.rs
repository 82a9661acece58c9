//! Storyteller - 故事生成后端服务
//!
//! 一个轻量级的 Web 后端：接收用户的故事创意，套用固定的提示词模板，
//! 调用 Gemini 生成故事并返回结果。
//!
//! # 功能特性
//!
//! - 静态落地页（`GET /`）
//! - 故事生成接口（`POST /generate_story`）
//! - 缺少 API 密钥时降级启动
//! - 模型调用超时控制
//!
//! # 命令行接口
//!
//! - `serve`: 启动 API 服务器
//! - `test`: 向本地服务器发送测试请求

mod commands;
mod config;
mod gateway;
mod providers;
mod story;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Storyteller CLI
#[derive(Parser)]
#[command(name = "storyteller")]
#[command(about = "Story generation backend powered by Gemini", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// 可用的命令
#[derive(Subcommand)]
enum Commands {
    /// 启动 API 服务器
    Serve,
    /// 向本地服务器发送测试请求
    Test {
        /// 故事创意
        #[arg(short, long, default_value = "a lonely robot")]
        prompt: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // 加载 .env 文件（如果存在）
    if let Ok(dotenv_path) = std::env::var("STORYTELLER_ENV_FILE") {
        dotenvy::from_path(&dotenv_path).ok();
    } else {
        dotenvy::dotenv().ok();
    }

    init_tracing();

    // 解析命令行参数和配置
    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Serve => commands::serve_command(config).await,
        Commands::Test { prompt } => commands::test_command(config, prompt).await,
    }
}

/// 初始化日志系统
///
/// `STORYTELLER_LOG_FORMAT=json` 时输出 JSON 日志，否则输出文本日志
fn init_tracing() {
    let json = std::env::var("STORYTELLER_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storyteller=info".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| {
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
        }))
        .init();
}
