//! Serve 命令 - 启动 API 服务器
//!
//! 此模块实现 `serve` 命令，启动 HTTP 服务器提供落地页和故事生成接口。

use anyhow::Result;

use crate::config::Config;
use crate::gateway;

/// 执行服务器启动命令
///
/// # 参数
///
/// * `config` - 应用配置，包含监听地址、端口、API 密钥等信息
///
/// # 功能
///
/// - 创建 Gemini Provider（缺少密钥时记录警告并降级运行）
/// - 初始化 HTTP 路由和中间件
/// - 启动服务器并等待关闭信号
/// - 支持优雅关闭（Ctrl+C 或 SIGTERM）
pub async fn serve_command(config: Config) -> Result<()> {
    gateway::serve(config).await
}
