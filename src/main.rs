//! Service Panel 主程序入口

use anyhow::{Context, Result};
use clap::Parser;
use service_panel::cli::{self, Args};
use service_panel::logging::LoggingSystem;
use tracing::{debug, error};

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse();

    // 初始化日志系统：命令行参数优先，其次是配置文件
    let log_config = cli::log_config(&args).await;

    let _logging_system = LoggingSystem::setup_logging(log_config).context("初始化日志系统失败")?;

    debug!("Service Panel v{} 启动", service_panel::VERSION);

    // 执行命令
    if let Err(e) = cli::run(&args).await {
        error!("命令执行失败: {}", e);
        eprintln!("错误: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
