//! 命令处理逻辑
//!
//! 实现各种CLI命令的处理逻辑

use crate::cli::args::{Args, Commands, OutputFormat};
use crate::config::{ConfigLoader, GlobalConfig, PanelConfig, TomlConfigLoader};
use crate::error::{PanelError, Result};
use crate::executor::{CommandExecutor, InProcessChannel, LaunchExecutor, SocketChannel};
use crate::host::{LaunchServer, ShellLauncher};
use crate::logging::{parse_level, LogConfig};
use crate::notification::{ConsoleSink, NotificationTemplate, Notifier};
use crate::panel::{ConsoleMenuHost, Panel};
use async_trait::async_trait;
use log::LevelFilter;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info};

/// `init` 写出的默认配置
const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("../../templates/panel.toml");

/// 命令处理器trait
#[async_trait]
pub trait Command: Send + Sync {
    /// 执行命令
    async fn execute(&self, args: &Args) -> Result<()>;
}

/// 根据命令行参数分发到具体命令
pub async fn run(args: &Args) -> Result<()> {
    match &args.command {
        Commands::Serve { .. } => ServeCommand.execute(args).await,
        Commands::List { .. } => ListCommand.execute(args).await,
        Commands::Toggle { .. } => ToggleCommand.execute(args).await,
        Commands::Menu { .. } => MenuCommand.execute(args).await,
        Commands::Run { .. } => RunCommand.execute(args).await,
        Commands::Exec { .. } => ExecCommand.execute(args).await,
        Commands::Init { .. } => InitCommand.execute(args).await,
        Commands::Validate { .. } => ValidateCommand.execute(args).await,
        Commands::Version { .. } => VersionCommand.execute(args).await,
    }
}

/// 加载配置文件
async fn load_config(args: &Args) -> Result<PanelConfig> {
    let loader = TomlConfigLoader::new(false);
    loader.load_from_file(args.get_config_path()).await
}

/// 解析日志配置
///
/// 命令行参数优先；未指定时使用配置文件中的设置。配置文件无法读取时
/// 使用默认值，具体错误留给随后执行的命令报告。
///
/// # 参数
/// * `args` - 命令行参数
pub async fn log_config(args: &Args) -> LogConfig {
    let global = load_config(args)
        .await
        .map(|config| config.global)
        .unwrap_or_default();

    let level = match &args.log_level {
        Some(level) => level.clone().into(),
        None => parse_level(&global.log_level).unwrap_or(LevelFilter::Warn),
    };

    LogConfig {
        level,
        file_path: args.log_file.clone().or(global.log_file),
        json_format: args.json_logs || global.json_logs,
    }
}

/// 根据参数和配置构建命令执行器
pub fn build_executor(args: &Args, global: &GlobalConfig) -> Arc<dyn CommandExecutor> {
    if args.local {
        let launcher = ShellLauncher::new(global.shell.clone());
        Arc::new(LaunchExecutor::new(InProcessChannel::new(launcher)))
    } else {
        let socket = args
            .socket
            .clone()
            .unwrap_or_else(|| global.socket_path.clone());
        Arc::new(LaunchExecutor::new(SocketChannel::new(socket)))
    }
}

/// 根据参数和配置构建通知器
pub fn build_notifier(args: &Args, global: &GlobalConfig) -> Result<Notifier> {
    let template = NotificationTemplate::from_overrides(
        global.notification.title_template.as_deref(),
        global.notification.body_template.as_deref(),
    )?;

    Ok(Notifier::new(Arc::new(ConsoleSink), template)
        .with_enabled(global.notification.enabled && !args.no_notify))
}

/// 加载配置并构建面板
async fn build_panel(args: &Args) -> Result<Panel> {
    let config = load_config(args).await?;
    let executor = build_executor(args, &config.global);
    let notifier = build_notifier(args, &config.global)?;
    Ok(Panel::new(&config, executor, notifier))
}

/// 执行进程命令
pub struct ServeCommand;

#[async_trait]
impl Command for ServeCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        let Commands::Serve { shell } = &args.command else {
            return Ok(());
        };

        // 执行进程可以不依赖配置文件运行
        let config_path = args.get_config_path();
        let global = if config_path.exists() {
            load_config(args).await?.global
        } else {
            info!("未找到配置文件 {}，使用默认设置", config_path.display());
            GlobalConfig::default()
        };

        let socket = args.socket.clone().unwrap_or(global.socket_path);
        let launcher = ShellLauncher::new(shell.clone().unwrap_or(global.shell));
        let server = LaunchServer::bind(&socket, launcher)?;

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("收到中断信号，正在停止执行进程...");
                    let _ = shutdown_tx.send(());
                }
                Err(err) => {
                    error!("监听中断信号失败: {}", err);
                }
            }
        });

        println!("执行进程已启动: {}", socket.display());
        server.run(shutdown_rx).await
    }
}

/// 列出服务状态命令
pub struct ListCommand;

#[async_trait]
impl Command for ListCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        let Commands::List { format } = &args.command else {
            return Ok(());
        };

        let panel = build_panel(args).await?;
        let snapshots = panel.refresh_all().await;

        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&snapshots)?);
            }
            OutputFormat::Text => {
                if snapshots.is_empty() {
                    println!("没有配置任何服务");
                }
                for snapshot in &snapshots {
                    let marker = if snapshot.state.is_active() { "●" } else { "○" };
                    println!("{} {:<28} {}", marker, snapshot.name, snapshot.state);
                }
            }
        }

        Ok(())
    }
}

/// 切换服务命令
pub struct ToggleCommand;

#[async_trait]
impl Command for ToggleCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        let Commands::Toggle { service } = &args.command else {
            return Ok(());
        };

        let panel = build_panel(args).await?;
        let entry = panel.require_entry(service)?;

        // 终端里没有常驻界面，先等待挂载探测得到切换依据
        let before = entry.refresh().await;
        let dispatch = entry.toggle().await;
        info!(service = %service, state = %before, command = %dispatch.command, "已派发切换命令");

        let result = dispatch.wait().await;
        if !result.is_success() {
            return Err(PanelError::Other(anyhow::anyhow!(
                "服务 {} 切换命令退出码 {}",
                service,
                result.exit_code
            )));
        }
        Ok(())
    }
}

/// 显示菜单命令
pub struct MenuCommand;

#[async_trait]
impl Command for MenuCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        let Commands::Menu {
            service,
            show_commands,
        } = &args.command
        else {
            return Ok(());
        };

        let panel = build_panel(args).await?;
        let entry = panel.require_entry(service)?;
        entry.open_menu(&ConsoleMenuHost::new(*show_commands));
        Ok(())
    }
}

/// 执行菜单动作命令
pub struct RunCommand;

#[async_trait]
impl Command for RunCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        let Commands::Run { service, action } = &args.command else {
            return Ok(());
        };

        let panel = build_panel(args).await?;
        let entry = panel.require_entry(service)?;
        let dispatch = entry.menu().select_label(action).ok_or_else(|| {
            PanelError::ActionNotFound {
                service: service.clone(),
                label: action.clone(),
            }
        })?;

        let result = dispatch.wait().await;
        if !result.is_success() {
            return Err(PanelError::Other(anyhow::anyhow!(
                "动作 {} 退出码 {}",
                action,
                result.exit_code
            )));
        }
        Ok(())
    }
}

/// 直接执行命令
pub struct ExecCommand;

#[async_trait]
impl Command for ExecCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        let Commands::Exec { command } = &args.command else {
            return Ok(());
        };

        let config_path = args.get_config_path();
        let global = if config_path.exists() {
            load_config(args).await?.global
        } else {
            GlobalConfig::default()
        };

        let executor = build_executor(args, &global);
        let result = executor.execute(command).await;

        print!("{}", result.stdout);
        eprint!("{}", result.stderr);
        if !result.is_success() {
            return Err(PanelError::Other(anyhow::anyhow!(
                "命令退出码 {}",
                result.exit_code
            )));
        }
        Ok(())
    }
}

/// 初始化命令
pub struct InitCommand;

#[async_trait]
impl Command for InitCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        let Commands::Init { config_path, force } = &args.command else {
            return Ok(());
        };

        let path = config_path.clone().unwrap_or_else(|| args.get_config_path());
        self.create_config_file(&path, *force).await
    }
}

impl InitCommand {
    /// 创建配置文件
    async fn create_config_file(&self, config_path: &Path, force: bool) -> Result<()> {
        if config_path.exists() && !force {
            eprintln!("配置文件已存在: {}", config_path.display());
            eprintln!("使用 --force 参数覆盖现有文件");
            return Ok(());
        }

        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        tokio::fs::write(config_path, DEFAULT_CONFIG_TEMPLATE).await?;

        println!("配置文件已创建: {}", config_path.display());
        println!("请编辑配置文件以添加您的服务");
        Ok(())
    }
}

/// 验证命令
pub struct ValidateCommand;

#[async_trait]
impl Command for ValidateCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        let Commands::Validate {
            config_path,
            verbose,
        } = &args.command
        else {
            return Ok(());
        };

        let path = config_path.clone().unwrap_or_else(|| args.get_config_path());
        self.validate_config_file(&path, *verbose).await
    }
}

impl ValidateCommand {
    /// 验证配置文件
    async fn validate_config_file(&self, config_path: &Path, verbose: bool) -> Result<()> {
        println!("验证配置文件: {}", config_path.display());

        let loader = TomlConfigLoader::new(false);
        let config = loader.load_from_file(config_path).await?;

        if verbose {
            println!("配置验证通过！");
            println!("全局配置:");
            println!("  socket: {}", config.global.socket_path.display());
            println!("  shell: {}", config.global.shell);
            println!(
                "  通知: {}",
                if config.global.notification.enabled { "开启" } else { "关闭" }
            );
            println!("服务配置:");
            for (i, service) in config.services.iter().enumerate() {
                println!("  {}. {}", i + 1, service.name);
                match service.probe_pair() {
                    Some((command, expected)) => {
                        println!("     状态: {} == {:?}", command, expected)
                    }
                    None if service.has_partial_probe() => {
                        println!("     状态: 配置不完整，不探测")
                    }
                    None => println!("     状态: 不探测"),
                }
                println!("     启动: {}", service.start_command);
                println!("     停止: {}", service.stop_command);
                for action in &service.actions {
                    match action.role {
                        Some(role) => println!("     菜单 {} ({})", action.display_label(), role),
                        None => println!("     动作 {}: {}", action.label, action.command),
                    }
                }
            }
        } else {
            println!("✓ 配置文件验证通过");
            println!("✓ 找到 {} 个服务配置", config.services.len());
        }

        Ok(())
    }
}

/// 版本命令
pub struct VersionCommand;

#[async_trait]
impl Command for VersionCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Version { format } = &args.command {
            match format {
                OutputFormat::Json => {
                    let version_info = serde_json::json!({
                        "name": crate::APP_NAME,
                        "version": crate::VERSION,
                        "description": crate::APP_DESCRIPTION
                    });
                    println!("{}", serde_json::to_string_pretty(&version_info)?);
                }
                OutputFormat::Text => {
                    println!("{} v{}", crate::APP_NAME, crate::VERSION);
                    println!("{}", crate::APP_DESCRIPTION);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[tokio::test]
    async fn test_default_template_is_valid_config() {
        let loader = TomlConfigLoader::new(false);
        let config = loader
            .load_from_string(DEFAULT_CONFIG_TEMPLATE)
            .await
            .unwrap();

        let names: Vec<&str> = config.services.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            ["Leaf", "Auto Brightness", "Synergy", "Ethernet over USB", "Samba"]
        );
        assert!(config.services.iter().all(|s| s.probe_pair().is_some()));
    }

    #[tokio::test]
    async fn test_default_template_leaf_menu_order() {
        let loader = TomlConfigLoader::new(false);
        let config = loader
            .load_from_string(DEFAULT_CONFIG_TEMPLATE)
            .await
            .unwrap();

        let leaf = &config.services[0];
        let labels: Vec<String> = crate::panel::menu_items(leaf, true)
            .into_iter()
            .map(|item| item.label)
            .collect();
        assert_eq!(labels, ["Status", "Start", "Start Global", "Stop"]);
        assert_eq!(leaf.probe_pair(), Some(("systemctl is-active leaf", "active")));
        assert!(leaf.stop_command.ends_with("systemctl stop leaf"));
    }

    #[tokio::test]
    async fn test_log_config_falls_back_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("panel.toml");
        std::fs::write(
            &config_path,
            r#"
[global]
log_level = "debug"
log_file = "/var/log/service-panel.log"
json_logs = true
"#,
        )
        .unwrap();
        let path = config_path.to_str().unwrap();

        let args = Args::try_parse_from(["service-panel", "-c", path, "list"]).unwrap();
        let config = log_config(&args).await;
        assert_eq!(config.level, LevelFilter::Debug);
        assert_eq!(
            config.file_path,
            Some(std::path::PathBuf::from("/var/log/service-panel.log"))
        );
        assert!(config.json_format);

        let args = Args::try_parse_from([
            "service-panel",
            "-c",
            path,
            "-l",
            "error",
            "--log-file",
            "/tmp/override.log",
            "list",
        ])
        .unwrap();
        let config = log_config(&args).await;
        assert_eq!(config.level, LevelFilter::Error);
        assert_eq!(
            config.file_path,
            Some(std::path::PathBuf::from("/tmp/override.log"))
        );
    }

    #[tokio::test]
    async fn test_log_config_without_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");

        let args =
            Args::try_parse_from(["service-panel", "-c", missing.to_str().unwrap(), "version"])
                .unwrap();
        assert_eq!(log_config(&args).await, LogConfig::default());
    }

    #[tokio::test]
    async fn test_init_writes_and_respects_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("panel.toml");

        let command = InitCommand;
        command.create_config_file(&path, false).await.unwrap();
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(written, DEFAULT_CONFIG_TEMPLATE);

        tokio::fs::write(&path, "# edited").await.unwrap();
        command.create_config_file(&path, false).await.unwrap();
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "# edited");

        command.create_config_file(&path, true).await.unwrap();
        assert_eq!(
            tokio::fs::read_to_string(&path).await.unwrap(),
            DEFAULT_CONFIG_TEMPLATE
        );
    }

    #[test]
    fn test_build_notifier_respects_no_notify() {
        let args = Args::try_parse_from(["service-panel", "--no-notify", "list"]).unwrap();
        let notifier = build_notifier(&args, &GlobalConfig::default()).unwrap();
        assert!(!notifier.is_enabled());

        let args = Args::try_parse_from(["service-panel", "list"]).unwrap();
        let notifier = build_notifier(&args, &GlobalConfig::default()).unwrap();
        assert!(notifier.is_enabled());
    }

    #[tokio::test]
    async fn test_run_unknown_service_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.toml");
        tokio::fs::write(&path, DEFAULT_CONFIG_TEMPLATE).await.unwrap();

        let args = Args::try_parse_from([
            "service-panel",
            "--local",
            "--config",
            path.to_str().unwrap(),
            "run",
            "Missing",
            "Start",
        ])
        .unwrap();

        let result = RunCommand.execute(&args).await;
        assert!(matches!(result, Err(PanelError::ServiceNotFound { .. })));
    }
}
