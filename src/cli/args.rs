//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Service Panel - 服务控制面板
#[derive(Parser, Debug, Clone)]
#[command(
    name = "service-panel",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 配置文件路径
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "配置文件路径",
        env = "SERVICE_PANEL_CONFIG",
        global = true
    )]
    pub config: Option<PathBuf>,

    /// 日志级别；未指定时使用配置文件中的 global.log_level
    #[arg(
        short,
        long,
        value_enum,
        help = "日志级别",
        env = "SERVICE_PANEL_LOG_LEVEL",
        global = true
    )]
    pub log_level: Option<LogLevel>,

    /// 日志文件路径，覆盖配置文件
    #[arg(
        long,
        value_name = "FILE",
        help = "日志文件路径",
        env = "SERVICE_PANEL_LOG_FILE",
        global = true
    )]
    pub log_file: Option<PathBuf>,

    /// 以 JSON 格式输出日志
    #[arg(long, help = "以 JSON 格式输出日志", global = true)]
    pub json_logs: bool,

    /// 执行进程 socket 路径，覆盖配置文件
    #[arg(
        short,
        long,
        value_name = "SOCKET",
        help = "执行进程 socket 路径",
        env = "SERVICE_PANEL_SOCKET",
        global = true
    )]
    pub socket: Option<PathBuf>,

    /// 在当前进程内直接执行命令，不经过执行进程
    #[arg(long, help = "在当前进程内执行命令", global = true)]
    pub local: bool,

    /// 不显示命令执行结果通知
    #[arg(long, help = "不显示执行结果通知", global = true)]
    pub no_notify: bool,

    /// 子命令
    #[command(subcommand)]
    pub command: Commands,
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum LogLevel {
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// 子命令定义
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// 启动特权执行进程
    Serve {
        /// 执行命令使用的 shell，覆盖配置文件
        #[arg(long, value_name = "PATH", help = "执行命令使用的 shell")]
        shell: Option<String>,
    },

    /// 探测并列出所有服务的状态
    List {
        /// 输出格式
        #[arg(short, long, value_enum, default_value = "text", help = "输出格式")]
        format: OutputFormat,
    },

    /// 切换服务：运行中则停止，否则启动
    Toggle {
        /// 服务名称
        #[arg(value_name = "SERVICE", help = "服务名称")]
        service: String,
    },

    /// 显示服务的动作菜单
    Menu {
        /// 服务名称
        #[arg(value_name = "SERVICE", help = "服务名称")]
        service: String,

        /// 同时显示命令内容
        #[arg(long, help = "显示命令内容")]
        show_commands: bool,
    },

    /// 执行服务菜单中的一个动作
    Run {
        /// 服务名称
        #[arg(value_name = "SERVICE", help = "服务名称")]
        service: String,

        /// 动作标签
        #[arg(value_name = "ACTION", help = "动作标签")]
        action: String,
    },

    /// 直接执行一条命令
    Exec {
        /// 命令字符串，原样交给 shell
        #[arg(value_name = "COMMAND", help = "命令字符串")]
        command: String,
    },

    /// 初始化配置文件
    Init {
        /// 配置文件路径
        #[arg(value_name = "FILE", help = "配置文件路径")]
        config_path: Option<PathBuf>,

        /// 是否覆盖现有文件
        #[arg(short, long, help = "覆盖现有文件")]
        force: bool,
    },

    /// 验证配置文件
    Validate {
        /// 配置文件路径
        #[arg(value_name = "FILE", help = "配置文件路径")]
        config_path: Option<PathBuf>,

        /// 是否显示详细信息
        #[arg(short, long, help = "显示详细信息")]
        verbose: bool,
    },

    /// 显示版本信息
    Version {
        /// 输出格式
        #[arg(short, long, value_enum, default_value = "text", help = "输出格式")]
        format: OutputFormat,
    },
}

/// 输出格式枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// 文本格式
    Text,
    /// JSON格式
    Json,
}

impl Args {
    /// 获取配置文件路径
    pub fn get_config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::get_default_config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toggle_with_global_flags() {
        let args = Args::try_parse_from([
            "service-panel",
            "toggle",
            "Samba",
            "--local",
            "--config",
            "/tmp/panel.toml",
        ])
        .unwrap();

        assert!(args.local);
        assert_eq!(args.get_config_path(), PathBuf::from("/tmp/panel.toml"));
        match args.command {
            Commands::Toggle { service } => assert_eq!(service, "Samba"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_run_action_with_spaces() {
        let args = Args::try_parse_from([
            "service-panel",
            "run",
            "Ethernet over USB",
            "Restart networkd",
        ])
        .unwrap();

        match args.command {
            Commands::Run { service, action } => {
                assert_eq!(service, "Ethernet over USB");
                assert_eq!(action, "Restart networkd");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_logging_flags_are_optional() {
        let args = Args::try_parse_from(["service-panel", "list"]).unwrap();
        assert_eq!(args.log_level, None);
        assert_eq!(args.log_file, None);
        assert!(!args.json_logs);

        let args = Args::try_parse_from([
            "service-panel",
            "list",
            "-l",
            "debug",
            "--log-file",
            "/tmp/panel.log",
            "--json-logs",
        ])
        .unwrap();
        assert_eq!(args.log_level, Some(LogLevel::Debug));
        assert_eq!(args.log_file, Some(PathBuf::from("/tmp/panel.log")));
        assert!(args.json_logs);
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(log::LevelFilter::from(LogLevel::Debug), log::LevelFilter::Debug);
        assert_eq!(LogLevel::Warn.to_string(), "warn");
    }
}
