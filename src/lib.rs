//! Service Panel - 服务控制面板
//!
//! 为一组固定的系统服务提供控制面板：
//! - 挂载时通过状态命令探测服务是否运行
//! - 一键切换启动/停止
//! - 每个服务的动作菜单
//! - 命令交给特权执行进程运行，结果以通知形式展示

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod host;
pub mod logging;
pub mod notification;
pub mod panel;
pub mod protocol;
pub mod status;

// 重新导出主要类型
pub use config::{PanelConfig, ServiceDescriptor};
pub use error::PanelError;
pub use executor::{CommandExecutor, CommandResult};
pub use panel::{Panel, ServiceControlEntry};
pub use status::{ServiceState, StatusProbe};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
