//! 特权执行进程模块
//!
//! 运行在宿主一侧，负责真正执行 shell 命令

pub mod server;
pub mod shell;

pub use server::LaunchServer;
pub use shell::{ShellLauncher, DEFAULT_SHELL};
