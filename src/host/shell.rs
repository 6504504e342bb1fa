//! shell 命令执行
//!
//! 特权执行进程一侧：用 `<shell> -c <cmd>` 运行命令并收集输出。
//! 命令字符串不做任何转义或校验。

use crate::error::TransportError;
use crate::logging::LoggingSystem;
use crate::protocol::{LaunchReply, LaunchRequest, LaunchResult};
use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Stdio};
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// 默认 shell
pub const DEFAULT_SHELL: &str = "/usr/bin/bash";

/// 通过 shell 执行命令的启动器
#[derive(Debug, Clone)]
pub struct ShellLauncher {
    shell: String,
}

impl Default for ShellLauncher {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL)
    }
}

impl ShellLauncher {
    /// 创建新的启动器
    ///
    /// # 参数
    /// * `shell` - shell 可执行文件路径
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    /// 运行一条命令并等待其结束
    ///
    /// 没有超时：命令挂起时调用方也会一直等待。
    ///
    /// # 返回
    /// * `Ok(LaunchResult)` - 命令已运行，退出码可能非零
    /// * `Err(TransportError::Spawn)` - shell 无法启动
    pub async fn launch(&self, cmd: &str) -> Result<LaunchResult, TransportError> {
        info!("Running {}", cmd);
        let start = Instant::now();

        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(cmd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| TransportError::Spawn(format!("{}: {}", self.shell, e)))?;

        let result = LaunchResult {
            retcode: exit_code(&output.status),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        LoggingSystem::command_log(cmd, &result, start.elapsed());

        Ok(result)
    }

    /// 处理一条 launch 请求，把启动失败折叠为 `success: false`
    pub async fn handle(&self, request: &LaunchRequest) -> LaunchReply {
        debug!(request_id = %request.id, "处理 launch 请求");
        match self.launch(&request.cmd).await {
            Ok(result) => LaunchReply::completed(result),
            Err(e) => {
                warn!(request_id = %request.id, error = %e, "命令未能启动");
                LaunchReply::failed(e.to_string())
            }
        }
    }
}

/// 退出码；被信号终止时为负的信号值
fn exit_code(status: &ExitStatus) -> i32 {
    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => -signal,
        (None, None) => -1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_launch_captures_output_and_retcode() {
        let launcher = ShellLauncher::new("sh");
        let result = launcher
            .launch("echo out; echo err 1>&2; exit 3")
            .await
            .unwrap();

        assert_eq!(result.retcode, 3);
        assert_eq!(result.stdout, "out\n");
        assert_eq!(result.stderr, "err\n");
    }

    #[tokio::test]
    async fn test_launch_passes_command_verbatim_to_shell() {
        let launcher = ShellLauncher::new("sh");
        let result = launcher.launch("printf '%s' a; printf '%s' b").await.unwrap();

        assert_eq!(result.retcode, 0);
        assert_eq!(result.stdout, "ab");
    }

    #[tokio::test]
    async fn test_killed_by_signal_reports_negative_signal() {
        let launcher = ShellLauncher::new("sh");
        let result = launcher.launch("kill -9 $$").await.unwrap();

        assert_eq!(result.retcode, -9);
    }

    #[tokio::test]
    async fn test_missing_shell_is_spawn_error() {
        let launcher = ShellLauncher::new("/nonexistent/shell");
        let result = launcher.launch("true").await;
        assert!(matches!(result, Err(TransportError::Spawn(_))));
    }

    #[tokio::test]
    async fn test_handle_folds_spawn_error_into_failed_reply() {
        let launcher = ShellLauncher::new("/nonexistent/shell");
        let reply = launcher.handle(&LaunchRequest::new("true")).await;

        assert!(!reply.success);
        assert!(reply.result.is_none());
        assert!(reply.error.is_some());
    }
}
