//! 命令执行结果

use crate::protocol::LaunchResult;
use serde::{Deserialize, Serialize};

/// 执行通道不可达时使用的哨兵退出码
pub const TRANSPORT_FAILURE_EXIT_CODE: i32 = -1;

/// 一次命令执行的结果，只在触发它的调用内有效
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    /// 退出码
    pub exit_code: i32,
    /// 标准输出
    pub stdout: String,
    /// 标准错误
    pub stderr: String,
}

impl CommandResult {
    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// 通道失败的哨兵结果：退出码 -1，输出为空
    pub fn transport_failure() -> Self {
        Self::new(TRANSPORT_FAILURE_EXIT_CODE, "", "")
    }

    /// 退出码是否为 0
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    /// stdout 与 stderr 以空格拼接，用作通知正文
    pub fn combined_output(&self) -> String {
        format!("{} {}", self.stdout, self.stderr)
    }
}

impl From<LaunchResult> for CommandResult {
    fn from(result: LaunchResult) -> Self {
        Self {
            exit_code: result.retcode,
            stdout: result.stdout,
            stderr: result.stderr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_failure_sentinel() {
        let result = CommandResult::transport_failure();
        assert_eq!(result.exit_code, -1);
        assert!(result.stdout.is_empty());
        assert!(result.stderr.is_empty());
        assert!(!result.is_success());
    }

    #[test]
    fn test_combined_output() {
        let result = CommandResult::new(1, "out", "err");
        assert_eq!(result.combined_output(), "out err");
    }
}
