//! 状态探测
//!
//! 运行状态命令，把去除首尾空白后的 stdout 与期望值做精确比较

use crate::executor::CommandExecutor;
use std::sync::Arc;
use tracing::debug;

/// 状态探测器
#[derive(Clone)]
pub struct StatusProbe {
    executor: Arc<dyn CommandExecutor>,
}

impl StatusProbe {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    /// 探测服务是否处于运行状态
    ///
    /// 命令或期望值任一缺失（或为空字符串）时直接返回 `false`，不会发出任何命令。
    /// 否则执行一次命令，当且仅当退出码为 0 且 `stdout.trim() == expected`
    /// 时返回 `true`。
    ///
    /// # 参数
    /// * `status_command` - 状态查询命令
    /// * `expected` - 期望输出
    pub async fn probe(&self, status_command: Option<&str>, expected: Option<&str>) -> bool {
        let present = |value: &&str| !value.is_empty();
        let (Some(command), Some(expected)) =
            (status_command.filter(present), expected.filter(present))
        else {
            return false;
        };

        let result = self.executor.execute(command).await;
        let active = matches_expected(result.exit_code, &result.stdout, expected);

        debug!(
            command,
            exit_code = result.exit_code,
            expected,
            active,
            "状态探测完成"
        );

        active
    }
}

/// 判断一次命令结果是否表示运行中
pub fn matches_expected(exit_code: i32, stdout: &str, expected: &str) -> bool {
    exit_code == 0 && stdout.trim() == expected
}
