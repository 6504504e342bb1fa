//! 分离式命令派发
//!
//! 切换和菜单选择都是"发出即忘"：命令在独立任务中执行，调用方可以丢弃
//! 返回的 [`Dispatch`]，也可以等待它拿到结果。执行结果只用于通知，
//! 不会回写条目状态。

use crate::executor::{CommandExecutor, CommandResult};
use crate::notification::Notifier;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::warn;

/// 一次已派发的命令
#[derive(Debug)]
pub struct Dispatch {
    /// 通知中使用的名称
    pub name: String,
    /// 实际执行的命令
    pub command: String,
    handle: JoinHandle<CommandResult>,
}

impl Dispatch {
    /// 等待命令完成
    ///
    /// 执行任务异常退出时返回哨兵结果。
    pub async fn wait(self) -> CommandResult {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => {
                warn!(command = %self.command, error = %e, "命令任务异常结束");
                CommandResult::transport_failure()
            }
        }
    }
}

/// 在独立任务中执行命令，完成后发送通知
pub fn dispatch(
    executor: Arc<dyn CommandExecutor>,
    notifier: Notifier,
    name: impl Into<String>,
    command: impl Into<String>,
) -> Dispatch {
    let name = name.into();
    let command = command.into();

    let task_name = name.clone();
    let task_command = command.clone();
    let handle = tokio::spawn(async move {
        let result = executor.execute(&task_command).await;
        notifier.notify_result(&task_name, &result).await;
        result
    });

    Dispatch {
        name,
        command,
        handle,
    }
}
