//! 命令执行模块
//!
//! 把命令字符串交给特权执行进程，返回结构化结果。执行器永远不会向调用方
//! 返回错误：通道失败统一折叠为退出码 -1 的哨兵结果。

pub mod channel;
pub mod result;

pub use channel::{InProcessChannel, LaunchChannel, SocketChannel};
pub use result::{CommandResult, TRANSPORT_FAILURE_EXIT_CODE};

use async_trait::async_trait;
use std::time::Instant;
use tracing::{info, warn};

/// 命令执行器trait
///
/// 无超时、无取消、无重试；命令字符串原样传递。
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// 执行一条命令
    ///
    /// # 参数
    /// * `command` - 命令字符串
    ///
    /// # 返回
    /// * `CommandResult` - 执行结果；通道失败时为哨兵结果
    async fn execute(&self, command: &str) -> CommandResult;
}

/// 基于 launch 通道的执行器
pub struct LaunchExecutor<C> {
    channel: C,
}

impl<C: LaunchChannel> LaunchExecutor<C> {
    pub fn new(channel: C) -> Self {
        Self { channel }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }
}

#[async_trait]
impl<C: LaunchChannel> CommandExecutor for LaunchExecutor<C> {
    async fn execute(&self, command: &str) -> CommandResult {
        let start = Instant::now();

        let result = match self.channel.launch(command).await {
            Ok(reply) if reply.success => match reply.result {
                Some(result) => CommandResult::from(result),
                None => {
                    warn!(command, "执行进程返回成功但没有结果");
                    CommandResult::transport_failure()
                }
            },
            Ok(reply) => {
                warn!(
                    command,
                    error = reply.error.as_deref().unwrap_or(""),
                    "执行进程报告失败"
                );
                CommandResult::transport_failure()
            }
            Err(e) => {
                warn!(command, error = %e, "无法连接执行进程");
                CommandResult::transport_failure()
            }
        };

        info!(
            command,
            exit_code = result.exit_code,
            duration_ms = start.elapsed().as_millis() as u64,
            "命令执行完成"
        );

        result
    }
}
