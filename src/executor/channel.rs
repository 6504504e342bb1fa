//! launch 通道实现
//!
//! [`LaunchChannel`] 是面板到执行进程的 RPC 抽象；错误只在通道内部出现，
//! 由 [`super::LaunchExecutor`] 折叠为哨兵结果。

use crate::error::TransportError;
use crate::host::ShellLauncher;
use crate::protocol::{read_json, write_json, LaunchReply, LaunchRequest};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::net::UnixStream;
use tracing::debug;

/// launch RPC 通道
#[async_trait]
pub trait LaunchChannel: Send + Sync {
    /// 发送 `launch(cmd)` 请求并等待响应
    async fn launch(&self, cmd: &str) -> Result<LaunchReply, TransportError>;
}

/// 通过 Unix socket 连接执行服务器的通道
///
/// 每个请求使用一条新连接，因此并发请求之间互不阻塞。
#[derive(Debug, Clone)]
pub struct SocketChannel {
    socket_path: PathBuf,
}

impl SocketChannel {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }
}

#[async_trait]
impl LaunchChannel for SocketChannel {
    async fn launch(&self, cmd: &str) -> Result<LaunchReply, TransportError> {
        let stream =
            UnixStream::connect(&self.socket_path)
                .await
                .map_err(|e| TransportError::Connect {
                    path: self.socket_path.display().to_string(),
                    source: e,
                })?;
        let (mut reader, mut writer) = stream.into_split();

        let request = LaunchRequest::new(cmd);
        debug!(request_id = %request.id, socket = %self.socket_path.display(), "发送 launch 请求");

        write_json(&mut writer, &request).await?;
        read_json(&mut reader).await
    }
}

/// 进程内通道：面板本身已具备权限时直接调用 [`ShellLauncher`]
#[derive(Debug, Clone, Default)]
pub struct InProcessChannel {
    launcher: ShellLauncher,
}

impl InProcessChannel {
    pub fn new(launcher: ShellLauncher) -> Self {
        Self { launcher }
    }
}

#[async_trait]
impl LaunchChannel for InProcessChannel {
    async fn launch(&self, cmd: &str) -> Result<LaunchReply, TransportError> {
        Ok(self.launcher.handle(&LaunchRequest::new(cmd)).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_socket_channel_connect_error() {
        let dir = tempfile::tempdir().unwrap();
        let channel = SocketChannel::new(dir.path().join("missing.sock"));

        let result = channel.launch("true").await;
        assert!(matches!(result, Err(TransportError::Connect { .. })));
    }

    #[tokio::test]
    async fn test_in_process_channel_runs_command() {
        let channel = InProcessChannel::new(ShellLauncher::new("sh"));
        let reply = channel.launch("echo hi").await.unwrap();

        assert!(reply.success);
        let result = reply.result.unwrap();
        assert_eq!(result.retcode, 0);
        assert_eq!(result.stdout, "hi\n");
    }
}
