//! Unix socket 执行服务器
//!
//! 监听 socket，逐条读取 `LaunchRequest`，用 [`ShellLauncher`] 执行并回写
//! `LaunchReply`。每个连接一个任务，同一连接上可以连续发送多条请求。

use crate::error::{PanelError, Result, TransportError};
use crate::host::shell::ShellLauncher;
use crate::protocol::{read_json, write_json, LaunchRequest, MAX_MESSAGE_SIZE};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// socket 文件权限：属主和属组可读写
pub const SOCKET_MODE: u32 = 0o660;

/// 执行服务器
pub struct LaunchServer {
    listener: UnixListener,
    socket_path: PathBuf,
    launcher: Arc<ShellLauncher>,
    requests_total: Arc<AtomicU64>,
}

impl LaunchServer {
    /// 绑定 socket
    ///
    /// 已存在的 socket 文件会被删除；如果该路径是符号链接则拒绝。
    pub fn bind(socket_path: &Path, launcher: ShellLauncher) -> Result<Self> {
        if let Ok(metadata) = std::fs::symlink_metadata(socket_path) {
            if metadata.file_type().is_symlink() {
                return Err(PanelError::Other(anyhow::anyhow!(
                    "socket 路径 {} 是符号链接，拒绝删除",
                    socket_path.display()
                )));
            }
            std::fs::remove_file(socket_path)?;
        }

        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let listener = UnixListener::bind(socket_path).map_err(|e| TransportError::Connect {
            path: socket_path.display().to_string(),
            source: e,
        })?;

        std::fs::set_permissions(socket_path, std::fs::Permissions::from_mode(SOCKET_MODE))?;

        info!(
            socket = %socket_path.display(),
            shell = launcher.shell(),
            "执行服务器已绑定"
        );

        Ok(Self {
            listener,
            socket_path: socket_path.to_path_buf(),
            launcher: Arc::new(launcher),
            requests_total: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// 已处理的请求总数
    pub fn requests_total(&self) -> u64 {
        self.requests_total.load(Ordering::Relaxed)
    }

    /// 接受连接直到收到关闭信号
    ///
    /// 关闭时不会中止正在执行的命令，已派发的连接任务会继续运行到结束。
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, _addr)) => {
                            let launcher = Arc::clone(&self.launcher);
                            let counter = Arc::clone(&self.requests_total);
                            tokio::spawn(async move {
                                if let Err(e) = handle_connection(stream, launcher, counter).await {
                                    warn!(error = %e, "连接处理失败");
                                }
                            });
                        }
                        Err(e) => {
                            error!(error = %e, "接受连接失败");
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("执行服务器收到关闭信号");
                    break;
                }
            }
        }

        if let Err(e) = std::fs::remove_file(&self.socket_path) {
            debug!(error = %e, "删除 socket 文件失败");
        }

        info!(requests = self.requests_total(), "执行服务器已停止");
        Ok(())
    }
}

/// 处理单个客户端连接
async fn handle_connection(
    stream: UnixStream,
    launcher: Arc<ShellLauncher>,
    counter: Arc<AtomicU64>,
) -> std::result::Result<(), TransportError> {
    let (mut reader, mut writer) = stream.into_split();

    loop {
        let request: LaunchRequest = match read_json(&mut reader).await {
            Ok(request) => request,
            Err(TransportError::ConnectionClosed) => {
                debug!("客户端已断开");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        counter.fetch_add(1, Ordering::Relaxed);
        let reply = launcher.handle(&request).await.fit_within(MAX_MESSAGE_SIZE);
        write_json(&mut writer, &reply).await?;
    }
}
