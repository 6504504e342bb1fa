//! 执行进程端到端测试
//!
//! 启动真实的 socket 服务器，通过 SocketChannel 发送命令

#![cfg(unix)]

use service_panel::executor::{CommandExecutor, LaunchExecutor, SocketChannel};
use service_panel::host::{LaunchServer, ShellLauncher};
use service_panel::protocol::{MAX_MESSAGE_SIZE, TRUNCATION_MARKER};
use service_panel::status::StatusProbe;
use std::sync::Arc;
use tokio::sync::broadcast;

#[tokio::test]
async fn test_socket_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("run").join("launch.sock");

    let server = LaunchServer::bind(&socket, ShellLauncher::new("sh")).unwrap();
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let server_task = tokio::spawn(server.run(shutdown_rx));

    let executor = LaunchExecutor::new(SocketChannel::new(&socket));

    let result = executor.execute("echo hi; echo oops >&2; exit 3").await;
    assert_eq!(result.exit_code, 3);
    assert_eq!(result.stdout, "hi\n");
    assert_eq!(result.stderr, "oops\n");

    let probe = StatusProbe::new(Arc::new(LaunchExecutor::new(SocketChannel::new(&socket))));
    assert!(probe.probe(Some("echo '  active  '"), Some("active")).await);
    assert!(!probe.probe(Some("echo active; exit 3"), Some("active")).await);

    shutdown_tx.send(()).unwrap();
    server_task.await.unwrap().unwrap();
    assert!(!socket.exists());
}

#[tokio::test]
async fn test_missing_socket_yields_sentinel() {
    let dir = tempfile::tempdir().unwrap();
    let executor = LaunchExecutor::new(SocketChannel::new(dir.path().join("absent.sock")));

    let result = executor.execute("echo hi").await;
    assert_eq!(result.exit_code, -1);
    assert!(result.stdout.is_empty());
    assert!(result.stderr.is_empty());
}

#[tokio::test]
async fn test_unknown_shell_yields_sentinel() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("launch.sock");

    let server =
        LaunchServer::bind(&socket, ShellLauncher::new("/nonexistent/shell-binary")).unwrap();
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let server_task = tokio::spawn(server.run(shutdown_rx));

    let executor = LaunchExecutor::new(SocketChannel::new(&socket));
    let result = executor.execute("echo hi").await;
    assert_eq!(result.exit_code, -1);

    shutdown_tx.send(()).unwrap();
    server_task.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_oversized_output_still_gets_reply() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("launch.sock");

    let server = LaunchServer::bind(&socket, ShellLauncher::new("sh")).unwrap();
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let server_task = tokio::spawn(server.run(shutdown_rx));

    let executor = LaunchExecutor::new(SocketChannel::new(&socket));
    let result = executor
        .execute("head -c 5000000 /dev/zero | tr '\\0' a; echo done >&2; exit 0")
        .await;
    assert_eq!(result.exit_code, 0);
    assert!(result.stdout.starts_with("aaaa"));
    assert!(result.stdout.ends_with(TRUNCATION_MARKER));
    assert!(result.stdout.len() < MAX_MESSAGE_SIZE);
    assert_eq!(result.stderr, "done\n");

    shutdown_tx.send(()).unwrap();
    server_task.await.unwrap().unwrap();
}
