//! launch 通道的请求/响应类型

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 请求执行进程运行一条命令
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LaunchRequest {
    /// 请求ID，仅用于日志关联
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// 原样交给 shell 的命令字符串
    pub cmd: String,
}

impl LaunchRequest {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            cmd: cmd.into(),
        }
    }
}

/// 执行进程返回的命令结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LaunchResult {
    /// 退出码；被信号终止时为负的信号值
    pub retcode: i32,
    pub stdout: String,
    pub stderr: String,
}

/// 输出被截断时追加的标记
pub const TRUNCATION_MARKER: &str = "\n[output truncated]";

/// 执行进程的响应
///
/// `success == false` 表示命令根本没有运行起来（例如 shell 无法启动），
/// 此时 `result` 为空。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LaunchReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<LaunchResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LaunchReply {
    /// 命令已运行（无论退出码如何）
    pub fn completed(result: LaunchResult) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    /// 命令未能运行
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(message.into()),
        }
    }

    /// 截断输出，使序列化后的响应不超过 `max_size` 字节
    ///
    /// 退出码保持不变，每次截断 stdout 和 stderr 中较长的一个。
    pub fn fit_within(mut self, max_size: usize) -> Self {
        for _ in 0..8 {
            let size = match serde_json::to_vec(&self) {
                Ok(bytes) => bytes.len(),
                Err(_) => return self,
            };
            if size <= max_size {
                return self;
            }

            let Some(result) = self.result.as_mut() else {
                return self;
            };
            let output = if result.stdout.len() >= result.stderr.len() {
                &mut result.stdout
            } else {
                &mut result.stderr
            };
            if output.is_empty() {
                return self;
            }
            truncate_output(output, size - max_size);
        }
        self
    }
}

/// 从尾部去掉至少 `excess` 字节并追加截断标记
fn truncate_output(output: &mut String, excess: usize) {
    let mut keep = output.len().saturating_sub(excess + TRUNCATION_MARKER.len());
    while !output.is_char_boundary(keep) {
        keep -= 1;
    }
    output.truncate(keep);
    output.push_str(TRUNCATION_MARKER);
}
