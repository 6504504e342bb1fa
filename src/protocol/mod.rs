//! launch 通道协议模块
//!
//! 面板与特权执行进程之间唯一的协议边界：
//! 请求 `{ cmd }`，响应 `{ success, result?: { retcode, stdout, stderr } }`。
//!
//! ## 帧格式
//!
//! ```text
//! [4 字节: 长度 (大端 u32)][JSON 载荷]
//! ```

pub mod message;
pub mod wire;

pub use message::{LaunchReply, LaunchRequest, LaunchResult, TRUNCATION_MARKER};
pub use wire::{read_json, read_message, write_json, write_message, MAX_MESSAGE_SIZE};
