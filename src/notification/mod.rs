//! 通知模块
//!
//! 命令执行完成后的用户提示：接收端抽象和消息模板

pub mod sender;
pub mod template;

// 重新导出主要类型
pub use sender::{ConsoleSink, NoOpSink, Notification, NotificationSink, Notifier};
pub use template::NotificationTemplate;
