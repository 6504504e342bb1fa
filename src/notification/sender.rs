//! 通知发送器模块
//!
//! 定义通知接收端的trait和基础实现

use crate::executor::CommandResult;
use crate::notification::template::NotificationTemplate;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// 通知消息结构
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// 消息标题
    pub title: String,
    /// 消息内容
    pub body: String,
}

/// 通知接收端trait
///
/// 由宿主提供，负责把通知展示给用户（toast、终端输出等）。
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// 发送通知
    ///
    /// # 参数
    /// * `notification` - 通知消息
    ///
    /// # 返回
    /// * `Result<()>` - 发送结果
    async fn send(&self, notification: &Notification) -> Result<()>;
}

/// 空的通知接收端（用于测试或禁用通知）
pub struct NoOpSink;

#[async_trait]
impl NotificationSink for NoOpSink {
    async fn send(&self, _notification: &Notification) -> Result<()> {
        Ok(())
    }
}

/// 输出到终端的通知接收端
pub struct ConsoleSink;

#[async_trait]
impl NotificationSink for ConsoleSink {
    async fn send(&self, notification: &Notification) -> Result<()> {
        println!("{}", notification.title);
        let body = notification.body.trim();
        if !body.is_empty() {
            println!("{}", body);
        }
        Ok(())
    }
}

/// 通知器：渲染模板并投递到接收端
///
/// 投递是尽力而为的，失败只记录日志，不会影响调用方。
#[derive(Clone)]
pub struct Notifier {
    sink: Arc<dyn NotificationSink>,
    template: Option<Arc<NotificationTemplate>>,
    enabled: bool,
}

impl Notifier {
    pub fn new(sink: Arc<dyn NotificationSink>, template: NotificationTemplate) -> Self {
        Self {
            sink,
            template: Some(Arc::new(template)),
            enabled: true,
        }
    }

    /// 不发送任何通知的通知器，没有模板，重新启用也不会发送
    pub fn disabled() -> Self {
        Self {
            sink: Arc::new(NoOpSink),
            template: None,
            enabled: false,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// 发送一次命令执行结果的通知
    pub async fn notify_result(&self, name: &str, result: &CommandResult) {
        let Some(template) = self.template.as_ref().filter(|_| self.enabled) else {
            return;
        };

        let notification = match template.render(name, result) {
            Ok(notification) => notification,
            Err(e) => {
                warn!(name, error = %e, "通知渲染失败");
                return;
            }
        };

        if let Err(e) = self.sink.send(&notification).await {
            warn!(name, error = %e, "通知发送失败");
        }
    }
}
