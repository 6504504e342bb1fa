//! 消息模板模块
//!
//! 用 Handlebars 渲染命令执行完成后的通知标题和正文

use crate::error::NotificationError;
use crate::executor::CommandResult;
use crate::notification::sender::Notification;
use handlebars::Handlebars;
use serde_json::json;

const TITLE: &str = "title";
const BODY: &str = "body";

/// 默认标题模板
pub fn default_title_template() -> String {
    "Executed {{name}} {{#if success}}successfully{{else}}with error {{exit_code}}{{/if}}"
        .to_string()
}

/// 默认正文模板：stdout 与 stderr 以空格拼接
pub fn default_body_template() -> String {
    "{{stdout}} {{stderr}}".to_string()
}

/// 通知模板
///
/// 可用变量: `name`, `success`, `exit_code`, `stdout`, `stderr`, `timestamp`
pub struct NotificationTemplate {
    registry: Handlebars<'static>,
}

impl std::fmt::Debug for NotificationTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationTemplate").finish_non_exhaustive()
    }
}

impl NotificationTemplate {
    /// 创建模板，模板语法错误时返回错误
    ///
    /// # 参数
    /// * `title` - 标题模板
    /// * `body` - 正文模板
    pub fn new(title: &str, body: &str) -> Result<Self, NotificationError> {
        let mut registry = Handlebars::new();
        // 命令输出原样展示，不做 HTML 转义
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string(TITLE, title)
            .map_err(|e| NotificationError::TemplateError(format!("标题模板: {}", e)))?;
        registry
            .register_template_string(BODY, body)
            .map_err(|e| NotificationError::TemplateError(format!("正文模板: {}", e)))?;

        Ok(Self { registry })
    }

    /// 内置模板
    pub fn with_defaults() -> Result<Self, NotificationError> {
        Self::new(&default_title_template(), &default_body_template())
    }

    /// 根据可选的自定义模板构建，缺失部分使用默认值
    pub fn from_overrides(
        title: Option<&str>,
        body: Option<&str>,
    ) -> Result<Self, NotificationError> {
        let title = title.map(str::to_string).unwrap_or_else(default_title_template);
        let body = body.map(str::to_string).unwrap_or_else(default_body_template);
        Self::new(&title, &body)
    }

    /// 渲染一次命令执行的通知
    ///
    /// # 参数
    /// * `name` - 命令在界面上的名称（动作标签或 `tag:start` 等）
    /// * `result` - 执行结果
    pub fn render(
        &self,
        name: &str,
        result: &CommandResult,
    ) -> Result<Notification, NotificationError> {
        let context = json!({
            "name": name,
            "success": result.is_success(),
            "exit_code": result.exit_code,
            "stdout": result.stdout,
            "stderr": result.stderr,
            "timestamp": chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        });

        let title = self
            .registry
            .render(TITLE, &context)
            .map_err(|e| NotificationError::TemplateError(e.to_string()))?;
        let body = self
            .registry
            .render(BODY, &context)
            .map_err(|e| NotificationError::TemplateError(e.to_string()))?;

        Ok(Notification { title, body })
    }
}
