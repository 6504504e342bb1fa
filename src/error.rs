//! 错误处理模块
//!
//! 定义应用程序的统一错误类型

use thiserror::Error;

/// Service Panel 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum PanelError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 执行通道相关错误
    #[error("执行通道错误: {0}")]
    Transport(#[from] TransportError),

    /// 通知相关错误
    #[error("通知错误: {0}")]
    Notification(#[from] NotificationError),

    /// 面板中找不到指定服务
    #[error("未找到服务: {name}")]
    ServiceNotFound { name: String },

    /// 菜单中找不到指定动作
    #[error("服务 {service} 中未找到动作: {label}")]
    ActionNotFound { service: String, label: String },

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON序列化/反序列化错误
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 其他错误
    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置文件解析错误
    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),

    /// 配置文件不存在
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    /// 变量替换错误（既不在 [variables] 中，也不在环境变量中）
    #[error("变量替换失败: {var}")]
    VarError { var: String },
}

/// 执行通道错误类型
#[derive(Error, Debug)]
pub enum TransportError {
    /// 无法连接到执行进程
    #[error("无法连接执行进程 {path}: {source}")]
    Connect {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 对端在消息完成前关闭连接
    #[error("连接已关闭")]
    ConnectionClosed,

    /// 消息超出大小限制
    #[error("消息过大: {size} 字节，上限 {max} 字节")]
    MessageTooLarge { size: usize, max: usize },

    /// 消息格式无效
    #[error("无效的消息格式: {0}")]
    InvalidMessage(String),

    /// 读写错误
    #[error("通道IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// 无法启动 shell 进程
    #[error("启动命令失败: {0}")]
    Spawn(String),
}

/// 通知错误类型
#[derive(Error, Debug)]
pub enum NotificationError {
    /// 发送失败
    #[error("通知发送失败: {0}")]
    SendError(String),

    /// 模板渲染错误
    #[error("模板渲染失败: {0}")]
    TemplateError(String),
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, PanelError>;
