//! 配置数据结构定义
//!
//! 定义面板配置、服务描述符和验证逻辑

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// 主配置结构，包含全局配置、变量表和服务描述符列表
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PanelConfig {
    /// 全局配置项
    #[serde(default)]
    pub global: GlobalConfig,
    /// 命令字符串中可引用的变量（`${name}`）
    #[serde(default)]
    pub variables: HashMap<String, String>,
    /// 服务描述符列表，按声明顺序展示
    #[serde(default)]
    pub services: Vec<ServiceDescriptor>,
}

/// 全局配置结构
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlobalConfig {
    /// 执行进程监听的 Unix socket 路径
    #[serde(default = "default_socket_path")]
    pub socket_path: PathBuf,
    /// 日志级别，命令行未指定 `--log-level` 时使用
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// 日志文件路径，设置后日志写入文件而不是 stderr
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// 是否以 JSON 格式输出日志
    #[serde(default)]
    pub json_logs: bool,
    /// 执行 shell 的路径
    #[serde(default = "default_shell")]
    pub shell: String,
    /// 通知配置
    #[serde(default)]
    pub notification: NotificationConfig,
    /// 菜单配置
    #[serde(default)]
    pub menu: MenuConfig,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            log_level: default_log_level(),
            log_file: None,
            json_logs: false,
            shell: default_shell(),
            notification: NotificationConfig::default(),
            menu: MenuConfig::default(),
        }
    }
}

/// 通知配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationConfig {
    /// 命令执行完成后是否发送通知
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// 标题模板（Handlebars）
    pub title_template: Option<String>,
    /// 正文模板（Handlebars）
    pub body_template: Option<String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            title_template: None,
            body_template: None,
        }
    }
}

/// 菜单配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuConfig {
    /// 菜单中是否同时列出状态/启动/停止命令
    ///
    /// 这些命令的位置由带 `role` 的动作决定；没有对应动作的排在最前面。
    #[serde(default = "default_enabled")]
    pub include_canonical: bool,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            include_canonical: default_enabled(),
        }
    }
}

/// 服务描述符：一个可控制的服务条目
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ServiceDescriptor {
    /// 显示名称
    pub name: String,
    /// 状态查询命令
    pub status_command: Option<String>,
    /// 状态命令的期望输出（去除首尾空白后比较）
    pub expected_status_output: Option<String>,
    /// 启动命令
    #[serde(default)]
    pub start_command: String,
    /// 停止命令
    #[serde(default)]
    pub stop_command: String,
    /// 菜单项，按声明顺序展示
    #[serde(default)]
    pub actions: Vec<ActionConfig>,
}

impl ServiceDescriptor {
    /// 返回可用于探测的（命令, 期望输出）对；任一缺失或为空时返回 None
    pub fn probe_pair(&self) -> Option<(&str, &str)> {
        match (
            non_empty(&self.status_command),
            non_empty(&self.expected_status_output),
        ) {
            (Some(cmd), Some(expected)) => Some((cmd, expected)),
            _ => None,
        }
    }

    /// 是否只配置了状态命令或期望输出中的一个
    pub fn has_partial_probe(&self) -> bool {
        non_empty(&self.status_command).is_some()
            != non_empty(&self.expected_status_output).is_some()
    }

    /// 某个角色对应的命令，未配置时返回 None
    pub fn role_command(&self, role: ActionRole) -> Option<&str> {
        let command = match role {
            ActionRole::Status => self.status_command.as_deref().unwrap_or(""),
            ActionRole::Start => self.start_command.as_str(),
            ActionRole::Stop => self.stop_command.as_str(),
        };
        (!command.is_empty()).then_some(command)
    }

    /// 把带角色且自带命令的菜单项合并到状态/启动/停止字段
    ///
    /// 字段已有不同的值时返回错误。
    pub fn apply_roles(&mut self) -> Result<(), String> {
        for action in &self.actions {
            let Some(role) = action.role else {
                if action.expected_output.is_some() {
                    return Err(format!(
                        "服务 {} 的动作 {} 没有 role，不能设置 expected_output",
                        self.name, action.label
                    ));
                }
                continue;
            };

            match role {
                ActionRole::Status => {
                    merge_optional(&mut self.status_command, &action.command, &self.name, role)?;
                    if let Some(expected) = &action.expected_output {
                        merge_optional(
                            &mut self.expected_status_output,
                            expected,
                            &self.name,
                            role,
                        )?;
                    }
                }
                ActionRole::Start | ActionRole::Stop => {
                    if action.expected_output.is_some() {
                        return Err(format!(
                            "服务 {} 的 {} 动作不能设置 expected_output",
                            self.name, role
                        ));
                    }
                    let slot = if role == ActionRole::Start {
                        &mut self.start_command
                    } else {
                        &mut self.stop_command
                    };
                    merge(slot, &action.command, &self.name, role)?;
                }
            }
        }
        Ok(())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn merge(slot: &mut String, value: &str, service: &str, role: ActionRole) -> Result<(), String> {
    if value.is_empty() || slot == value {
        return Ok(());
    }
    if !slot.is_empty() {
        return Err(format!("服务 {} 的 {} 命令定义了两次且不一致", service, role));
    }
    *slot = value.to_string();
    Ok(())
}

fn merge_optional(
    slot: &mut Option<String>,
    value: &str,
    service: &str,
    role: ActionRole,
) -> Result<(), String> {
    let mut current = slot.take().unwrap_or_default();
    let merged = merge(&mut current, value, service, role);
    *slot = (!current.is_empty()).then_some(current);
    merged
}

/// 菜单项的角色
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActionRole {
    Status,
    Start,
    Stop,
}

impl ActionRole {
    pub const ALL: [ActionRole; 3] = [ActionRole::Status, ActionRole::Start, ActionRole::Stop];

    /// 未指定标签时菜单上显示的文字
    pub fn default_label(&self) -> &'static str {
        match self {
            ActionRole::Status => "Status",
            ActionRole::Start => "Start",
            ActionRole::Stop => "Stop",
        }
    }
}

impl std::fmt::Display for ActionRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionRole::Status => write!(f, "status"),
            ActionRole::Start => write!(f, "start"),
            ActionRole::Stop => write!(f, "stop"),
        }
    }
}

/// 菜单项配置
///
/// 没有 `role` 的是普通动作。带 `role` 的项标记状态/启动/停止命令在菜单中的
/// 位置；它自带的命令（和状态项的 `expected_output`）会合并到描述符对应字段。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ActionConfig {
    /// 菜单标签，带角色时可省略
    #[serde(default)]
    pub label: String,
    /// 要执行的命令，带角色时可省略
    #[serde(default)]
    pub command: String,
    /// 角色
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ActionRole>,
    /// 状态项的期望输出
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,
}

impl ActionConfig {
    pub fn new(label: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            command: command.into(),
            ..Default::default()
        }
    }

    /// 只标记位置的角色项，命令取自描述符
    pub fn role(role: ActionRole) -> Self {
        Self {
            role: Some(role),
            ..Default::default()
        }
    }

    /// 菜单上显示的标签
    pub fn display_label(&self) -> &str {
        match self.role {
            Some(role) if self.label.is_empty() => role.default_label(),
            _ => &self.label,
        }
    }
}

// 默认值函数
fn default_socket_path() -> PathBuf {
    dirs::runtime_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("service-panel")
        .join("launch.sock")
}
fn default_log_level() -> String {
    "warn".to_string()
}
fn default_shell() -> String {
    "/usr/bin/bash".to_string()
}
fn default_enabled() -> bool {
    true
}

/// 配置验证函数
///
/// 命令字符串本身不做校验，只检查结构上的问题。
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &PanelConfig) -> Result<(), String> {
    if crate::logging::parse_level(&config.global.log_level).is_none() {
        return Err(format!(
            "无效的日志级别: {}，支持的级别: off, error, warn, info, debug, trace",
            config.global.log_level
        ));
    }

    if config.global.shell.trim().is_empty() {
        return Err("shell 路径不能为空".to_string());
    }

    if config.global.socket_path.as_os_str().is_empty() {
        return Err("socket 路径不能为空".to_string());
    }

    for service in &config.services {
        if service.name.trim().is_empty() {
            return Err("服务名称不能为空".to_string());
        }

        if service.start_command.trim().is_empty() {
            return Err(format!("服务 {} 缺少启动命令", service.name));
        }
        if service.stop_command.trim().is_empty() {
            return Err(format!("服务 {} 缺少停止命令", service.name));
        }

        for action in service.actions.iter().filter(|a| a.role.is_none()) {
            if action.label.trim().is_empty() {
                return Err(format!("服务 {} 存在空的动作标签", service.name));
            }
            if action.command.trim().is_empty() {
                return Err(format!("服务 {} 的动作 {} 缺少命令", service.name, action.label));
            }
        }
    }

    Ok(())
}
