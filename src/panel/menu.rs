//! 动作菜单
//!
//! 按声明顺序列出条目的命令，选择一项即执行对应命令

use crate::config::{ActionRole, ServiceDescriptor};
use crate::executor::CommandExecutor;
use crate::notification::Notifier;
use crate::panel::dispatch::{dispatch, Dispatch};
use serde::Serialize;
use std::sync::Arc;

/// 菜单项
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: String,
    pub command: String,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            command: command.into(),
        }
    }
}

/// 根据描述符生成菜单项
///
/// 菜单项按声明顺序排列。带角色的项使用描述符中对应的命令；
/// `include_canonical` 为假时跳过这些项。状态/启动/停止命令存在但没有
/// 对应角色项时，按 Status/Start/Stop 的顺序排在最前面。不去重。
pub fn menu_items(descriptor: &ServiceDescriptor, include_canonical: bool) -> Vec<MenuItem> {
    let mut items = Vec::with_capacity(descriptor.actions.len() + 3);

    if include_canonical {
        for role in ActionRole::ALL {
            let positioned = descriptor.actions.iter().any(|a| a.role == Some(role));
            if positioned {
                continue;
            }
            if let Some(command) = descriptor.role_command(role) {
                items.push(MenuItem::new(role.default_label(), command));
            }
        }
    }

    for action in &descriptor.actions {
        match action.role {
            None => items.push(MenuItem::new(action.label.clone(), action.command.clone())),
            Some(_) if !include_canonical => {}
            Some(role) => {
                let command = if action.command.is_empty() {
                    descriptor.role_command(role)
                } else {
                    Some(action.command.as_str())
                };
                if let Some(command) = command {
                    items.push(MenuItem::new(action.display_label(), command));
                }
            }
        }
    }

    items
}

/// 一个条目的动作菜单
#[derive(Clone)]
pub struct ActionMenu {
    label: String,
    items: Vec<MenuItem>,
    executor: Arc<dyn CommandExecutor>,
    notifier: Notifier,
}

impl ActionMenu {
    pub fn new(
        label: impl Into<String>,
        items: Vec<MenuItem>,
        executor: Arc<dyn CommandExecutor>,
        notifier: Notifier,
    ) -> Self {
        Self {
            label: label.into(),
            items,
            executor,
            notifier,
        }
    }

    /// 菜单标题（服务名称）
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// 渲染为可选择的文本行，序号从 1 开始
    pub fn render(&self) -> Vec<String> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}. {}", i + 1, item.label))
            .collect()
    }

    /// 选择第 `index` 项（从 0 开始）并执行
    pub fn select(&self, index: usize) -> Option<Dispatch> {
        self.items.get(index).map(|item| self.run(item))
    }

    /// 按标签选择第一个匹配项并执行
    pub fn select_label(&self, label: &str) -> Option<Dispatch> {
        self.items
            .iter()
            .find(|item| item.label == label)
            .map(|item| self.run(item))
    }

    fn run(&self, item: &MenuItem) -> Dispatch {
        dispatch(
            Arc::clone(&self.executor),
            self.notifier.clone(),
            item.label.clone(),
            item.command.clone(),
        )
    }
}

impl std::fmt::Debug for ActionMenu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionMenu")
            .field("label", &self.label)
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}
