//! 服务控制面板
//!
//! 面板按配置顺序为每个服务描述符创建一个控制条目，本身不含逻辑

pub mod dispatch;
pub mod entry;
pub mod host;
pub mod menu;

pub use dispatch::Dispatch;
pub use entry::ServiceControlEntry;
pub use host::{ConsoleMenuHost, MenuHost};
pub use menu::{menu_items, ActionMenu, MenuItem};

use crate::config::{PanelConfig, ServiceDescriptor};
use crate::error::{PanelError, Result};
use crate::executor::CommandExecutor;
use crate::notification::Notifier;
use crate::status::ServiceState;
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// 条目状态快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySnapshot {
    pub name: String,
    pub state: ServiceState,
}

/// 服务控制面板
#[derive(Debug)]
pub struct Panel {
    entries: Vec<ServiceControlEntry>,
}

impl Panel {
    /// 根据配置创建面板
    ///
    /// # 参数
    /// * `config` - 面板配置，描述符按声明顺序实例化
    /// * `executor` - 所有条目共享的命令执行器
    /// * `notifier` - 所有条目共享的通知器
    pub fn new(config: &PanelConfig, executor: Arc<dyn CommandExecutor>, notifier: Notifier) -> Self {
        Self::from_descriptors(
            config.services.clone(),
            executor,
            notifier,
            config.global.menu.include_canonical,
        )
    }

    /// 直接由描述符列表创建面板
    pub fn from_descriptors(
        descriptors: Vec<ServiceDescriptor>,
        executor: Arc<dyn CommandExecutor>,
        notifier: Notifier,
        include_canonical: bool,
    ) -> Self {
        let entries = descriptors
            .into_iter()
            .map(|descriptor| {
                ServiceControlEntry::new(
                    descriptor,
                    Arc::clone(&executor),
                    notifier.clone(),
                    include_canonical,
                )
            })
            .collect();

        Self { entries }
    }

    /// 挂载所有条目，每个条目在后台探测一次状态
    pub fn mount(&self) -> Vec<JoinHandle<()>> {
        info!(entries = self.entries.len(), "挂载面板");
        self.entries.iter().map(|entry| entry.mount()).collect()
    }

    /// 并发刷新所有条目并返回快照
    pub async fn refresh_all(&self) -> Vec<EntrySnapshot> {
        let states = join_all(self.entries.iter().map(|entry| entry.refresh())).await;

        self.entries
            .iter()
            .zip(states)
            .map(|(entry, state)| EntrySnapshot {
                name: entry.name().to_string(),
                state,
            })
            .collect()
    }

    /// 当前展示状态的快照（不触发探测）
    pub async fn snapshot(&self) -> Vec<EntrySnapshot> {
        let mut snapshots = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            snapshots.push(EntrySnapshot {
                name: entry.name().to_string(),
                state: entry.state().await,
            });
        }
        snapshots
    }

    pub fn entries(&self) -> &[ServiceControlEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按名称查找条目（名称重复时返回第一个）
    pub fn entry(&self, name: &str) -> Option<&ServiceControlEntry> {
        self.entries.iter().find(|entry| entry.name() == name)
    }

    /// 按名称查找条目，找不到时返回错误
    pub fn require_entry(&self, name: &str) -> Result<&ServiceControlEntry> {
        self.entry(name).ok_or_else(|| PanelError::ServiceNotFound {
            name: name.to_string(),
        })
    }

    /// 卸载面板
    ///
    /// 尚未完成的探测结果会被丢弃，已发出的命令继续执行。
    pub fn unmount(self) {
        info!(entries = self.entries.len(), "卸载面板");
        drop(self.entries);
    }
}
