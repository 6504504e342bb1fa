//! 服务控制条目
//!
//! 一个条目对应一个 [`ServiceDescriptor`]，持有运行时状态并提供切换与菜单动作。
//!
//! 状态只在挂载（或显式刷新）时探测一次。切换不会更新状态，所以切换后界面
//! 显示的仍是旧状态，直到重新挂载。挂载探测与用户切换之间没有顺序保证。

use crate::config::ServiceDescriptor;
use crate::executor::CommandExecutor;
use crate::notification::Notifier;
use crate::panel::dispatch::{dispatch, Dispatch};
use crate::panel::host::MenuHost;
use crate::panel::menu::{menu_items, ActionMenu};
use crate::status::{ServiceRuntimeState, ServiceState, StatusProbe};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;

/// 切换为启动时通知中使用的名称
pub const START_NOTIFICATION_NAME: &str = "tag:start";
/// 切换为停止时通知中使用的名称
pub const STOP_NOTIFICATION_NAME: &str = "tag:stop";

/// 服务控制条目
pub struct ServiceControlEntry {
    descriptor: Arc<ServiceDescriptor>,
    state: Arc<RwLock<ServiceRuntimeState>>,
    executor: Arc<dyn CommandExecutor>,
    probe: StatusProbe,
    notifier: Notifier,
    include_canonical: bool,
}

impl ServiceControlEntry {
    /// 创建条目，初始状态为未运行
    ///
    /// # 参数
    /// * `descriptor` - 服务描述符
    /// * `executor` - 命令执行器
    /// * `notifier` - 切换/菜单动作完成后的通知器
    /// * `include_canonical` - 菜单是否列出状态/启动/停止命令
    pub fn new(
        descriptor: ServiceDescriptor,
        executor: Arc<dyn CommandExecutor>,
        notifier: Notifier,
        include_canonical: bool,
    ) -> Self {
        Self {
            descriptor: Arc::new(descriptor),
            state: Arc::new(RwLock::new(ServiceRuntimeState::default())),
            probe: StatusProbe::new(Arc::clone(&executor)),
            executor,
            notifier,
            include_canonical,
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    /// 当前展示的状态
    pub async fn state(&self) -> ServiceState {
        self.state.read().await.state()
    }

    /// 挂载：在后台探测一次状态
    ///
    /// 探测任务只持有状态的弱引用；条目在探测完成前被卸载时，结果直接丢弃。
    /// 卸载不会取消已经发出的命令。
    pub fn mount(&self) -> JoinHandle<()> {
        let weak_state = Arc::downgrade(&self.state);
        let probe = self.probe.clone();
        let descriptor = Arc::clone(&self.descriptor);

        tokio::spawn(async move {
            let active = probe
                .probe(
                    descriptor.status_command.as_deref(),
                    descriptor.expected_status_output.as_deref(),
                )
                .await;

            match weak_state.upgrade() {
                Some(state) => {
                    state.write().await.active = active;
                    debug!(service = %descriptor.name, active, "挂载探测完成");
                }
                None => {
                    debug!(service = %descriptor.name, "条目已卸载，丢弃探测结果");
                }
            }
        })
    }

    /// 外部刷新：重新探测并等待结果
    pub async fn refresh(&self) -> ServiceState {
        let active = self
            .probe
            .probe(
                self.descriptor.status_command.as_deref(),
                self.descriptor.expected_status_output.as_deref(),
            )
            .await;

        self.state.write().await.active = active;
        ServiceState::from_active(active)
    }

    /// 切换：运行中则执行停止命令，否则执行启动命令
    ///
    /// 命令在后台执行，结果只用于通知，不会改变条目状态。
    pub async fn toggle(&self) -> Dispatch {
        let active = self.state.read().await.active;

        let (name, command) = if active {
            (STOP_NOTIFICATION_NAME, self.descriptor.stop_command.clone())
        } else {
            (START_NOTIFICATION_NAME, self.descriptor.start_command.clone())
        };

        debug!(service = %self.descriptor.name, active, command = %command, "切换服务");

        dispatch(
            Arc::clone(&self.executor),
            self.notifier.clone(),
            name,
            command,
        )
    }

    /// 构建该条目的动作菜单
    pub fn menu(&self) -> ActionMenu {
        ActionMenu::new(
            self.descriptor.name.clone(),
            menu_items(&self.descriptor, self.include_canonical),
            Arc::clone(&self.executor),
            self.notifier.clone(),
        )
    }

    /// 打开菜单：交给宿主展示，并返回菜单以便后续选择
    pub fn open_menu(&self, host: &dyn MenuHost) -> ActionMenu {
        let menu = self.menu();
        host.show_context_menu(&menu);
        menu
    }
}

impl std::fmt::Debug for ServiceControlEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceControlEntry")
            .field("descriptor", &self.descriptor)
            .field("include_canonical", &self.include_canonical)
            .finish_non_exhaustive()
    }
}
