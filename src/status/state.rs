//! 服务运行状态
//!
//! 只在内存中保存，不跨重新挂载持久化

use serde::{Deserialize, Serialize};

/// 条目对外展示的两种状态
///
/// 探测失败与真正的未运行无法区分，都显示为 `Inactive`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    #[default]
    Inactive,
    Active,
}

impl ServiceState {
    pub fn from_active(active: bool) -> Self {
        if active {
            ServiceState::Active
        } else {
            ServiceState::Inactive
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ServiceState::Active)
    }
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceState::Active => write!(f, "active"),
            ServiceState::Inactive => write!(f, "inactive"),
        }
    }
}

/// 单个条目的运行时状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceRuntimeState {
    pub active: bool,
}

impl ServiceRuntimeState {
    pub fn state(&self) -> ServiceState {
        ServiceState::from_active(self.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_inactive() {
        let runtime = ServiceRuntimeState::default();
        assert!(!runtime.active);
        assert_eq!(runtime.state(), ServiceState::Inactive);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(ServiceState::Active.to_string(), "active");
        assert_eq!(ServiceState::from_active(false).to_string(), "inactive");
    }
}
