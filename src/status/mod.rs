//! 服务状态模块
//!
//! 提供状态探测和运行时状态类型

pub mod probe;
pub mod state;

pub use probe::{matches_expected, StatusProbe};
pub use state::{ServiceRuntimeState, ServiceState};
