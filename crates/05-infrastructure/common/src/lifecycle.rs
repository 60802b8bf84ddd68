//! 容器生命周期管理

use std::fmt;

/// 容器生命周期状态
///
/// `Unstarted → Started → Stopped`，`Stopped` 为终态，不支持重新启动。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContainerState {
    /// 未启动，允许注册 Bean 定义
    #[default]
    Unstarted,
    /// 已启动，允许查找 Bean
    Started,
    /// 已停止
    Stopped,
}

impl ContainerState {
    /// 是否允许注册
    pub fn can_register(&self) -> bool {
        matches!(self, Self::Unstarted)
    }

    /// 是否可以启动
    pub fn can_start(&self) -> bool {
        matches!(self, Self::Unstarted)
    }

    /// 是否允许查找 Bean
    pub fn can_lookup(&self) -> bool {
        matches!(self, Self::Started)
    }

    /// 是否已到达终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped)
    }
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unstarted => "Unstarted",
            Self::Started => "Started",
            Self::Stopped => "Stopped",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_permissions() {
        let state = ContainerState::default();
        assert!(state.can_register());
        assert!(state.can_start());
        assert!(!state.can_lookup());

        assert!(ContainerState::Started.can_lookup());
        assert!(!ContainerState::Started.can_register());

        assert!(ContainerState::Stopped.is_terminal());
        assert!(!ContainerState::Stopped.can_start());
    }
}
