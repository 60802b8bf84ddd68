//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置加载失败: {source}")]
    LoadFailed {
        #[from]
        source: config::ConfigError,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("Bean 名称重复: {name}")]
    DuplicateBeanName { name: String },

    #[error("找不到匹配的 Bean: {type_name}, {detail}")]
    NoSuchBean { type_name: String, detail: String },

    #[error("Bean 解析存在歧义: {type_name}, 候选: {candidates:?}")]
    AmbiguousResolution {
        type_name: String,
        candidates: Vec<String>,
    },

    #[error("注入点不能同时声明名称与限定标签: {type_name}, 名称: {name}, 标签: {tags}")]
    UnsupportedCombination {
        type_name: String,
        name: String,
        tags: String,
    },

    #[error("组件创建失败: {name}, 原因: {source}")]
    ComponentCreationFailed {
        name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("容器状态不允许该操作: {operation}, 当前状态: {state}")]
    InvalidState { operation: String, state: String },

    #[error("Bean 类型不匹配: {name}, 期望 {expected}")]
    TypeMismatch { name: String, expected: String },

    #[error("注入结果不存在: {key}")]
    InjectionNotFound { key: String },

    #[error("注入点键重复: {name}.{key}")]
    DuplicateInjectionKey { name: String, key: String },
}

impl DependencyError {
    /// 创建状态错误
    pub fn invalid_state(operation: impl Into<String>, state: impl std::fmt::Display) -> Self {
        Self::InvalidState {
            operation: operation.into(),
            state: state.to_string(),
        }
    }

    /// 创建类型不匹配错误
    pub fn type_mismatch<T: ?Sized>(name: impl Into<String>) -> Self {
        Self::TypeMismatch {
            name: name.into(),
            expected: std::any::type_name::<T>().to_string(),
        }
    }

    /// 是否属于解析阶段的错误
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            Self::NoSuchBean { .. }
                | Self::AmbiguousResolution { .. }
                | Self::UnsupportedCombination { .. }
        )
    }
}

/// 配置结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
/// 依赖注入结果类型别名
pub type DependencyResult<T> = Result<T, DependencyError>;
