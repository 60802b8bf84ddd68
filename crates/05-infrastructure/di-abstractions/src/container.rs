//! 依赖注入容器抽象接口
//!
//! 提供依赖注入容器的核心抽象

use crate::factory::{BeanInstance, Injected};
use crate::registry::{BeanDefinition, BeanMetadata};
use crate::resolver::InjectionPoint;
use infrastructure_common::{
    ConfigError, ConfigLoader, ConfigResult, ContainerState, DependencyResult, ValidatedConfig,
};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

/// 依赖注入容器 trait
pub trait BeanContainer: Send + Sync {
    /// 注册 Bean 定义，仅在 `Unstarted` 状态下允许
    fn register_definition(&mut self, definition: BeanDefinition) -> DependencyResult<()>;

    /// 把无参工厂包装为 Bean 定义并注册
    fn register_factory_bean<T, F>(
        &mut self,
        name: &str,
        metadata: BeanMetadata,
        factory: F,
    ) -> DependencyResult<()>
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
        Self: Sized,
    {
        let definition = BeanDefinition::builder::<T>(name)
            .with_metadata(metadata)
            .factory(factory)
            .build()?;
        self.register_definition(definition)
    }

    /// 启动容器：解析所有注入点并创建所有单例
    fn start(&mut self) -> DependencyResult<()>;

    /// 按名称获取 Bean
    fn get_bean(&self, name: &str) -> DependencyResult<BeanInstance>;

    /// 按名称获取指定类型的 Bean
    fn get_bean_as<T: ?Sized + 'static>(&self, name: &str) -> DependencyResult<Arc<T>>
    where
        Self: Sized;

    /// 按类型获取唯一的 Bean，遵循首选规则
    fn get_bean_of_type<T: ?Sized + 'static>(&self) -> DependencyResult<Arc<T>>
    where
        Self: Sized;

    /// 按类型获取 Bean 集合
    fn get_beans_of_type<T: ?Sized + 'static>(&self) -> DependencyResult<Vec<Arc<T>>>
    where
        Self: Sized;

    /// 解析任意注入点
    fn resolve(&self, point: &InjectionPoint) -> DependencyResult<Injected>;

    /// 停止容器并释放所有实例
    fn stop(&mut self) -> DependencyResult<()>;

    /// 当前状态
    fn state(&self) -> ContainerState;
}

/// 容器配置
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContainerConfig {
    /// 容器显示名称
    pub display_name: String,
    /// 在已停止的容器上再次调用 `stop()` 是否报错
    pub strict_stop: bool,
}

impl ContainerConfig {
    /// 配置节名称
    pub const SECTION: &'static str = "container";

    /// 从可选的配置文件和 `IOC__CONTAINER__*` 环境变量加载
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut loader = ConfigLoader::new();
        if let Some(path) = path {
            loader = loader.with_file(path, true);
        }
        loader.load_section(Self::SECTION)
    }

    /// 设置显示名称
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// 设置严格停止模式
    pub fn with_strict_stop(mut self, strict_stop: bool) -> Self {
        self.strict_stop = strict_stop;
        self
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            display_name: "application-context".to_string(),
            strict_stop: false,
        }
    }
}

impl ValidatedConfig for ContainerConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.display_name.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "container.display_name 不能为空".to_string(),
            });
        }
        Ok(())
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Default)]
pub struct ContainerStats {
    /// 已注册定义数量
    pub registered_definitions: usize,
    /// 活跃单例数量
    pub active_singletons: usize,
    /// 启动后的查找次数
    pub lookups: u64,
    /// 查找失败次数
    pub lookup_errors: u64,
    /// 最近一次成功启动的时间
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
}
