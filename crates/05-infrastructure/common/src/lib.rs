//! # Infrastructure Common
//!
//! 这个 crate 提供了 IoC 容器各层共享的基础类型。
//!
//! ## 核心组件
//!
//! - [`DependencyError`] - 注册与解析阶段的错误分类
//! - [`TypeTag`] / [`QualifierTag`] - Bean 类型标记与限定标签
//! - [`ContainerState`] - 容器生命周期状态
//! - [`ConfigLoader`] - 类型化配置加载
//!
//! ## 设计原则
//!
//! - 显式注册，不依赖运行时扫描
//! - 不存在进程级的全局容器

pub mod configuration;
pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use configuration::*;
pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
