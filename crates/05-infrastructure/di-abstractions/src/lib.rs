//! # Dependency Injection Abstractions
//! 
//! 依赖注入抽象层，定义 Bean 定义、注入点和容器的核心接口。
//! 
//! ## 核心接口
//! 
//! - [`BeanDefinition`] - 不可变的 Bean 定义及其构建器
//! - [`BeanDefinitionRegistry`] - Bean 定义注册表接口
//! - [`QualifierLookup`] - 限定标签索引接口
//! - [`BeanResolver`] - 注入点解析器接口
//! - [`BeanContainer`] - 容器接口

pub mod container;
pub mod factory;
pub mod registry;
pub mod resolver;

pub use container::*;
pub use factory::*;
pub use registry::*;
pub use resolver::*;
