//! # 依赖注入具体实现
//! 
//! 提供 Bean 定义存储、限定标签索引、注入点解析器和容器实现

pub mod container;
pub mod qualifier_index;
pub mod resolver;
pub mod store;

pub use container::{DiContainerBuilder, DiContainerImpl};
pub use qualifier_index::QualifierIndex;
pub use resolver::DefaultBeanResolver;
pub use store::BeanDefinitionStore;
