//! 注入点与解析器抽象接口
//!
//! 注入点通过构造函数显式声明，不依赖运行时扫描

use crate::registry::BeanDefinition;
use infrastructure_common::{format_tags, DependencyError, DependencyResult, QualifierTag, TypeTag};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// 注入基数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// 注入单个 Bean
    Single,
    /// 注入所有匹配的 Bean
    Collection,
}

/// 注入点描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionPoint {
    /// 目标类型
    target_type: TypeTag,
    /// 基数
    cardinality: Cardinality,
    /// 显式指定的 Bean 名称
    explicit_name: Option<String>,
    /// 必须携带的限定标签
    required_tags: BTreeSet<QualifierTag>,
}

impl InjectionPoint {
    /// 单值注入点
    pub fn single<T: ?Sized + 'static>() -> Self {
        Self::new(TypeTag::of::<T>(), Cardinality::Single)
    }

    /// 集合注入点
    pub fn collection<T: ?Sized + 'static>() -> Self {
        Self::new(TypeTag::of::<T>(), Cardinality::Collection)
    }

    /// 使用已有类型标记创建注入点
    pub fn new(target_type: TypeTag, cardinality: Cardinality) -> Self {
        Self {
            target_type,
            cardinality,
            explicit_name: None,
            required_tags: BTreeSet::new(),
        }
    }

    /// 指定 Bean 名称
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.explicit_name = Some(name.into());
        self
    }

    /// 要求携带指定限定标签
    pub fn with_tag(mut self, tag: QualifierTag) -> Self {
        self.required_tags.insert(tag);
        self
    }

    /// 要求携带匿名限定标签
    pub fn qualified(self) -> Self {
        self.with_tag(QualifierTag::Anonymous)
    }

    /// 要求携带指定分组标记
    pub fn in_group(self, marker: impl Into<String>) -> Self {
        self.with_tag(QualifierTag::marker(marker))
    }

    /// 目标类型
    pub fn target_type(&self) -> TypeTag {
        self.target_type
    }

    /// 注入基数
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// 显式指定的 Bean 名称
    pub fn explicit_name(&self) -> Option<&str> {
        self.explicit_name.as_deref()
    }

    /// 必须携带的限定标签
    pub fn required_tags(&self) -> &BTreeSet<QualifierTag> {
        &self.required_tags
    }

    /// 检查注入点声明是否合法
    ///
    /// 名称与限定标签互斥。
    pub fn validate(&self) -> DependencyResult<()> {
        match &self.explicit_name {
            Some(name) if !self.required_tags.is_empty() => {
                Err(DependencyError::UnsupportedCombination {
                    type_name: self.target_type.name().to_string(),
                    name: name.clone(),
                    tags: format_tags(&self.required_tags),
                })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for InjectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cardinality {
            Cardinality::Single => write!(f, "{}", self.target_type)?,
            Cardinality::Collection => write!(f, "Collection<{}>", self.target_type)?,
        }
        if let Some(name) = &self.explicit_name {
            write!(f, " name={name}")?;
        }
        if !self.required_tags.is_empty() {
            write!(f, " tags=[{}]", format_tags(&self.required_tags))?;
        }
        Ok(())
    }
}

/// Bean 解析器 trait
///
/// 负责为注入点挑选候选 Bean 定义，实例化由容器完成
pub trait BeanResolver: Send + Sync {
    /// 解析单值注入点
    fn resolve_single(&self, point: &InjectionPoint) -> DependencyResult<Arc<BeanDefinition>>;

    /// 解析集合注入点，结果可以为空
    fn resolve_collection(&self, point: &InjectionPoint)
        -> DependencyResult<Vec<Arc<BeanDefinition>>>;

    /// 按基数分派
    fn resolve(&self, point: &InjectionPoint) -> DependencyResult<Vec<Arc<BeanDefinition>>> {
        match point.cardinality() {
            Cardinality::Single => self.resolve_single(point).map(|def| vec![def]),
            Cardinality::Collection => self.resolve_collection(point),
        }
    }
}
