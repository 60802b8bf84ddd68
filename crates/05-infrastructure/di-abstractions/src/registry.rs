//! Bean 定义与注册表抽象接口

use crate::factory::{
    BeanCaster, BeanFactoryFn, BeanInstance, DestroyFn, FactoryError, Injections,
};
use crate::resolver::InjectionPoint;
use infrastructure_common::{format_tags, DependencyError, DependencyResult, QualifierTag, TypeTag};
use std::collections::{BTreeSet, HashSet};
use std::marker::PhantomData;
use std::sync::Arc;

/// Bean 定义
///
/// 注册后不可变，由定义存储独占并以 `Arc` 共享读取。
pub struct BeanDefinition {
    /// Bean 名称，容器内唯一
    name: String,
    /// 工厂产出的类型
    produced_type: TypeTag,
    /// 限定标签
    qualifier_tags: BTreeSet<QualifierTag>,
    /// 是否为首选 Bean
    primary: bool,
    /// 描述
    description: Option<String>,
    /// 实例工厂
    factory: BeanFactoryFn,
    /// 额外暴露的类型
    exposed: Vec<(TypeTag, BeanCaster)>,
    /// 工厂所需的注入点
    injection_points: Vec<(String, InjectionPoint)>,
    /// 销毁回调
    destroy: Option<DestroyFn>,
}

impl BeanDefinition {
    /// 创建构建器
    pub fn builder<T>(name: impl Into<String>) -> BeanDefinitionBuilder<T>
    where
        T: Send + Sync + 'static,
    {
        BeanDefinitionBuilder::new(name)
    }

    /// Bean 名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 工厂产出的类型
    pub fn produced_type(&self) -> TypeTag {
        self.produced_type
    }

    /// 携带的限定标签
    pub fn qualifier_tags(&self) -> &BTreeSet<QualifierTag> {
        &self.qualifier_tags
    }

    /// 是否携带指定标签
    pub fn has_tag(&self, tag: &QualifierTag) -> bool {
        self.qualifier_tags.contains(tag)
    }

    /// 是否携带任意种类的限定标签
    pub fn is_qualified(&self) -> bool {
        !self.qualifier_tags.is_empty()
    }

    /// 是否为首选 Bean
    pub fn is_primary(&self) -> bool {
        self.primary
    }

    /// 描述
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// 注入点，按声明顺序
    pub fn injection_points(&self) -> &[(String, InjectionPoint)] {
        &self.injection_points
    }

    /// 额外暴露的类型
    pub fn exposed_types(&self) -> impl Iterator<Item = TypeTag> + '_ {
        self.exposed.iter().map(|(tag, _)| *tag)
    }

    /// 是否可以注入到指定类型
    pub fn is_assignable_to(&self, target: &TypeTag) -> bool {
        self.produced_type == *target || self.exposed.iter().any(|(tag, _)| tag == target)
    }

    /// 调用工厂创建实例
    pub fn instantiate(&self, injections: &Injections) -> DependencyResult<BeanInstance> {
        (self.factory)(&self.name, injections).map_err(|source| {
            DependencyError::ComponentCreationFailed {
                name: self.name.clone(),
                source,
            }
        })
    }

    /// 把实例转换为指定类型的视图
    pub fn view_as(&self, instance: &BeanInstance, target: &TypeTag) -> Option<BeanInstance> {
        if self.produced_type == *target {
            return Some(instance.clone());
        }
        self.exposed
            .iter()
            .find(|(tag, _)| tag == target)
            .and_then(|(_, cast)| cast(instance))
    }

    /// 执行销毁回调
    pub fn destroy(&self, instance: &BeanInstance) {
        if let Some(destroy) = &self.destroy {
            destroy(instance);
        }
    }
}

impl std::fmt::Debug for BeanDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanDefinition")
            .field("name", &self.name)
            .field("produced_type", &self.produced_type.name())
            .field("qualifier_tags", &format_tags(&self.qualifier_tags))
            .field("primary", &self.primary)
            .field("injection_points", &self.injection_points.len())
            .field("factory", &"<function>")
            .finish()
    }
}

/// 声明式元数据，对应注解上的 primary 与限定标签
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeanMetadata {
    /// 是否为首选 Bean
    pub primary: bool,
    /// 限定标签
    pub qualifier_tags: BTreeSet<QualifierTag>,
    /// 描述
    pub description: Option<String>,
}

impl BeanMetadata {
    /// 创建空的元数据
    pub fn new() -> Self {
        Self::default()
    }

    /// 标记为首选
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    /// 添加限定标签
    pub fn with_tag(mut self, tag: QualifierTag) -> Self {
        self.qualifier_tags.insert(tag);
        self
    }

    /// 添加描述
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Bean 定义构建器
pub struct BeanDefinitionBuilder<T> {
    name: String,
    metadata: BeanMetadata,
    factory: Option<BeanFactoryFn>,
    exposed: Vec<(TypeTag, BeanCaster)>,
    injection_points: Vec<(String, InjectionPoint)>,
    destroy: Option<DestroyFn>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> BeanDefinitionBuilder<T>
where
    T: Send + Sync + 'static,
{
    /// 创建新的构建器
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: BeanMetadata::default(),
            factory: None,
            exposed: Vec::new(),
            injection_points: Vec::new(),
            destroy: None,
            _marker: PhantomData,
        }
    }

    /// 标记为首选
    pub fn primary(mut self) -> Self {
        self.metadata.primary = true;
        self
    }

    /// 添加限定标签
    pub fn with_tag(mut self, tag: QualifierTag) -> Self {
        self.metadata.qualifier_tags.insert(tag);
        self
    }

    /// 添加匿名限定标签
    pub fn qualified(self) -> Self {
        self.with_tag(QualifierTag::Anonymous)
    }

    /// 添加分组标记
    pub fn in_group(self, marker: impl Into<String>) -> Self {
        self.with_tag(QualifierTag::marker(marker))
    }

    /// 合并声明式元数据
    pub fn with_metadata(mut self, metadata: BeanMetadata) -> Self {
        self.metadata.primary |= metadata.primary;
        self.metadata.qualifier_tags.extend(metadata.qualifier_tags);
        if metadata.description.is_some() {
            self.metadata.description = metadata.description;
        }
        self
    }

    /// 设置描述
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = Some(description.into());
        self
    }

    /// 声明可注入为类型 `I`
    pub fn exposes<I, C>(mut self, cast: C) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        C: Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static,
    {
        let caster: BeanCaster = Arc::new(move |instance: &BeanInstance| {
            instance
                .downcast::<T>()
                .map(|value| BeanInstance::new(instance.name(), cast(value)))
        });
        self.exposed.push((TypeTag::of::<I>(), caster));
        self
    }

    /// 声明注入点，工厂通过同一个键读取结果
    pub fn inject(mut self, key: impl Into<String>, point: InjectionPoint) -> Self {
        self.injection_points.push((key.into(), point));
        self
    }

    /// 无参工厂
    pub fn factory<F>(self, factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.try_factory(move |_| Ok(factory()))
    }

    /// 使用注入结果的工厂，可以失败
    pub fn try_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&Injections) -> Result<T, FactoryError> + Send + Sync + 'static,
    {
        let factory: BeanFactoryFn = Arc::new(move |name: &str, injections: &Injections| {
            factory(injections).map(|value| BeanInstance::new(name, Arc::new(value)))
        });
        self.factory = Some(factory);
        self
    }

    /// 使用已创建的实例
    pub fn instance(mut self, value: Arc<T>) -> Self {
        let factory: BeanFactoryFn = Arc::new(move |name: &str, _: &Injections| {
            Ok(BeanInstance::new(name, value.clone()))
        });
        self.factory = Some(factory);
        self
    }

    /// 释放实例时执行的回调
    pub fn on_destroy<F>(mut self, destroy: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let destroy: DestroyFn = Arc::new(move |instance: &BeanInstance| {
            if let Some(value) = instance.downcast::<T>() {
                destroy(&*value);
            }
        });
        self.destroy = Some(destroy);
        self
    }

    /// 构建定义
    pub fn build(self) -> DependencyResult<BeanDefinition> {
        let factory = self.factory.ok_or_else(|| DependencyError::ComponentCreationFailed {
            name: self.name.clone(),
            source: "未设置实例工厂".into(),
        })?;

        let mut keys = HashSet::new();
        for (key, _) in &self.injection_points {
            if !keys.insert(key.as_str()) {
                return Err(DependencyError::DuplicateInjectionKey {
                    name: self.name.clone(),
                    key: key.clone(),
                });
            }
        }

        Ok(BeanDefinition {
            name: self.name,
            produced_type: TypeTag::of::<T>(),
            qualifier_tags: self.metadata.qualifier_tags,
            primary: self.metadata.primary,
            description: self.metadata.description,
            factory,
            exposed: self.exposed,
            injection_points: self.injection_points,
            destroy: self.destroy,
        })
    }
}

/// Bean 定义注册表 trait
pub trait BeanDefinitionRegistry: Send + Sync {
    /// 注册定义，名称重复时失败且不做任何修改
    fn register(&mut self, definition: BeanDefinition) -> DependencyResult<Arc<BeanDefinition>>;

    /// 按类型查找，保持注册顺序
    fn lookup_by_type(&self, target: &TypeTag) -> Vec<Arc<BeanDefinition>>;

    /// 按名称查找
    fn lookup_by_name(&self, name: &str) -> Option<Arc<BeanDefinition>>;

    /// 是否已注册指定名称
    fn contains(&self, name: &str) -> bool {
        self.lookup_by_name(name).is_some()
    }

    /// 所有定义，保持注册顺序
    fn definitions(&self) -> Vec<Arc<BeanDefinition>>;

    /// 已注册的定义数量
    fn len(&self) -> usize;

    /// 是否没有任何定义
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 限定标签查询 trait
pub trait QualifierLookup: Send + Sync {
    /// 查询携带指定标签的 Bean 名称
    fn lookup_by_tag(&self, tag: &QualifierTag) -> HashSet<&str>;
}
