//! Bean 实例与工厂抽象
//!
//! Bean 实例以类型擦除的 `Arc<T>` 保存，`T` 可以是 `dyn Trait`。

use infrastructure_common::{DependencyError, DependencyResult, TypeTag};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 工厂错误类型
pub type FactoryError = Box<dyn std::error::Error + Send + Sync>;

/// Bean 工厂函数：接收 Bean 名称与已注入的依赖
pub type BeanFactoryFn =
    Arc<dyn Fn(&str, &Injections) -> Result<BeanInstance, FactoryError> + Send + Sync>;

/// 把实例转换为它所暴露的其他类型
pub type BeanCaster = Arc<dyn Fn(&BeanInstance) -> Option<BeanInstance> + Send + Sync>;

/// 销毁回调
pub type DestroyFn = Arc<dyn Fn(&BeanInstance) + Send + Sync>;

/// 解析结果集合，按注册顺序排列
pub type ResolvedSet = Vec<BeanInstance>;

/// Bean 实例
///
/// 克隆只复制句柄，底层单例保持同一个。
#[derive(Clone)]
pub struct BeanInstance {
    /// Bean 名称
    name: Arc<str>,
    /// 当前视图的类型
    type_tag: TypeTag,
    /// 内部保存 `Arc<T>`
    value: Arc<dyn Any + Send + Sync>,
    /// 底层对象地址，用于判断同一实例
    addr: usize,
}

impl BeanInstance {
    /// 创建新的实例句柄
    pub fn new<T>(name: impl Into<Arc<str>>, value: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let addr = Arc::as_ptr(&value) as *const () as usize;
        Self {
            name: name.into(),
            type_tag: TypeTag::of::<T>(),
            value: Arc::new(value),
            addr,
        }
    }

    /// Bean 名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 当前视图的类型
    pub fn type_tag(&self) -> TypeTag {
        self.type_tag
    }

    /// 按类型取出实例
    pub fn downcast<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
        self.value.downcast_ref::<Arc<T>>().cloned()
    }

    /// 按类型取出实例，失败时返回类型不匹配错误
    pub fn try_downcast<T: ?Sized + 'static>(&self) -> DependencyResult<Arc<T>> {
        self.downcast::<T>()
            .ok_or_else(|| DependencyError::type_mismatch::<T>(self.name()))
    }

    /// 两个句柄是否指向同一个底层对象
    pub fn same_instance(&self, other: &BeanInstance) -> bool {
        self.addr == other.addr
    }
}

impl fmt::Debug for BeanInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanInstance")
            .field("name", &self.name)
            .field("type", &self.type_tag.name())
            .finish()
    }
}

/// 单个注入点的结果
#[derive(Debug, Clone)]
pub enum Injected {
    /// 单值注入
    Single(BeanInstance),
    /// 集合注入
    Collection(ResolvedSet),
}

impl Injected {
    /// 结果中包含的 Bean 名称
    pub fn bean_names(&self) -> Vec<&str> {
        match self {
            Self::Single(instance) => vec![instance.name()],
            Self::Collection(instances) => instances.iter().map(BeanInstance::name).collect(),
        }
    }
}

/// 已解析的注入结果，按注入点的键保存
#[derive(Debug, Clone, Default)]
pub struct Injections {
    values: HashMap<String, Injected>,
}

impl Injections {
    /// 创建空的注入结果
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入注入结果
    pub fn insert(&mut self, key: impl Into<String>, value: Injected) {
        self.values.insert(key.into(), value);
    }

    /// 获取原始注入结果
    pub fn get(&self, key: &str) -> Option<&Injected> {
        self.values.get(key)
    }

    /// 取出单值注入
    pub fn single<T: ?Sized + 'static>(&self, key: &str) -> DependencyResult<Arc<T>> {
        match self.values.get(key) {
            Some(Injected::Single(instance)) => instance.try_downcast::<T>(),
            _ => Err(DependencyError::InjectionNotFound {
                key: key.to_string(),
            }),
        }
    }

    /// 取出集合注入
    pub fn collection<T: ?Sized + 'static>(&self, key: &str) -> DependencyResult<Vec<Arc<T>>> {
        match self.values.get(key) {
            Some(Injected::Collection(instances)) => instances
                .iter()
                .map(BeanInstance::try_downcast::<T>)
                .collect(),
            _ => Err(DependencyError::InjectionNotFound {
                key: key.to_string(),
            }),
        }
    }

    /// 注入点数量
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否没有任何注入
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Named: Send + Sync {
        fn label(&self) -> String;
    }

    #[derive(Debug)]
    struct Account {
        id: u64,
    }

    impl Named for Account {
        fn label(&self) -> String {
            format!("account-{}", self.id)
        }
    }

    #[test]
    fn test_downcast_concrete_and_trait_views() {
        let account = Arc::new(Account { id: 7 });
        let concrete = BeanInstance::new("account", account.clone());
        let view = BeanInstance::new("account", account as Arc<dyn Named>);

        assert_eq!(concrete.downcast::<Account>().unwrap().id, 7);
        assert!(concrete.downcast::<dyn Named>().is_none());
        assert_eq!(view.downcast::<dyn Named>().unwrap().label(), "account-7");
        assert!(concrete.same_instance(&view));
    }

    #[test]
    fn test_try_downcast_reports_mismatch() {
        let instance = BeanInstance::new("account", Arc::new(Account { id: 1 }));
        let err = instance.try_downcast::<String>().unwrap_err();
        assert!(matches!(err, DependencyError::TypeMismatch { .. }));
    }

    #[test]
    fn test_injections_lookup() {
        let first = BeanInstance::new("a", Arc::new(Account { id: 1 }));
        let second = BeanInstance::new("b", Arc::new(Account { id: 2 }));

        let mut injections = Injections::new();
        injections.insert("one", Injected::Single(first.clone()));
        injections.insert("all", Injected::Collection(vec![first, second]));

        assert_eq!(injections.single::<Account>("one").unwrap().id, 1);
        let ids: Vec<u64> = injections
            .collection::<Account>("all")
            .unwrap()
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(injections.get("all").unwrap().bean_names(), vec!["a", "b"]);

        assert!(matches!(
            injections.single::<Account>("all"),
            Err(DependencyError::InjectionNotFound { .. })
        ));
        assert!(injections.collection::<Account>("missing").is_err());
    }
}
