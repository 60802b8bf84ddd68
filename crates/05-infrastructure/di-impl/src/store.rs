//! Bean 定义存储

use crate::qualifier_index::QualifierIndex;
use di_abstractions::{BeanDefinition, BeanDefinitionRegistry, QualifierLookup};
use infrastructure_common::{DependencyError, DependencyResult, QualifierTag, TypeTag};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Bean 定义存储
///
/// 按注册顺序保存定义，同时维护名称索引与限定标签索引。
#[derive(Debug, Default)]
pub struct BeanDefinitionStore {
    definitions: Vec<Arc<BeanDefinition>>,
    by_name: HashMap<String, usize>,
    qualifiers: QualifierIndex,
}

impl BeanDefinitionStore {
    /// 创建空存储
    pub fn new() -> Self {
        Self::default()
    }

    /// 限定标签索引
    pub fn qualifier_index(&self) -> &QualifierIndex {
        &self.qualifiers
    }

    /// 所有 Bean 名称，保持注册顺序
    pub fn names(&self) -> Vec<&str> {
        self.definitions.iter().map(|def| def.name()).collect()
    }
}

impl BeanDefinitionRegistry for BeanDefinitionStore {
    fn register(&mut self, definition: BeanDefinition) -> DependencyResult<Arc<BeanDefinition>> {
        if self.by_name.contains_key(definition.name()) {
            warn!("Bean 名称重复，拒绝注册: {}", definition.name());
            return Err(DependencyError::DuplicateBeanName {
                name: definition.name().to_string(),
            });
        }

        debug!(
            "登记 Bean 定义: {} ({})",
            definition.name(),
            definition.produced_type().name()
        );

        self.qualifiers.index(&definition);
        let definition = Arc::new(definition);
        self.by_name
            .insert(definition.name().to_string(), self.definitions.len());
        self.definitions.push(definition.clone());
        Ok(definition)
    }

    fn lookup_by_type(&self, target: &TypeTag) -> Vec<Arc<BeanDefinition>> {
        self.definitions
            .iter()
            .filter(|def| def.is_assignable_to(target))
            .cloned()
            .collect()
    }

    fn lookup_by_name(&self, name: &str) -> Option<Arc<BeanDefinition>> {
        self.by_name
            .get(name)
            .map(|&idx| self.definitions[idx].clone())
    }

    fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    fn definitions(&self) -> Vec<Arc<BeanDefinition>> {
        self.definitions.clone()
    }

    fn len(&self) -> usize {
        self.definitions.len()
    }
}

impl QualifierLookup for BeanDefinitionStore {
    fn lookup_by_tag(&self, tag: &QualifierTag) -> HashSet<&str> {
        self.qualifiers.lookup_by_tag(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct User {
        id: u64,
    }

    #[derive(Debug)]
    struct Order;

    fn user(name: &str, id: u64) -> BeanDefinition {
        BeanDefinition::builder::<User>(name)
            .factory(move || User { id })
            .build()
            .unwrap()
    }

    #[test]
    fn test_lookup_by_name_round_trip() {
        let mut store = BeanDefinitionStore::new();
        let registered = store.register(user("user", 1)).unwrap();

        let found = store.lookup_by_name("user").unwrap();
        assert!(Arc::ptr_eq(&registered, &found));
        assert!(store.contains("user"));
        assert!(store.lookup_by_name("missing").is_none());
    }

    #[test]
    fn test_duplicate_name_leaves_store_unchanged() {
        let mut store = BeanDefinitionStore::new();
        store.register(user("user", 1)).unwrap();

        let duplicate = BeanDefinition::builder::<User>("user")
            .qualified()
            .factory(|| User { id: 2 })
            .build()
            .unwrap();
        let err = store.register(duplicate).unwrap_err();
        assert!(matches!(err, DependencyError::DuplicateBeanName { ref name } if name == "user"));

        assert_eq!(store.len(), 1);
        assert!(store.lookup_by_tag(&QualifierTag::Anonymous).is_empty());
        let kept = store.lookup_by_name("user").unwrap();
        assert!(!kept.is_qualified());
    }

    #[test]
    fn test_lookup_by_type_keeps_registration_order() {
        let mut store = BeanDefinitionStore::new();
        store.register(user("b", 2)).unwrap();
        store
            .register(
                BeanDefinition::builder::<Order>("order")
                    .factory(|| Order)
                    .build()
                    .unwrap(),
            )
            .unwrap();
        store.register(user("a", 1)).unwrap();

        let names: Vec<String> = store
            .lookup_by_type(&TypeTag::of::<User>())
            .iter()
            .map(|def| def.name().to_string())
            .collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(store.names(), vec!["b", "order", "a"]);
        assert!(store.lookup_by_type(&TypeTag::of::<String>()).is_empty());
    }

    #[test]
    fn test_user_factory_is_preserved() {
        let mut store = BeanDefinitionStore::new();
        store.register(user("user", 42)).unwrap();

        let def = store.lookup_by_name("user").unwrap();
        let instance = def.instantiate(&Default::default()).unwrap();
        assert_eq!(instance.downcast::<User>().unwrap().id, 42);
    }
}
