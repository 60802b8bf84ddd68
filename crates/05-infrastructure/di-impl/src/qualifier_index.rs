//! 限定标签索引

use di_abstractions::{BeanDefinition, QualifierLookup};
use infrastructure_common::QualifierTag;
use std::collections::{BTreeSet, HashMap, HashSet};

/// 限定标签到 Bean 名称集合的二级索引
///
/// 随注册增量构建。
#[derive(Debug, Default)]
pub struct QualifierIndex {
    by_tag: HashMap<QualifierTag, HashSet<String>>,
}

impl QualifierIndex {
    /// 创建空索引
    pub fn new() -> Self {
        Self::default()
    }

    /// 把定义携带的所有标签加入索引
    pub fn index(&mut self, definition: &BeanDefinition) {
        for tag in definition.qualifier_tags() {
            self.by_tag
                .entry(tag.clone())
                .or_default()
                .insert(definition.name().to_string());
        }
    }

    /// 某个 Bean 携带的标签
    pub fn tags_of(&self, name: &str) -> BTreeSet<QualifierTag> {
        self.by_tag
            .iter()
            .filter(|(_, names)| names.contains(name))
            .map(|(tag, _)| tag.clone())
            .collect()
    }

    /// 不同标签的数量
    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    /// 索引是否为空
    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }
}

impl QualifierLookup for QualifierIndex {
    fn lookup_by_tag(&self, tag: &QualifierTag) -> HashSet<&str> {
        self.by_tag
            .get(tag)
            .map(|names| names.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}
