//! 注入点解析器实现

use di_abstractions::{
    BeanDefinition, BeanDefinitionRegistry, BeanResolver, InjectionPoint, QualifierLookup,
};
use infrastructure_common::{DependencyError, DependencyResult};
use std::sync::Arc;
use tracing::debug;

/// 默认解析器
///
/// 过滤规则：显式名称优先；否则要求携带全部限定标签；
/// 未声明任何过滤条件的集合注入只包含没有限定标签的 Bean。
pub struct DefaultBeanResolver<'a, R> {
    registry: &'a R,
}

impl<'a, R> DefaultBeanResolver<'a, R>
where
    R: BeanDefinitionRegistry + QualifierLookup,
{
    /// 基于注册表创建解析器
    pub fn new(registry: &'a R) -> Self {
        Self { registry }
    }

    /// 按类型、名称和标签筛选候选定义
    fn candidates(&self, point: &InjectionPoint) -> DependencyResult<Vec<Arc<BeanDefinition>>> {
        point.validate()?;

        let mut candidates = self.registry.lookup_by_type(&point.target_type());

        if let Some(name) = point.explicit_name() {
            candidates.retain(|def| def.name() == name);
        } else {
            for tag in point.required_tags() {
                let tagged = self.registry.lookup_by_tag(tag);
                candidates.retain(|def| tagged.contains(def.name()));
            }
        }

        Ok(candidates)
    }
}

impl<'a, R> BeanResolver for DefaultBeanResolver<'a, R>
where
    R: BeanDefinitionRegistry + QualifierLookup,
{
    fn resolve_single(&self, point: &InjectionPoint) -> DependencyResult<Arc<BeanDefinition>> {
        let mut candidates = self.candidates(point)?;

        let resolved = match candidates.len() {
            0 => {
                return Err(DependencyError::NoSuchBean {
                    type_name: point.target_type().name().to_string(),
                    detail: format!("注入点 {point} 没有候选"),
                })
            }
            1 => candidates.remove(0),
            _ => {
                let mut primaries: Vec<_> =
                    candidates.iter().filter(|def| def.is_primary()).collect();
                if primaries.len() == 1 {
                    primaries.remove(0).clone()
                } else {
                    return Err(DependencyError::AmbiguousResolution {
                        type_name: point.target_type().name().to_string(),
                        candidates: candidates
                            .iter()
                            .map(|def| def.name().to_string())
                            .collect(),
                    });
                }
            }
        };

        debug!("注入点 {} 解析为 {}", point, resolved.name());
        Ok(resolved)
    }

    fn resolve_collection(
        &self,
        point: &InjectionPoint,
    ) -> DependencyResult<Vec<Arc<BeanDefinition>>> {
        let mut candidates = self.candidates(point)?;

        if point.explicit_name().is_none() && point.required_tags().is_empty() {
            candidates.retain(|def| !def.is_qualified());
        }

        debug!(
            "注入点 {} 解析为 {:?}",
            point,
            candidates.iter().map(|def| def.name()).collect::<Vec<_>>()
        );
        Ok(candidates)
    }
}
