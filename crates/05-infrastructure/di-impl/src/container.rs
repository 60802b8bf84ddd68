//! 依赖注入容器实现

use crate::resolver::DefaultBeanResolver;
use crate::store::BeanDefinitionStore;
use di_abstractions::{
    BeanContainer, BeanDefinition, BeanDefinitionRegistry, BeanInstance, BeanResolver,
    Cardinality, ContainerConfig, ContainerStats, Injected, InjectionPoint, Injections,
};
use infrastructure_common::{
    format_tags, ContainerState, DependencyError, DependencyResult, TypeTag,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// 一次启动过程中的创建上下文
///
/// 启动失败时据此回滚已经创建的实例。
#[derive(Default)]
struct CreationContext {
    /// 已创建的实例
    instances: HashMap<String, BeanInstance>,
    /// 创建顺序
    order: Vec<String>,
    /// 正在创建的 Bean，用于检测循环依赖
    creating: Vec<String>,
}

/// 具体的依赖注入容器实现
pub struct DiContainerImpl {
    /// 容器ID
    id: Uuid,
    /// 容器配置
    config: ContainerConfig,
    /// 生命周期状态
    state: ContainerState,
    /// Bean 定义存储
    store: BeanDefinitionStore,
    /// 单例缓存
    singletons: HashMap<String, BeanInstance>,
    /// 单例创建顺序，释放时逆序执行
    creation_order: Vec<String>,
    /// 统计信息
    stats: Mutex<ContainerStats>,
}

impl DiContainerImpl {
    /// 创建新的容器
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// 使用指定配置创建容器
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            state: ContainerState::Unstarted,
            store: BeanDefinitionStore::new(),
            singletons: HashMap::new(),
            creation_order: Vec::new(),
            stats: Mutex::new(ContainerStats::default()),
        }
    }

    /// 创建构建器
    pub fn builder() -> DiContainerBuilder {
        DiContainerBuilder::new()
    }

    /// 容器ID
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 容器显示名称
    pub fn display_name(&self) -> &str {
        &self.config.display_name
    }

    /// 容器配置
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Bean 定义存储
    pub fn store(&self) -> &BeanDefinitionStore {
        &self.store
    }

    /// 是否存在指定名称的 Bean 定义
    pub fn contains_bean(&self, name: &str) -> bool {
        self.store.contains(name)
    }

    /// 可注入为 `T` 的所有 Bean 名称，包括携带限定标签的 Bean
    pub fn bean_names_for_type<T: ?Sized + 'static>(&self) -> Vec<String> {
        self.store
            .lookup_by_type(&TypeTag::of::<T>())
            .iter()
            .map(|def| def.name().to_string())
            .collect()
    }

    /// 统计信息快照
    pub fn stats(&self) -> ContainerStats {
        let mut stats = self.stats.lock().clone();
        stats.registered_definitions = self.store.len();
        stats.active_singletons = self.singletons.len();
        stats
    }

    fn ensure_started(&self, operation: &str) -> DependencyResult<()> {
        if self.state.can_lookup() {
            Ok(())
        } else {
            Err(DependencyError::invalid_state(operation, self.state))
        }
    }

    fn record_lookup<T>(&self, result: &DependencyResult<T>) {
        let mut stats = self.stats.lock();
        stats.lookups += 1;
        if result.is_err() {
            stats.lookup_errors += 1;
        }
    }

    /// 创建 Bean 实例，先递归创建它的依赖
    fn instantiate(
        &self,
        definition: &Arc<BeanDefinition>,
        ctx: &mut CreationContext,
    ) -> DependencyResult<BeanInstance> {
        let name = definition.name();
        if let Some(instance) = ctx.instances.get(name) {
            return Ok(instance.clone());
        }

        if ctx.creating.iter().any(|creating| creating == name) {
            let mut chain = ctx.creating.clone();
            chain.push(name.to_string());
            return Err(DependencyError::CircularDependency {
                dependency_chain: chain.join(" -> "),
            });
        }

        ctx.creating.push(name.to_string());
        let created = self
            .inject(definition, ctx)
            .and_then(|injections| definition.instantiate(&injections));
        ctx.creating.pop();
        let instance = created?;

        debug!("创建 Bean 实例: {} ({})", name, definition.produced_type());
        ctx.instances.insert(name.to_string(), instance.clone());
        ctx.order.push(name.to_string());
        Ok(instance)
    }

    /// 解析定义声明的所有注入点
    fn inject(
        &self,
        definition: &BeanDefinition,
        ctx: &mut CreationContext,
    ) -> DependencyResult<Injections> {
        let resolver = DefaultBeanResolver::new(&self.store);
        let mut injections = Injections::new();

        for (key, point) in definition.injection_points() {
            let value = match point.cardinality() {
                Cardinality::Single => {
                    let target = resolver.resolve_single(point)?;
                    let instance = self.instantiate(&target, ctx)?;
                    Injected::Single(Self::view(&target, &instance, point)?)
                }
                Cardinality::Collection => {
                    let mut instances = Vec::new();
                    // 集合注入不包含正在创建的 Bean 自身
                    for target in resolver
                        .resolve_collection(point)?
                        .into_iter()
                        .filter(|target| target.name() != definition.name())
                    {
                        let instance = self.instantiate(&target, ctx)?;
                        instances.push(Self::view(&target, &instance, point)?);
                    }
                    Injected::Collection(instances)
                }
            };
            debug!(
                "注入 {}.{} <- {:?}",
                definition.name(),
                key,
                value.bean_names()
            );
            injections.insert(key.clone(), value);
        }

        Ok(injections)
    }

    fn view(
        definition: &BeanDefinition,
        instance: &BeanInstance,
        point: &InjectionPoint,
    ) -> DependencyResult<BeanInstance> {
        let target = point.target_type();
        definition
            .view_as(instance, &target)
            .ok_or_else(|| DependencyError::TypeMismatch {
                name: definition.name().to_string(),
                expected: target.name().to_string(),
            })
    }

    /// 逆序销毁一组实例
    fn destroy_all(&self, order: &[String], instances: &mut HashMap<String, BeanInstance>) {
        for name in order.iter().rev() {
            if let Some(instance) = instances.remove(name) {
                if let Some(definition) = self.store.lookup_by_name(name) {
                    debug!("销毁 Bean 实例: {}", name);
                    definition.destroy(&instance);
                }
            }
        }
        instances.clear();
    }

    fn release_singletons(&mut self) {
        let order = std::mem::take(&mut self.creation_order);
        let mut singletons = std::mem::take(&mut self.singletons);
        self.destroy_all(&order, &mut singletons);
    }

    /// 把已解析的定义映射为缓存中的单例
    fn cached(
        &self,
        definition: &BeanDefinition,
        point: &InjectionPoint,
    ) -> DependencyResult<BeanInstance> {
        let instance = self.singletons.get(definition.name()).ok_or_else(|| {
            DependencyError::NoSuchBean {
                type_name: definition.produced_type().name().to_string(),
                detail: format!("Bean {} 没有缓存实例", definition.name()),
            }
        })?;
        Self::view(definition, instance, point)
    }
}

impl Default for DiContainerImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl BeanContainer for DiContainerImpl {
    fn register_definition(&mut self, definition: BeanDefinition) -> DependencyResult<()> {
        if !self.state.can_register() {
            return Err(DependencyError::invalid_state(
                "register_definition",
                self.state,
            ));
        }

        let definition = self.store.register(definition)?;
        info!(
            "注册 Bean: {} ({}), primary={}, 标签: {}",
            definition.name(),
            definition.produced_type(),
            definition.is_primary(),
            format_tags(definition.qualifier_tags())
        );
        Ok(())
    }

    fn start(&mut self) -> DependencyResult<()> {
        if !self.state.can_start() {
            return Err(DependencyError::invalid_state("start", self.state));
        }

        info!(
            "启动容器 {} [{}]，共 {} 个 Bean 定义",
            self.config.display_name,
            self.id,
            self.store.len()
        );

        let mut ctx = CreationContext::default();
        for definition in self.store.definitions() {
            if let Err(e) = self.instantiate(&definition, &mut ctx) {
                error!("容器启动失败: {}", e);
                warn!("回滚已创建的 {} 个实例", ctx.order.len());
                self.destroy_all(&ctx.order, &mut ctx.instances);
                return Err(e);
            }
        }

        self.singletons = ctx.instances;
        self.creation_order = ctx.order;
        self.state = ContainerState::Started;
        self.stats.lock().started_at = Some(chrono::Utc::now());

        info!(
            "容器 {} 启动完成，创建了 {} 个单例",
            self.config.display_name,
            self.singletons.len()
        );
        Ok(())
    }

    fn get_bean(&self, name: &str) -> DependencyResult<BeanInstance> {
        self.ensure_started("get_bean")?;
        let result = self
            .singletons
            .get(name)
            .cloned()
            .ok_or_else(|| DependencyError::NoSuchBean {
                type_name: "<any>".to_string(),
                detail: format!("名称 {name} 未注册"),
            });
        self.record_lookup(&result);
        result
    }

    fn get_bean_as<T: ?Sized + 'static>(&self, name: &str) -> DependencyResult<Arc<T>> {
        let instance = self.get_bean(name)?;
        let target = TypeTag::of::<T>();
        self.store
            .lookup_by_name(name)
            .and_then(|definition| definition.view_as(&instance, &target))
            .ok_or_else(|| DependencyError::type_mismatch::<T>(name))?
            .try_downcast::<T>()
    }

    fn get_bean_of_type<T: ?Sized + 'static>(&self) -> DependencyResult<Arc<T>> {
        match self.resolve(&InjectionPoint::single::<T>())? {
            Injected::Single(instance) => instance.try_downcast::<T>(),
            Injected::Collection(_) => Err(DependencyError::type_mismatch::<T>("<collection>")),
        }
    }

    fn get_beans_of_type<T: ?Sized + 'static>(&self) -> DependencyResult<Vec<Arc<T>>> {
        match self.resolve(&InjectionPoint::collection::<T>())? {
            Injected::Collection(instances) => instances
                .iter()
                .map(BeanInstance::try_downcast::<T>)
                .collect(),
            Injected::Single(instance) => Ok(vec![instance.try_downcast::<T>()?]),
        }
    }

    fn resolve(&self, point: &InjectionPoint) -> DependencyResult<Injected> {
        self.ensure_started("resolve")?;
        let resolver = DefaultBeanResolver::new(&self.store);

        let result = match point.cardinality() {
            Cardinality::Single => resolver
                .resolve_single(point)
                .and_then(|definition| self.cached(&definition, point))
                .map(Injected::Single),
            Cardinality::Collection => resolver.resolve_collection(point).and_then(|definitions| {
                definitions
                    .iter()
                    .map(|definition| self.cached(definition, point))
                    .collect::<DependencyResult<Vec<_>>>()
                    .map(Injected::Collection)
            }),
        };
        self.record_lookup(&result);
        result
    }

    fn stop(&mut self) -> DependencyResult<()> {
        match self.state {
            ContainerState::Started => {
                info!("停止容器 {}，释放 {} 个单例", self.config.display_name, self.singletons.len());
                self.release_singletons();
                self.state = ContainerState::Stopped;
                Ok(())
            }
            ContainerState::Stopped if self.config.strict_stop => {
                Err(DependencyError::invalid_state("stop", self.state))
            }
            ContainerState::Stopped => {
                debug!("容器 {} 已停止，忽略重复的 stop", self.config.display_name);
                Ok(())
            }
            ContainerState::Unstarted => {
                info!("容器 {} 未启动即停止", self.config.display_name);
                self.state = ContainerState::Stopped;
                Ok(())
            }
        }
    }

    fn state(&self) -> ContainerState {
        self.state
    }
}

impl Drop for DiContainerImpl {
    fn drop(&mut self) {
        if self.state == ContainerState::Started {
            warn!("容器 {} 未显式停止，释放单例", self.config.display_name);
            self.release_singletons();
            self.state = ContainerState::Stopped;
        }
    }
}

/// 容器构建器
///
/// 收集配置与定义，`build` 时一次性注册。
#[derive(Default)]
pub struct DiContainerBuilder {
    config: ContainerConfig,
    definitions: Vec<BeanDefinition>,
}

impl DiContainerBuilder {
    /// 创建空的构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置容器配置
    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    /// 添加 Bean 定义
    pub fn definition(mut self, definition: BeanDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// 构建容器，任何注册失败都会中止构建
    pub fn build(self) -> DependencyResult<DiContainerImpl> {
        let mut container = DiContainerImpl::with_config(self.config);
        let count = self.definitions.len();
        for definition in self.definitions {
            container.register_definition(definition)?;
        }
        info!("构建容器完成，注册了 {} 个 Bean 定义", count);
        Ok(container)
    }
}
