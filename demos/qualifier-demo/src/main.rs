//! # 限定注入演示
//!
//! 六个 `User` Bean：superUser（首选）、user、user1/user2（匿名限定）、
//! user3/user4（`UserGroup` 分组），演示对象按类型、名称、限定标签和分组注入。

use clap::Parser;
use di_abstractions::{
    BeanContainer, BeanDefinition, BeanMetadata, ContainerConfig, InjectionPoint, Injections,
};
use di_impl::DiContainerImpl;
use infrastructure_common::QualifierTag;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "qualifier-demo")]
#[command(about = "限定标签与分组标记的依赖注入演示")]
struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// 被注入的领域对象，只有一个标识
#[derive(Debug)]
struct User {
    id: u64,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User{{id={}}}", self.id)
    }
}

/// 依赖注入的演示对象
#[derive(Debug)]
struct QualifierDemo {
    /// 按类型注入，命中首选 Bean
    user: Arc<User>,
    /// 按名称注入
    named_user: Arc<User>,
    /// 未限定的集合
    all_users: Vec<Arc<User>>,
    /// 匿名限定的集合
    qualified_users: Vec<Arc<User>>,
    /// `UserGroup` 分组
    grouped_users: Vec<Arc<User>>,
}

impl QualifierDemo {
    fn inject(injections: &Injections) -> anyhow::Result<Self> {
        Ok(Self {
            user: injections.single("user")?,
            named_user: injections.single("namedUser")?,
            all_users: injections.collection("allUsers")?,
            qualified_users: injections.collection("qualifiedUsers")?,
            grouped_users: injections.collection("groupedUsers")?,
        })
    }
}

fn register_users(container: &mut DiContainerImpl) -> anyhow::Result<()> {
    container.register_factory_bean(
        "superUser",
        BeanMetadata::new().primary().with_description("超级用户"),
        || User { id: 1 },
    )?;
    container.register_factory_bean("user", BeanMetadata::new(), || User { id: 2 })?;

    for (name, id) in [("user1", 7), ("user2", 8)] {
        container.register_factory_bean(
            name,
            BeanMetadata::new().with_tag(QualifierTag::Anonymous),
            move || User { id },
        )?;
    }
    for (name, id) in [("user3", 9), ("user4", 10)] {
        container.register_factory_bean(
            name,
            BeanMetadata::new().with_tag(QualifierTag::marker("UserGroup")),
            move || User { id },
        )?;
    }
    Ok(())
}

fn register_demo(container: &mut DiContainerImpl) -> anyhow::Result<()> {
    let definition = BeanDefinition::builder::<QualifierDemo>("qualifierDemo")
        .inject("user", InjectionPoint::single::<User>())
        .inject("namedUser", InjectionPoint::single::<User>().named("user"))
        .inject("allUsers", InjectionPoint::collection::<User>())
        .inject("qualifiedUsers", InjectionPoint::collection::<User>().qualified())
        .inject(
            "groupedUsers",
            InjectionPoint::collection::<User>().in_group("UserGroup"),
        )
        .try_factory(|injections| Ok(QualifierDemo::inject(injections)?))
        .build()?;
    container.register_definition(definition)?;
    Ok(())
}

fn print_users(label: &str, users: &[Arc<User>]) {
    info!("demo.{} ========== start ==========", label);
    for user in users {
        info!("{}", user);
    }
    info!("demo.{} ========== end ==========", label);
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let config = ContainerConfig::load(args.config.as_deref())?;
    info!("加载容器配置: {:?}", config);

    let mut container = DiContainerImpl::with_config(config);
    register_users(&mut container)?;
    register_demo(&mut container)?;

    container.start()?;

    let demo = container.get_bean_of_type::<QualifierDemo>()?;
    info!("demo.user = {}", demo.user);
    info!("demo.namedUser = {}", demo.named_user);
    print_users("allUsers", &demo.all_users);
    print_users("qualifiedUsers", &demo.qualified_users);
    print_users("groupedUsers", &demo.grouped_users);

    container.stop()?;
    info!("容器已关闭");
    Ok(())
}
