//! Centralized integration tests for di-impl crate: qualifier and group resolution

use di_abstractions::{
    BeanContainer, BeanDefinition, BeanMetadata, InjectionPoint, Injections,
};
use di_impl::DiContainerImpl;
use infrastructure_common::{ContainerState, DependencyError, QualifierTag};
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[derive(Debug, PartialEq, Eq)]
struct User {
    id: u64,
}

/// 依赖四个 User Bean 的演示对象
#[derive(Debug)]
struct QualifierDemo {
    user: Arc<User>,
    named_user: Arc<User>,
    all_users: Vec<Arc<User>>,
    qualified_users: Vec<Arc<User>>,
    grouped_users: Vec<Arc<User>>,
}

impl QualifierDemo {
    fn from_injections(injections: &Injections) -> anyhow::Result<Self> {
        Ok(Self {
            user: injections.single("user")?,
            named_user: injections.single("namedUser")?,
            all_users: injections.collection("allUsers")?,
            qualified_users: injections.collection("qualifiedUsers")?,
            grouped_users: injections.collection("groupedUsers")?,
        })
    }
}

fn ids(users: &[Arc<User>]) -> Vec<u64> {
    users.iter().map(|u| u.id).collect()
}

/// superUser(primary) / user / user1、user2(@Qualifier) / user3、user4(@UserGroup)
fn scenario() -> DiContainerImpl {
    let mut container = DiContainerImpl::new();

    container
        .register_factory_bean("superUser", BeanMetadata::new().primary(), || User { id: 1 })
        .unwrap();
    container
        .register_factory_bean("user", BeanMetadata::new(), || User { id: 2 })
        .unwrap();
    for (name, id) in [("user1", 7), ("user2", 8)] {
        container
            .register_factory_bean(
                name,
                BeanMetadata::new().with_tag(QualifierTag::Anonymous),
                move || User { id },
            )
            .unwrap();
    }
    for (name, id) in [("user3", 9), ("user4", 10)] {
        container
            .register_factory_bean(
                name,
                BeanMetadata::new().with_tag(QualifierTag::marker("UserGroup")),
                move || User { id },
            )
            .unwrap();
    }

    container
        .register_definition(
            BeanDefinition::builder::<QualifierDemo>("qualifierDemo")
                .inject("user", InjectionPoint::single::<User>())
                .inject("namedUser", InjectionPoint::single::<User>().named("user"))
                .inject("allUsers", InjectionPoint::collection::<User>())
                .inject("qualifiedUsers", InjectionPoint::collection::<User>().qualified())
                .inject(
                    "groupedUsers",
                    InjectionPoint::collection::<User>().in_group("UserGroup"),
                )
                .try_factory(|injections| Ok(QualifierDemo::from_injections(injections)?))
                .build()
                .unwrap(),
        )
        .unwrap();

    container
}

#[test]
fn test_demo_fields_are_injected() {
    init_test_logger();
    let mut container = scenario();
    container.start().unwrap();

    let demo = container.get_bean_of_type::<QualifierDemo>().unwrap();
    assert_eq!(demo.user.id, 1);
    assert_eq!(demo.named_user.id, 2);
    assert_eq!(ids(&demo.all_users), vec![1, 2]);
    assert_eq!(ids(&demo.qualified_users), vec![7, 8]);
    assert_eq!(ids(&demo.grouped_users), vec![9, 10]);

    container.stop().unwrap();
}

#[test]
fn test_injected_beans_are_the_cached_singletons() {
    let mut container = scenario();
    container.start().unwrap();

    let demo = container.get_bean_as::<QualifierDemo>("qualifierDemo").unwrap();
    let super_user = container.get_bean_as::<User>("superUser").unwrap();
    let user = container.get_bean_as::<User>("user").unwrap();

    assert!(Arc::ptr_eq(&demo.user, &super_user));
    assert!(Arc::ptr_eq(&demo.named_user, &user));
    assert!(Arc::ptr_eq(&demo.all_users[1], &user));
    assert!(Arc::ptr_eq(&container.get_bean_of_type::<User>().unwrap(), &super_user));
}

#[test]
fn test_explicit_name_ignores_primary() {
    let mut container = scenario();
    container.start().unwrap();

    let named = container
        .resolve(&InjectionPoint::single::<User>().named("superUser"))
        .unwrap();
    assert_eq!(named.bean_names(), vec!["superUser"]);

    let named = container
        .resolve(&InjectionPoint::single::<User>().named("user3"))
        .unwrap();
    assert_eq!(named.bean_names(), vec!["user3"]);
}

#[test]
fn test_group_marker_never_leaks_into_anonymous_query() {
    let mut container = scenario();
    container.start().unwrap();

    let qualified = container
        .resolve(&InjectionPoint::collection::<User>().qualified())
        .unwrap();
    assert_eq!(qualified.bean_names(), vec!["user1", "user2"]);

    let named_tag = container
        .resolve(&InjectionPoint::collection::<User>().with_tag(QualifierTag::named("UserGroup")))
        .unwrap();
    assert!(named_tag.bean_names().is_empty());
}

#[test]
fn test_bean_with_both_tag_kinds_appears_in_both_groups() {
    let mut container = DiContainerImpl::new();
    container
        .register_factory_bean(
            "user5",
            BeanMetadata::new()
                .with_tag(QualifierTag::Anonymous)
                .with_tag(QualifierTag::marker("UserGroup")),
            || User { id: 11 },
        )
        .unwrap();
    container
        .register_factory_bean("user1", BeanMetadata::new().with_tag(QualifierTag::Anonymous), || {
            User { id: 7 }
        })
        .unwrap();
    container.start().unwrap();

    let qualified = container
        .resolve(&InjectionPoint::collection::<User>().qualified())
        .unwrap();
    assert_eq!(qualified.bean_names(), vec!["user5", "user1"]);

    let grouped = container
        .resolve(&InjectionPoint::collection::<User>().in_group("UserGroup"))
        .unwrap();
    assert_eq!(grouped.bean_names(), vec!["user5"]);

    let both = container
        .resolve(
            &InjectionPoint::collection::<User>()
                .qualified()
                .in_group("UserGroup"),
        )
        .unwrap();
    assert_eq!(both.bean_names(), vec!["user5"]);
}

#[test]
fn test_duplicate_registration_is_atomic() {
    let mut container = scenario();
    let err = container
        .register_factory_bean(
            "user",
            BeanMetadata::new().with_tag(QualifierTag::Anonymous),
            || User { id: 99 },
        )
        .unwrap_err();
    assert!(matches!(err, DependencyError::DuplicateBeanName { .. }));

    container.start().unwrap();
    assert_eq!(container.get_bean_as::<User>("user").unwrap().id, 2);
    let qualified = container
        .resolve(&InjectionPoint::collection::<User>().qualified())
        .unwrap();
    assert_eq!(qualified.bean_names(), vec!["user1", "user2"]);
}

#[test]
fn test_container_lifecycle() {
    let mut container = scenario();
    assert_eq!(container.state(), ContainerState::Unstarted);

    container.start().unwrap();
    assert_eq!(container.state(), ContainerState::Started);
    assert_eq!(container.stats().active_singletons, 7);

    container.stop().unwrap();
    assert_eq!(container.state(), ContainerState::Stopped);
    assert_eq!(container.stats().active_singletons, 0);
    assert!(container.get_bean("user").is_err());
    container.stop().unwrap();
}
