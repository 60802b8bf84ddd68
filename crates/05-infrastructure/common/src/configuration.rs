//! 配置加载
//!
//! 基于 `config` crate 从可选的配置文件和环境变量中绑定类型化配置

use crate::errors::{ConfigError, ConfigResult};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// 环境变量默认前缀
pub const DEFAULT_ENV_PREFIX: &str = "IOC";

/// 配置验证 trait
pub trait ValidatedConfig {
    /// 验证配置
    fn validate(&self) -> ConfigResult<()>;
}

/// 配置加载器
///
/// 配置文件中的值会被同名环境变量覆盖，例如 `IOC__CONTAINER__STRICT_STOP`。
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// 配置文件路径
    file: Option<PathBuf>,
    /// 配置文件是否必须存在
    file_required: bool,
    /// 环境变量前缀
    env_prefix: String,
}

impl ConfigLoader {
    /// 创建新的配置加载器
    pub fn new() -> Self {
        Self {
            file: None,
            file_required: false,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// 设置配置文件
    pub fn with_file(mut self, path: impl AsRef<Path>, required: bool) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self.file_required = required;
        self
    }

    /// 设置环境变量前缀
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// 绑定指定配置节，缺失时使用默认值
    pub fn load_section<T>(&self, section: &str) -> ConfigResult<T>
    where
        T: DeserializeOwned + Default + ValidatedConfig,
    {
        debug!("加载配置节: {} (前缀 {})", section, self.env_prefix);

        let mut builder = config::Config::builder();
        if let Some(path) = &self.file {
            builder = builder.add_source(config::File::from(path.as_path()).required(self.file_required));
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix(&self.env_prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| {
                error!("配置构建失败: {}", e);
                ConfigError::from(e)
            })?;

        let value: T = match settings.get(section) {
            Ok(value) => value,
            Err(config::ConfigError::NotFound(_)) => {
                debug!("配置节 {} 不存在，使用默认值", section);
                T::default()
            }
            Err(e) => {
                error!("配置绑定失败: section={}, error={}", section, e);
                return Err(e.into());
            }
        };

        value.validate()?;
        Ok(value)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
