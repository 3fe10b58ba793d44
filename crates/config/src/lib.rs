//! lockbox-config - 配置加载库
//!
//! 加载顺序: `{dir}/default.toml` -> `{dir}/{APP_ENV}.toml` -> `LOCKBOX_` 环境变量
//! 环境变量用 `__` 表示嵌套，例如 `LOCKBOX_ACCESS__FULL_GROUP_ACCESS=true`

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use secrecy::Secret;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Redis 配置
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: Secret<String>,
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// 输出 JSON 格式日志（生产环境）
    #[serde(default)]
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// 决策缓存后端
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// 进程内缓存
    #[default]
    Memory,
    /// Redis
    Redis,
    /// L1 进程内 + L2 Redis
    Layered,
}

impl CacheBackend {
    pub fn requires_redis(&self) -> bool {
        matches!(self, Self::Redis | Self::Layered)
    }
}

/// 决策缓存配置
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionCacheSettings {
    /// 关闭后每次请求都重新计算，不读写缓存
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub backend: CacheBackend,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// 条目 TTL（秒），0 表示不过期，仅依赖陈旧判定
    #[serde(default)]
    pub ttl_secs: u64,
    /// L1 缓存最大条目数
    #[serde(default = "default_l1_max_capacity")]
    pub l1_max_capacity: u64,
    /// L1 缓存 TTL（秒）
    #[serde(default = "default_l1_ttl_secs")]
    pub l1_ttl_secs: u64,
}

impl Default for DecisionCacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: CacheBackend::default(),
            key_prefix: default_key_prefix(),
            ttl_secs: 0,
            l1_max_capacity: default_l1_max_capacity(),
            l1_ttl_secs: default_l1_ttl_secs(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_key_prefix() -> String {
    "lockbox:acl".to_string()
}

fn default_l1_max_capacity() -> u64 {
    10_000
}

fn default_l1_ttl_secs() -> u64 {
    60 // L1 缓存 1 分钟
}

/// 条目访问控制配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccessConfig {
    /// 允许通过任意所属用户组（而不仅是主组）获得组授权
    #[serde(default)]
    pub full_group_access: bool,
    #[serde(default)]
    pub cache: DecisionCacheSettings,
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_name: String,
    #[serde(default = "default_app_env")]
    pub app_env: String,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub access: AccessConfig,
    pub redis: Option<RedisConfig>,
}

fn default_app_env() -> String {
    "development".to_string()
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config: Self = Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed("LOCKBOX_").split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// 校验跨字段约束
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access.cache.backend.requires_redis() && self.redis.is_none() {
            return Err(ConfigError::Invalid(format!(
                "cache backend {:?} requires a [redis] section",
                self.access.cache.backend
            )));
        }
        if self.access.cache.key_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "access.cache.key_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// 是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}
