//! 配置接入

use std::sync::Arc;
use std::time::Duration;

use lockbox_adapter_redis::{RedisCache, check_connection, create_connection_manager};
use lockbox_config::{AccessConfig, AppConfig, CacheBackend};
use lockbox_errors::{AppError, AppResult};
use lockbox_ports::CachePort;
use secrecy::ExposeSecret;
use tracing::info;

use crate::domain::ConfigProvider;
use crate::infrastructure::cache::{LayeredCacheConfig, LayeredCacheStore, MemoryCacheStore};

impl ConfigProvider for AccessConfig {
    fn is_full_group_access_enabled(&self) -> bool {
        self.full_group_access
    }
}

/// 按配置构建决策缓存后端
pub async fn build_cache_store(config: &AppConfig) -> AppResult<Arc<dyn CachePort>> {
    let cache = &config.access.cache;

    let store: Arc<dyn CachePort> = match cache.backend {
        CacheBackend::Memory => Arc::new(MemoryCacheStore::new(cache.l1_max_capacity)),
        CacheBackend::Redis => Arc::new(connect_redis(config).await?),
        CacheBackend::Layered => {
            let l2: Arc<dyn CachePort> = Arc::new(connect_redis(config).await?);
            Arc::new(LayeredCacheStore::new(
                l2,
                LayeredCacheConfig {
                    l1_max_capacity: cache.l1_max_capacity,
                    l1_ttl_secs: cache.l1_ttl_secs,
                    ..LayeredCacheConfig::default()
                },
            ))
        }
    };

    info!(
        backend = ?cache.backend,
        ttl = ?(cache.ttl_secs > 0).then(|| Duration::from_secs(cache.ttl_secs)),
        "Decision cache store ready"
    );
    Ok(store)
}

async fn connect_redis(config: &AppConfig) -> AppResult<RedisCache> {
    let redis = config
        .redis
        .as_ref()
        .ok_or_else(|| AppError::validation("cache backend requires a [redis] section"))?;
    let mut conn = create_connection_manager(redis.url.expose_secret()).await?;
    check_connection(&mut conn).await?;
    Ok(RedisCache::new(conn))
}
