//! 多层缓存存储
//!
//! - L1: 本地内存缓存（快速，但不共享）
//! - L2: 共享缓存，通常是 Redis
//!
//! L2 故障时可降级到 L1。L1 只保存短时间，跨进程的批量失效最多延迟一个 L1 TTL。
//! 写入时传入的 TTL 同样约束 L1 条目

use async_trait::async_trait;
use lockbox_errors::AppResult;
use lockbox_ports::CachePort;
use moka::future::Cache as MokaCache;
use std::sync::Arc;
use std::time::Duration;

use super::memory::Entry;

/// 多层缓存配置
#[derive(Debug, Clone)]
pub struct LayeredCacheConfig {
    /// L1 缓存最大条目数
    pub l1_max_capacity: u64,
    /// L1 缓存 TTL（秒）
    pub l1_ttl_secs: u64,
    /// 是否在 L2 失败时降级到 L1
    pub fallback_to_l1: bool,
}

impl Default for LayeredCacheConfig {
    fn default() -> Self {
        Self {
            l1_max_capacity: 10_000,
            l1_ttl_secs: 60,
            fallback_to_l1: true,
        }
    }
}

#[derive(Clone)]
pub struct LayeredCacheStore {
    l1: MokaCache<String, Entry>,
    l2: Arc<dyn CachePort>,
    config: LayeredCacheConfig,
}

impl LayeredCacheStore {
    pub fn new(l2: Arc<dyn CachePort>, config: LayeredCacheConfig) -> Self {
        let l1 = MokaCache::builder()
            .max_capacity(config.l1_max_capacity)
            .time_to_live(Duration::from_secs(config.l1_ttl_secs))
            .build();

        Self { l1, l2, config }
    }

    async fn invalidate_l1_prefix(&self, prefix: &str) -> u64 {
        let keys: Vec<String> = self
            .l1
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.as_ref().clone())
            .collect();
        for key in &keys {
            self.l1.invalidate(key).await;
        }
        keys.len() as u64
    }

    /// 读取 L1，顺带清理已过期的条目
    async fn get_from_l1(&self, key: &str) -> Option<String> {
        match self.l1.get(key).await {
            Some(entry) if entry.is_expired() => {
                self.l1.invalidate(key).await;
                None
            }
            Some(entry) => Some(entry.value),
            None => None,
        }
    }
}

#[async_trait]
impl CachePort for LayeredCacheStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        // 1. 先查 L1
        if let Some(value) = self.get_from_l1(key).await {
            tracing::debug!(key = %key, "Cache hit in L1");
            return Ok(Some(value));
        }

        // 2. 查 L2
        match self.l2.get(key).await {
            Ok(Some(value)) => {
                tracing::debug!(key = %key, "Cache hit in L2");
                // 回填 L1，L2 的剩余 TTL 未知，只受 L1 TTL 约束
                self.l1.insert(key.to_string(), Entry::new(value.clone(), None)).await;
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "L2 cache error");
                if self.config.fallback_to_l1 {
                    Ok(None)
                } else {
                    Err(e)
                }
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> AppResult<()> {
        self.l1.insert(key.to_string(), Entry::new(value, ttl)).await;

        match self.l2.set(key, value, ttl).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "L2 cache set error");
                if self.config.fallback_to_l1 {
                    // 降级模式：只写 L1 也算成功
                    Ok(())
                } else {
                    Err(e)
                }
            }
        }
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.l1.invalidate(key).await;
        self.l2.delete(key).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        if self.get_from_l1(key).await.is_some() {
            return Ok(true);
        }
        self.l2.exists(key).await
    }

    async fn delete_prefix(&self, prefix: &str) -> AppResult<u64> {
        let local = self.invalidate_l1_prefix(prefix).await;
        // 失效必须到达共享层，这里不降级
        let shared = self.l2.delete_prefix(prefix).await?;
        Ok(shared.max(local))
    }
}
