//! 进程内缓存存储（Moka）

use async_trait::async_trait;
use lockbox_errors::AppResult;
use lockbox_ports::CachePort;
use moka::future::Cache as MokaCache;
use std::time::{Duration, Instant};

/// 带独立过期时间的缓存条目
#[derive(Clone)]
pub(super) struct Entry {
    pub(super) value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    pub(super) fn new(value: impl Into<String>, ttl: Option<Duration>) -> Self {
        Self {
            value: value.into(),
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        }
    }

    pub(super) fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// 进程内缓存
///
/// 按调用方传入的 TTL 逐条过期，容量满时由 Moka 淘汰
#[derive(Clone)]
pub struct MemoryCacheStore {
    entries: MokaCache<String, Entry>,
}

impl MemoryCacheStore {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            entries: MokaCache::builder().max_capacity(max_capacity).build(),
        }
    }

    /// 匹配前缀的键
    fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.as_ref().clone())
            .collect()
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl CachePort for MemoryCacheStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        match self.entries.get(key).await {
            Some(entry) if entry.is_expired() => {
                self.entries.invalidate(key).await;
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> AppResult<()> {
        self.entries.insert(key.to_string(), Entry::new(value, ttl)).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.invalidate(key).await;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.get(key).await?.is_some())
    }

    async fn delete_prefix(&self, prefix: &str) -> AppResult<u64> {
        let keys = self.keys_with_prefix(prefix);
        for key in &keys {
            self.entries.invalidate(key).await;
        }
        Ok(keys.len() as u64)
    }
}
