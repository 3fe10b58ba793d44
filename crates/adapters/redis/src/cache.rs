//! Redis Cache 实现

use async_trait::async_trait;
use lockbox_errors::{AppError, AppResult};
use lockbox_ports::CachePort;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;
use tracing::debug;

/// 每轮 SCAN 的建议批量
const DEFAULT_SCAN_COUNT: usize = 500;

/// Redis Cache
pub struct RedisCache {
    conn: ConnectionManager,
    scan_count: usize,
}

impl RedisCache {
    pub fn new(conn: ConnectionManager) -> Self {
        Self {
            conn,
            scan_count: DEFAULT_SCAN_COUNT,
        }
    }

    pub fn with_scan_count(mut self, scan_count: usize) -> Self {
        self.scan_count = scan_count.max(1);
        self
    }
}

/// 转义 glob 元字符，保证前缀按字面匹配
pub fn escape_glob(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// PSETEX 的过期毫秒数，Redis 拒绝 0
fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

#[async_trait]
impl CachePort for RedisCache {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.conn.clone();
        conn.get(key)
            .await
            .map_err(|e| AppError::cache(format!("Redis get failed: {}", e)))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> AppResult<()> {
        let mut conn = self.conn.clone();
        match ttl {
            Some(duration) => conn
                .pset_ex(key, value, ttl_millis(duration))
                .await
                .map_err(|e| AppError::cache(format!("Redis set failed: {}", e))),
            None => conn
                .set(key, value)
                .await
                .map_err(|e| AppError::cache(format!("Redis set failed: {}", e))),
        }
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        conn.del(key)
            .await
            .map_err(|e| AppError::cache(format!("Redis delete failed: {}", e)))
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.conn.clone();
        conn.exists(key)
            .await
            .map_err(|e| AppError::cache(format!("Redis exists failed: {}", e)))
    }

    async fn delete_prefix(&self, prefix: &str) -> AppResult<u64> {
        let mut conn = self.conn.clone();
        let pattern = format!("{}*", escape_glob(prefix));
        let mut cursor: u64 = 0;
        let mut deleted: u64 = 0;

        // SCAN 不阻塞服务端，KEYS 在大实例上不可用
        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(self.scan_count)
                .query_async(&mut conn)
                .await
                .map_err(|e| AppError::cache(format!("Redis scan failed: {}", e)))?;

            if !keys.is_empty() {
                let removed: u64 = conn
                    .del(&keys)
                    .await
                    .map_err(|e| AppError::cache(format!("Redis delete failed: {}", e)))?;
                deleted += removed;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!(prefix = %prefix, deleted, "Deleted Redis keys by prefix");
        Ok(deleted)
    }
}
