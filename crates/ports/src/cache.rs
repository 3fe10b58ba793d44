//! Cache trait 定义

use async_trait::async_trait;
use lockbox_errors::AppResult;
use std::time::Duration;

/// 缓存 trait
///
/// 键按 `:` 分段组织，`delete_prefix` 依赖这一约定实现整段失效
#[async_trait]
pub trait CachePort: Send + Sync {
    /// 获取缓存值
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// 设置缓存值
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> AppResult<()>;

    /// 删除缓存
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// 检查是否存在
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// 删除所有以 `prefix` 开头的键，返回删除数量（后端无法统计时返回 0）
    async fn delete_prefix(&self, prefix: &str) -> AppResult<u64>;
}
