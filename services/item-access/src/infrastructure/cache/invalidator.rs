//! 按用户批量失效
//!
//! 用户组成员关系变更不会体现在任何时间戳上，需要调用方主动清除该用户的决策

use std::sync::Arc;

use async_trait::async_trait;
use lockbox_common::{ItemId, UserId};
use lockbox_errors::AppResult;
use lockbox_ports::CachePort;
use tracing::info;

use super::key::DecisionCacheKey;
use crate::domain::BulkInvalidator;

pub struct CacheBulkInvalidator {
    store: Arc<dyn CachePort>,
    key_prefix: String,
}

impl CacheBulkInvalidator {
    pub fn new(store: Arc<dyn CachePort>, key_prefix: impl Into<String>) -> Self {
        Self {
            store,
            key_prefix: key_prefix.into(),
        }
    }

    /// 清除该用户在某个条目上的全部决策
    pub async fn clear_item_for_actor(&self, user_id: UserId, item_id: ItemId) -> AppResult<u64> {
        let namespace = DecisionCacheKey::item_namespace(&self.key_prefix, user_id, item_id);
        let removed = self.store.delete_prefix(&namespace).await?;
        info!(
            actor_id = %user_id,
            item_id = %item_id,
            removed,
            "Cleared cached item decisions"
        );
        Ok(removed)
    }
}

#[async_trait]
impl BulkInvalidator for CacheBulkInvalidator {
    async fn clear_all_for_actor(&self, user_id: UserId) -> AppResult<u64> {
        let namespace = DecisionCacheKey::actor_namespace(&self.key_prefix, user_id);
        let removed = self.store.delete_prefix(&namespace).await?;
        info!(actor_id = %user_id, removed, "Cleared cached decisions for actor");
        Ok(removed)
    }
}
