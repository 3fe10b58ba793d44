//! 决策缓存键
//!
//! 结构: `{prefix}:{actor}:{item}:{sha256(actor, item, action)}`
//! 同一用户的所有键共享 `{prefix}:{actor}:` 前缀，可整段失效

use lockbox_common::{ActionId, ItemId, UserId};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecisionCacheKey(String);

impl DecisionCacheKey {
    pub fn derive(prefix: &str, actor: UserId, item: ItemId, action: ActionId) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(actor.0.to_be_bytes());
        hasher.update(item.0.to_be_bytes());
        hasher.update(action.0.to_be_bytes());
        let digest = hex::encode(hasher.finalize());

        Self(format!("{}{}", Self::item_namespace(prefix, actor, item), digest))
    }

    /// 用户命名空间
    pub fn actor_namespace(prefix: &str, actor: UserId) -> String {
        format!("{}:{}:", prefix, actor)
    }

    /// 用户命名空间下的条目命名空间
    pub fn item_namespace(prefix: &str, actor: UserId, item: ItemId) -> String {
        format!("{}{}:", Self::actor_namespace(prefix, actor), item)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DecisionCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
