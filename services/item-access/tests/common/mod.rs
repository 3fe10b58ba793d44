//! 集成测试共用的替身实现

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use item_access::domain::GroupMembershipProvider;
use item_access::infrastructure::{DecisionCache, MemoryCacheStore, ProfileCapabilityChecker};
use item_access::{ActorContext, GrantSnapshot};
use lockbox_common::{GroupId, ItemId, UserId};
use lockbox_errors::{AppError, AppResult};
use lockbox_ports::{CachePort, EventSink};

/// 记录查询次数的成员关系表
#[derive(Default)]
pub struct CountingDirectory {
    groups: HashMap<UserId, Vec<GroupId>>,
    lookups: AtomicUsize,
}

impl CountingDirectory {
    pub fn with_user(mut self, user: i64, groups: &[i64]) -> Self {
        self.groups
            .insert(UserId(user), groups.iter().copied().map(GroupId).collect());
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GroupMembershipProvider for CountingDirectory {
    async fn groups_for_user(&self, user_id: UserId) -> AppResult<Vec<GroupId>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.groups.get(&user_id).cloned().unwrap_or_default())
    }
}

/// 记录事件名称和内容
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(String, serde_json::Value)>>,
}

impl RecordingSink {
    pub fn names(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn last(&self) -> Option<(String, serde_json::Value)> {
        self.events.lock().unwrap().last().cloned()
    }
}

impl EventSink for RecordingSink {
    fn notify(&self, name: &str, payload: serde_json::Value) {
        self.events.lock().unwrap().push((name.to_string(), payload));
    }
}

/// 读写都失败的缓存后端
pub struct FailingStore;

#[async_trait]
impl CachePort for FailingStore {
    async fn get(&self, _key: &str) -> AppResult<Option<String>> {
        Err(AppError::cache("connection refused"))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Option<Duration>) -> AppResult<()> {
        Err(AppError::cache("connection refused"))
    }

    async fn delete(&self, _key: &str) -> AppResult<()> {
        Err(AppError::cache("connection refused"))
    }

    async fn exists(&self, _key: &str) -> AppResult<bool> {
        Err(AppError::cache("connection refused"))
    }

    async fn delete_prefix(&self, _prefix: &str) -> AppResult<u64> {
        Err(AppError::cache("connection refused"))
    }
}

pub fn yesterday() -> DateTime<Utc> {
    Utc::now() - chrono::Duration::days(1)
}

pub fn actor(user: i64, group: i64) -> ActorContext {
    ActorContext::new(UserId(user), GroupId(group), yesterday())
}

/// 所有者为用户 1 / 用户组 1 的条目
pub fn item(id: i64) -> GrantSnapshot {
    GrantSnapshot::new(ItemId(id), UserId(1), GroupId(1), yesterday())
}

pub fn memory_cache(directory: Arc<CountingDirectory>) -> DecisionCache {
    DecisionCache::new(
        Arc::new(MemoryCacheStore::default()),
        directory,
        Arc::new(ProfileCapabilityChecker),
    )
}
