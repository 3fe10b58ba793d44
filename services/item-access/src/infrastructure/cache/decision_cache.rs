//! 决策缓存
//!
//! 读取 -> 陈旧判定 -> (未命中/陈旧) 重新计算 -> 尽力写回。
//! 缓存层的任何错误都在这里吞掉并上报，不会影响返回给调用方的决策；
//! 用户组查询的错误则原样传播。
//!
//! 不加锁：同一个键的并发未命中会各自计算并写入，结果确定且幂等，后写入者胜出。

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use lockbox_common::ActionId;
use lockbox_config::{AccessConfig, DecisionCacheSettings};
use lockbox_errors::AppResult;
use lockbox_ports::{CachePort, EventSink, NoopEventSink};
use serde_json::json;
use tracing::{debug, warn};

use super::key::DecisionCacheKey;
use crate::domain::{
    AccessDecision, AccessResolver, ActionVisibilityResolver, ActorContext, ConfigProvider,
    DecisionScope, GrantSnapshot, GroupMembershipProvider, RoleCapabilityChecker,
};
use crate::error::AccessError;

/// 决策缓存事件名
pub mod events {
    pub const HIT: &str = "item_access.cache.hit";
    pub const MISS: &str = "item_access.cache.miss";
    pub const LOAD_FAILED: &str = "item_access.cache.load_failed";
    pub const SAVE_FAILED: &str = "item_access.cache.save_failed";
}

/// 决策缓存配置
#[derive(Debug, Clone)]
pub struct DecisionCacheConfig {
    /// 关闭后不读写缓存，每次都重新计算
    pub enabled: bool,
    pub key_prefix: String,
    /// 写入时附带的 TTL，None 表示只依赖陈旧判定
    pub ttl: Option<Duration>,
}

impl Default for DecisionCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            key_prefix: "lockbox:acl".to_string(),
            ttl: None,
        }
    }
}

impl From<&DecisionCacheSettings> for DecisionCacheConfig {
    fn from(settings: &DecisionCacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            key_prefix: settings.key_prefix.clone(),
            ttl: (settings.ttl_secs > 0).then(|| Duration::from_secs(settings.ttl_secs)),
        }
    }
}

/// 未命中原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MissReason {
    Absent,
    Stale,
    Disabled,
}

impl MissReason {
    fn as_str(&self) -> &'static str {
        match self {
            MissReason::Absent => "absent",
            MissReason::Stale => "stale",
            MissReason::Disabled => "disabled",
        }
    }
}

pub struct DecisionCache {
    store: Arc<dyn CachePort>,
    access: AccessResolver,
    visibility: ActionVisibilityResolver,
    settings: Arc<dyn ConfigProvider>,
    events: Arc<dyn EventSink>,
    config: DecisionCacheConfig,
}

impl DecisionCache {
    pub fn new(
        store: Arc<dyn CachePort>,
        memberships: Arc<dyn GroupMembershipProvider>,
        capabilities: Arc<dyn RoleCapabilityChecker>,
    ) -> Self {
        Self {
            store,
            access: AccessResolver::new(memberships),
            visibility: ActionVisibilityResolver::new(capabilities),
            settings: Arc::new(AccessConfig::default()),
            events: Arc::new(NoopEventSink),
            config: DecisionCacheConfig::default(),
        }
    }

    pub fn with_settings(mut self, settings: Arc<dyn ConfigProvider>) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn with_config(mut self, config: DecisionCacheConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &DecisionCacheConfig {
        &self.config
    }

    pub fn key_for(
        &self,
        actor: &ActorContext,
        snapshot: &GrantSnapshot,
        action_id: ActionId,
    ) -> DecisionCacheKey {
        DecisionCacheKey::derive(
            &self.config.key_prefix,
            actor.user_id,
            snapshot.item_id,
            action_id,
        )
    }

    /// 取缓存决策，未命中或已陈旧时重新计算并写回
    pub async fn get_or_compute(
        &self,
        actor: &ActorContext,
        snapshot: &GrantSnapshot,
        action_id: ActionId,
        is_history: bool,
    ) -> AppResult<AccessDecision> {
        if !self.config.enabled {
            self.notify_miss(actor, snapshot, action_id, MissReason::Disabled);
            return self.compute(actor, snapshot, action_id, is_history).await;
        }

        let key = self.key_for(actor, snapshot, action_id);

        let reason = match self.load(&key).await {
            Some(cached) if !cached.is_stale(snapshot.last_modified, actor.last_profile_update) => {
                debug!(
                    key = %key,
                    actor_id = %actor.user_id,
                    item_id = %snapshot.item_id,
                    action_id = %action_id,
                    "Decision cache hit"
                );
                self.events.notify(
                    events::HIT,
                    json!({
                        "actor_id": actor.user_id,
                        "item_id": snapshot.item_id,
                        "action_id": action_id,
                    }),
                );
                return Ok(cached);
            }
            Some(_) => MissReason::Stale,
            None => MissReason::Absent,
        };

        self.notify_miss(actor, snapshot, action_id, reason);
        let decision = self.compute(actor, snapshot, action_id, is_history).await?;
        self.save(&key, &decision).await;
        Ok(decision)
    }

    /// 直接计算决策，不读写缓存
    pub async fn compute(
        &self,
        actor: &ActorContext,
        snapshot: &GrantSnapshot,
        action_id: ActionId,
        is_history: bool,
    ) -> AppResult<AccessDecision> {
        let full_group_access = self.settings.is_full_group_access_enabled();
        let access = self
            .access
            .resolve(actor, snapshot, full_group_access)
            .await?;
        let visibility = self.visibility.resolve(actor);

        let scope = DecisionScope {
            item_id: snapshot.item_id,
            action_id,
            is_history,
        };
        Ok(AccessDecision::compile(scope, access, visibility, Utc::now()))
    }

    async fn load(&self, key: &DecisionCacheKey) -> Option<AccessDecision> {
        match self.try_load(key).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to load cached decision, treating as miss");
                self.events.notify(
                    events::LOAD_FAILED,
                    json!({ "key": key.as_str(), "error": e.to_string() }),
                );
                None
            }
        }
    }

    async fn try_load(
        &self,
        key: &DecisionCacheKey,
    ) -> Result<Option<AccessDecision>, AccessError> {
        let Some(raw) = self
            .store
            .get(key.as_str())
            .await
            .map_err(AccessError::CacheStore)?
        else {
            return Ok(None);
        };

        let decision: AccessDecision = serde_json::from_str(&raw)?;
        if !decision.is_usable() {
            return Err(AccessError::IncompleteDecision(key.to_string()));
        }
        Ok(Some(decision))
    }

    async fn save(&self, key: &DecisionCacheKey, decision: &AccessDecision) {
        if let Err(e) = self.try_save(key, decision).await {
            warn!(key = %key, error = %e, "Failed to save decision, returning it uncached");
            self.events.notify(
                events::SAVE_FAILED,
                json!({ "key": key.as_str(), "error": e.to_string() }),
            );
        }
    }

    async fn try_save(
        &self,
        key: &DecisionCacheKey,
        decision: &AccessDecision,
    ) -> Result<(), AccessError> {
        let raw = serde_json::to_string(decision)?;
        self.store
            .set(key.as_str(), &raw, self.config.ttl)
            .await
            .map_err(AccessError::CacheStore)
    }

    fn notify_miss(
        &self,
        actor: &ActorContext,
        snapshot: &GrantSnapshot,
        action_id: ActionId,
        reason: MissReason,
    ) {
        debug!(
            actor_id = %actor.user_id,
            item_id = %snapshot.item_id,
            action_id = %action_id,
            reason = reason.as_str(),
            "Decision cache miss"
        );
        self.events.notify(
            events::MISS,
            json!({
                "actor_id": actor.user_id,
                "item_id": snapshot.item_id,
                "action_id": action_id,
                "reason": reason.as_str(),
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Capability, UiAction};
    use crate::infrastructure::cache::MemoryCacheStore;
    use async_trait::async_trait;
    use chrono::Duration as ChronoDuration;
    use lockbox_common::{GroupId, ItemId, UserId};
    use lockbox_errors::AppError;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // --- Mocks ---

    #[derive(Default)]
    struct CountingMemberships {
        groups: Vec<GroupId>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GroupMembershipProvider for CountingMemberships {
        async fn groups_for_user(&self, _user_id: UserId) -> AppResult<Vec<GroupId>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.groups.clone())
        }
    }

    struct ProfileChecker;

    impl RoleCapabilityChecker for ProfileChecker {
        fn check(&self, actor: &ActorContext, capability: Capability) -> bool {
            actor.capabilities.contains(capability)
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<String>>,
    }

    impl RecordingSink {
        fn names(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl EventSink for RecordingSink {
        fn notify(&self, name: &str, _payload: serde_json::Value) {
            self.events.lock().unwrap().push(name.to_string());
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl CachePort for BrokenStore {
        async fn get(&self, _key: &str) -> AppResult<Option<String>> {
            Err(AppError::cache("load exploded"))
        }

        async fn set(&self, _key: &str, _value: &str, _ttl: Option<Duration>) -> AppResult<()> {
            Err(AppError::cache("save exploded"))
        }

        async fn delete(&self, _key: &str) -> AppResult<()> {
            Ok(())
        }

        async fn exists(&self, _key: &str) -> AppResult<bool> {
            Ok(false)
        }

        async fn delete_prefix(&self, _prefix: &str) -> AppResult<u64> {
            Ok(0)
        }
    }

    struct Fixture {
        cache: DecisionCache,
        store: Arc<MemoryCacheStore>,
        memberships: Arc<CountingMemberships>,
        sink: Arc<RecordingSink>,
    }

    fn fixture(groups: Vec<i64>) -> Fixture {
        let store = Arc::new(MemoryCacheStore::default());
        let memberships = Arc::new(CountingMemberships {
            groups: groups.into_iter().map(GroupId).collect(),
            ..Default::default()
        });
        let sink = Arc::new(RecordingSink::default());
        let cache = DecisionCache::new(store.clone(), memberships.clone(), Arc::new(ProfileChecker))
            .with_event_sink(sink.clone());
        Fixture {
            cache,
            store,
            memberships,
            sink,
        }
    }

    fn actor() -> ActorContext {
        ActorContext::new(UserId(4), GroupId(4), Utc::now() - ChronoDuration::days(1))
    }

    fn snapshot() -> GrantSnapshot {
        GrantSnapshot::new(ItemId(77), UserId(1), GroupId(1), Utc::now() - ChronoDuration::days(1))
            .with_group_grant(GroupId(4), false)
    }

    // --- Tests ---

    #[tokio::test]
    async fn test_second_call_is_a_hit_without_lookup() {
        let f = fixture(vec![4]);

        let first = f
            .cache
            .get_or_compute(&actor(), &snapshot(), ActionId(1), false)
            .await
            .unwrap();
        let second = f
            .cache
            .get_or_compute(&actor(), &snapshot(), ActionId(1), false)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert!(second.is_usable());
        assert_eq!(f.memberships.calls.load(Ordering::SeqCst), 1);
        assert_eq!(f.sink.names(), vec![events::MISS, events::HIT]);
    }

    #[tokio::test]
    async fn test_item_change_after_compute_makes_entry_stale() {
        let f = fixture(vec![4]);
        let first = f
            .cache
            .get_or_compute(&actor(), &snapshot(), ActionId(1), false)
            .await
            .unwrap();

        let unchanged = snapshot().touched_at(first.computed_at());
        f.cache.get_or_compute(&actor(), &unchanged, ActionId(1), false).await.unwrap();
        assert_eq!(f.memberships.calls.load(Ordering::SeqCst), 1);

        let bumped = snapshot().touched_at(first.computed_at() + ChronoDuration::milliseconds(1));
        let fresh = f.cache.get_or_compute(&actor(), &bumped, ActionId(1), false).await.unwrap();
        assert_eq!(f.memberships.calls.load(Ordering::SeqCst), 2);
        assert!(fresh.computed_at() >= first.computed_at());
        assert_eq!(f.sink.names(), vec![events::MISS, events::HIT, events::MISS]);
    }

    #[tokio::test]
    async fn test_profile_change_after_compute_makes_entry_stale() {
        let f = fixture(vec![4]);
        let first = f
            .cache
            .get_or_compute(&actor(), &snapshot(), ActionId(1), false)
            .await
            .unwrap();

        let mut changed = actor();
        changed.last_profile_update = first.computed_at() + ChronoDuration::seconds(1);
        f.cache.get_or_compute(&changed, &snapshot(), ActionId(1), false).await.unwrap();

        assert_eq!(f.memberships.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_actions_are_cached_independently() {
        let f = fixture(vec![4]);

        let view = f.cache.get_or_compute(&actor(), &snapshot(), ActionId(1), false).await.unwrap();
        let edit = f.cache.get_or_compute(&actor(), &snapshot(), ActionId(2), false).await.unwrap();

        assert_eq!(view.action_id(), ActionId(1));
        assert_eq!(edit.action_id(), ActionId(2));
        assert_eq!(f.memberships.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_misses_on_cold_key_agree() {
        let f = fixture(vec![4]);
        let (actor, snapshot) = (actor(), snapshot());

        let (a, b) = tokio::join!(
            f.cache.get_or_compute(&actor, &snapshot, ActionId(1), false),
            f.cache.get_or_compute(&actor, &snapshot, ActionId(1), false),
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!(a.result_view(), b.result_view());
        assert_eq!(a.result_edit(), b.result_edit());
        assert_eq!(a.tier(), b.tier());
        assert_eq!(a.visibility(), b.visibility());
        assert_eq!(a.show_permission_management(), b.show_permission_management());

        let key = f.cache.key_for(&actor, &snapshot, ActionId(1));
        let raw = f.store.get(key.as_str()).await.unwrap().unwrap();
        let stored: AccessDecision = serde_json::from_str(&raw).unwrap();
        assert!(stored.is_usable());

        let lookups = f.memberships.calls.load(Ordering::SeqCst);
        let third = f.cache.get_or_compute(&actor, &snapshot, ActionId(1), false).await.unwrap();
        assert_eq!(third, stored);
        assert_eq!(f.memberships.calls.load(Ordering::SeqCst), lookups);
        assert_eq!(f.sink.names().last().map(String::as_str), Some(events::HIT));
    }

    #[tokio::test]
    async fn test_store_failures_never_reach_caller() {
        let memberships = Arc::new(CountingMemberships {
            groups: vec![GroupId(4)],
            ..Default::default()
        });
        let sink = Arc::new(RecordingSink::default());
        let cache = DecisionCache::new(
            Arc::new(BrokenStore),
            memberships.clone(),
            Arc::new(ProfileChecker),
        )
        .with_event_sink(sink.clone());

        let decision = cache
            .get_or_compute(&actor(), &snapshot(), ActionId(1), false)
            .await
            .unwrap();
        assert!(decision.result_view());
        assert!(!decision.result_edit());
        assert_eq!(
            sink.names(),
            vec![events::LOAD_FAILED, events::MISS, events::SAVE_FAILED]
        );
    }

    #[tokio::test]
    async fn test_corrupt_and_incomplete_entries_are_recomputed() {
        let f = fixture(vec![4]);
        let key = f.cache.key_for(&actor(), &snapshot(), ActionId(1));

        f.store.set(key.as_str(), "not json", None).await.unwrap();
        let decision = f
            .cache
            .get_or_compute(&actor(), &snapshot(), ActionId(1), false)
            .await
            .unwrap();
        assert!(decision.is_usable());

        let mut payload = serde_json::to_value(&decision).unwrap();
        payload["access_compiled"] = serde_json::Value::Bool(false);
        f.store.set(key.as_str(), &payload.to_string(), None).await.unwrap();
        let again = f
            .cache
            .get_or_compute(&actor(), &snapshot(), ActionId(1), false)
            .await
            .unwrap();
        assert!(again.is_usable());

        assert_eq!(f.memberships.calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            f.sink.names(),
            vec![events::LOAD_FAILED, events::MISS, events::LOAD_FAILED, events::MISS]
        );
    }

    #[tokio::test]
    async fn test_disabled_cache_always_recomputes() {
        let f = fixture(vec![4]);
        let cache = DecisionCache::new(
            f.store.clone(),
            f.memberships.clone(),
            Arc::new(ProfileChecker),
        )
        .with_config(DecisionCacheConfig {
                enabled: false,
                ..DecisionCacheConfig::default()
            });

        cache.get_or_compute(&actor(), &snapshot(), ActionId(1), false).await.unwrap();
        cache.get_or_compute(&actor(), &snapshot(), ActionId(1), false).await.unwrap();

        assert_eq!(f.memberships.calls.load(Ordering::SeqCst), 2);
        let key = cache.key_for(&actor(), &snapshot(), ActionId(1));
        assert!(!f.store.exists(key.as_str()).await.unwrap());
    }

    #[tokio::test]
    async fn test_membership_errors_propagate_and_nothing_is_saved() {
        struct Offline;

        #[async_trait]
        impl GroupMembershipProvider for Offline {
            async fn groups_for_user(&self, _user_id: UserId) -> AppResult<Vec<GroupId>> {
                Err(AppError::database("pool timed out"))
            }
        }

        let store = Arc::new(MemoryCacheStore::default());
        let cache = DecisionCache::new(store.clone(), Arc::new(Offline), Arc::new(ProfileChecker));

        let err = cache
            .get_or_compute(&actor(), &snapshot(), ActionId(1), false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
        let key = cache.key_for(&actor(), &snapshot(), ActionId(1));
        assert!(!store.exists(key.as_str()).await.unwrap());
    }

    #[tokio::test]
    async fn test_full_catalog_is_evaluated_for_any_action() {
        let f = fixture(vec![4]);
        let actor = actor().with_capabilities(
            [Capability::ItemView, Capability::ItemCopy, Capability::ItemFiles]
                .into_iter()
                .collect(),
        );

        let decision = f
            .cache
            .get_or_compute(&actor, &snapshot(), ActionId::PRIME, true)
            .await
            .unwrap();
        assert!(decision.is_history_context());
        assert!(decision.is_visible(UiAction::View));
        assert!(decision.is_visible(UiAction::Copy));
        assert!(decision.is_visible(UiAction::Files));
        assert!(!decision.is_visible(UiAction::Delete));
    }

    #[test]
    fn test_config_from_settings() {
        let settings = DecisionCacheSettings {
            ttl_secs: 120,
            ..DecisionCacheSettings::default()
        };
        let config = DecisionCacheConfig::from(&settings);
        assert!(config.enabled);
        assert_eq!(config.ttl, Some(Duration::from_secs(120)));

        let config = DecisionCacheConfig::from(&DecisionCacheSettings::default());
        assert_eq!(config.ttl, None);
        assert_eq!(config.key_prefix, "lockbox:acl");
    }
}
