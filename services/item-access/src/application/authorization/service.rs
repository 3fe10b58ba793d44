//! 条目授权服务
//!
//! 对外的访问决策入口：当前会话的主体 + 条目快照 -> 访问决策

use std::sync::Arc;
use std::time::Instant;

use lockbox_common::{ActionId, UserId};
use lockbox_errors::{AppError, AppResult};

use crate::domain::{AccessDecision, ActorContext, BulkInvalidator, GrantSnapshot};
use crate::infrastructure::cache::DecisionCache;
use crate::infrastructure::observability;

/// 当前请求的会话
pub trait ActorSession: Send + Sync {
    fn actor_context(&self) -> &ActorContext;
}

impl ActorSession for ActorContext {
    fn actor_context(&self) -> &ActorContext {
        self
    }
}

/// 条目授权服务
///
/// 每个请求构造一次，绑定当前会话；决策缓存和失效器在请求之间共享
pub struct AuthorizationService<S>
where
    S: ActorSession,
{
    cache: Arc<DecisionCache>,
    session: S,
    invalidator: Option<Arc<dyn BulkInvalidator>>,
}

impl<S> AuthorizationService<S>
where
    S: ActorSession,
{
    pub fn new(cache: Arc<DecisionCache>, session: S) -> Self {
        Self {
            cache,
            session,
            invalidator: None,
        }
    }

    pub fn with_invalidator(mut self, invalidator: Arc<dyn BulkInvalidator>) -> Self {
        self.invalidator = Some(invalidator);
        self
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// 当前主体对条目的访问决策
    pub async fn get_acl(
        &self,
        action_id: ActionId,
        snapshot: &GrantSnapshot,
        is_history: bool,
    ) -> AppResult<AccessDecision> {
        let start = Instant::now();

        let result = self
            .cache
            .get_or_compute(self.session.actor_context(), snapshot, action_id, is_history)
            .await;

        match &result {
            Ok(decision) => observability::record_decision(decision),
            Err(_) => observability::record_decision_error(),
        }
        observability::record_decision_duration(start.elapsed().as_millis() as f64);

        result
    }

    /// 是否显示授权管理入口，仅取决于主体本身
    pub fn get_show_permission(actor: &ActorContext) -> bool {
        actor.can_manage_permissions()
    }

    /// 清除某个用户的全部缓存决策（成员关系变更后调用）
    pub async fn invalidate_actor(&self, user_id: UserId) -> AppResult<u64> {
        let invalidator = self
            .invalidator
            .as_ref()
            .ok_or_else(|| AppError::internal("no bulk invalidator configured"))?;
        invalidator.clear_all_for_actor(user_id).await
    }
}
