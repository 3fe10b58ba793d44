//! 查看/编辑判定
//!
//! 按层级顺序判定，命中即停止:
//! 1. 管理员 / 所有者 / 所有者用户组
//! 2. 显式用户授权（列表中第一条为准）
//! 3. 所属用户组包含所有者用户组
//! 4. 用户组授权：主用户组，或开启全组访问时的任意所属用户组（第一条为准）
//! 5. 默认拒绝

use std::collections::HashSet;
use std::sync::Arc;

use lockbox_common::GroupId;
use tracing::debug;

use super::actor::ActorContext;
use super::decision::{AccessOutcome, AccessTier};
use super::grant::GrantSnapshot;
use super::provider::GroupMembershipProvider;
use crate::error::AccessError;

pub struct AccessResolver {
    memberships: Arc<dyn GroupMembershipProvider>,
}

impl AccessResolver {
    pub fn new(memberships: Arc<dyn GroupMembershipProvider>) -> Self {
        Self { memberships }
    }

    pub async fn resolve(
        &self,
        actor: &ActorContext,
        snapshot: &GrantSnapshot,
        full_group_access: bool,
    ) -> Result<AccessOutcome, AccessError> {
        let outcome = self.resolve_tiers(actor, snapshot, full_group_access).await?;
        debug!(
            actor_id = %actor.user_id,
            item_id = %snapshot.item_id,
            tier = %outcome.tier,
            view = outcome.view,
            edit = outcome.edit,
            "Resolved item access"
        );
        Ok(outcome)
    }

    async fn resolve_tiers(
        &self,
        actor: &ActorContext,
        snapshot: &GrantSnapshot,
        full_group_access: bool,
    ) -> Result<AccessOutcome, AccessError> {
        // 1. 管理员 / 所有者
        if actor.is_admin()
            || actor.user_id == snapshot.owner_user_id
            || actor.primary_group_id == snapshot.owner_group_id
        {
            return Ok(AccessOutcome::full(AccessTier::AdminOrOwner));
        }

        // 2. 显式用户授权
        if let Some(grant) = snapshot.first_user_grant(actor.user_id) {
            return Ok(AccessOutcome::explicit_user(grant.can_edit));
        }

        // 3. 用户组继承，从这里开始需要查询成员关系
        let groups: HashSet<GroupId> = self
            .memberships
            .groups_for_user(actor.user_id)
            .await
            .map_err(|source| AccessError::GroupLookup {
                user_id: actor.user_id,
                source,
            })?
            .into_iter()
            .collect();

        if groups.contains(&snapshot.owner_group_id) {
            return Ok(AccessOutcome::full(AccessTier::GroupInheritance));
        }

        // 4. 用户组授权
        let matched = snapshot.first_group_grant(|group_id| {
            group_id == actor.primary_group_id || (full_group_access && groups.contains(&group_id))
        });
        if let Some(grant) = matched {
            return Ok(AccessOutcome::group_grant(grant.can_edit));
        }

        // 5. 默认拒绝
        Ok(AccessOutcome::denied())
    }
}
