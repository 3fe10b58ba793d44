//! 条目授权快照

use chrono::{DateTime, Utc};
use lockbox_common::{GroupId, ItemId, UserId};
use serde::{Deserialize, Serialize};

/// 用户授权
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGrant {
    pub user_id: UserId,
    pub can_edit: bool,
}

/// 用户组授权
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupGrant {
    pub group_id: GroupId,
    pub can_edit: bool,
}

/// 条目授权快照
///
/// 每次请求从条目的存储数据重新构建，不进入缓存。
/// 授权列表保持存储顺序：同一用户/用户组重复出现时以第一条为准。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantSnapshot {
    pub item_id: ItemId,
    pub owner_user_id: UserId,
    pub owner_group_id: GroupId,
    #[serde(default)]
    pub user_grants: Vec<UserGrant>,
    #[serde(default)]
    pub group_grants: Vec<GroupGrant>,
    /// 条目最近一次修改时间
    pub last_modified: DateTime<Utc>,
}

impl GrantSnapshot {
    pub fn new(
        item_id: ItemId,
        owner_user_id: UserId,
        owner_group_id: GroupId,
        last_modified: DateTime<Utc>,
    ) -> Self {
        Self {
            item_id,
            owner_user_id,
            owner_group_id,
            user_grants: Vec::new(),
            group_grants: Vec::new(),
            last_modified,
        }
    }

    pub fn with_user_grant(mut self, user_id: UserId, can_edit: bool) -> Self {
        self.user_grants.push(UserGrant { user_id, can_edit });
        self
    }

    pub fn with_group_grant(mut self, group_id: GroupId, can_edit: bool) -> Self {
        self.group_grants.push(GroupGrant { group_id, can_edit });
        self
    }

    pub fn touched_at(mut self, last_modified: DateTime<Utc>) -> Self {
        self.last_modified = last_modified;
        self
    }

    /// 列表中第一条匹配该用户的授权
    pub fn first_user_grant(&self, user_id: UserId) -> Option<&UserGrant> {
        self.user_grants.iter().find(|g| g.user_id == user_id)
    }

    /// 列表中第一条满足条件的用户组授权
    pub fn first_group_grant<F>(&self, mut matches: F) -> Option<&GroupGrant>
    where
        F: FnMut(GroupId) -> bool,
    {
        self.group_grants.iter().find(|g| matches(g.group_id))
    }
}
