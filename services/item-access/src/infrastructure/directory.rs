//! 静态用户组目录

use std::collections::HashMap;

use async_trait::async_trait;
use lockbox_common::{GroupId, UserId};
use lockbox_errors::AppResult;

use crate::domain::GroupMembershipProvider;

/// 内存中的成员关系表，未登记的用户没有任何用户组
#[derive(Debug, Clone, Default)]
pub struct StaticGroupDirectory {
    memberships: HashMap<UserId, Vec<GroupId>>,
}

impl StaticGroupDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user_id: UserId, groups: impl IntoIterator<Item = GroupId>) -> Self {
        self.memberships.entry(user_id).or_default().extend(groups);
        self
    }
}

impl FromIterator<(UserId, Vec<GroupId>)> for StaticGroupDirectory {
    fn from_iter<I: IntoIterator<Item = (UserId, Vec<GroupId>)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |dir, (user, groups)| dir.with_user(user, groups))
    }
}

#[async_trait]
impl GroupMembershipProvider for StaticGroupDirectory {
    async fn groups_for_user(&self, user_id: UserId) -> AppResult<Vec<GroupId>> {
        Ok(self.memberships.get(&user_id).cloned().unwrap_or_default())
    }
}
