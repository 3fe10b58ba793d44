//! 引擎依赖的外部协作方

use async_trait::async_trait;
use lockbox_common::{GroupId, UserId};
use lockbox_errors::AppResult;

use super::action::Capability;
use super::actor::ActorContext;

/// 用户组成员关系查询
///
/// 数据层错误会原样向上传播，不做降级
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupMembershipProvider: Send + Sync {
    /// 用户所属的全部用户组
    async fn groups_for_user(&self, user_id: UserId) -> AppResult<Vec<GroupId>>;
}

/// 角色能力检查（角色数据随会话加载，不会失败）
#[cfg_attr(test, mockall::automock)]
pub trait RoleCapabilityChecker: Send + Sync {
    fn check(&self, actor: &ActorContext, capability: Capability) -> bool;
}

/// 运行时配置
pub trait ConfigProvider: Send + Sync {
    /// 是否允许通过任意所属用户组获得用户组授权
    fn is_full_group_access_enabled(&self) -> bool;
}

/// 按用户批量清除缓存决策
#[async_trait]
pub trait BulkInvalidator: Send + Sync {
    /// 删除该用户名下的全部决策，返回删除数量
    async fn clear_all_for_actor(&self, user_id: UserId) -> AppResult<u64>;
}
