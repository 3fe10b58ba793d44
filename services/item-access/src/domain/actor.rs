//! 请求主体上下文

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use lockbox_common::{GroupId, UserId};
use serde::{Deserialize, Serialize};

use super::action::Capability;

/// 角色配置授予的能力集合
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capabilities(BTreeSet<Capability>);

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, capability: Capability) -> Self {
        self.0.insert(capability);
        self
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.0.iter()
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// 当前请求的主体
///
/// 由调用方根据会话和角色配置组装，引擎只读
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    pub user_id: UserId,
    /// 主用户组
    pub primary_group_id: GroupId,
    /// 应用级管理员
    #[serde(default)]
    pub is_admin_app: bool,
    /// 条目域超级管理员
    #[serde(default)]
    pub is_admin_resource: bool,
    /// 用户资料（角色、用户组等）最近一次变更时间
    pub last_profile_update: DateTime<Utc>,
    #[serde(default)]
    pub capabilities: Capabilities,
}

impl ActorContext {
    pub fn new(
        user_id: UserId,
        primary_group_id: GroupId,
        last_profile_update: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            primary_group_id,
            is_admin_app: false,
            is_admin_resource: false,
            last_profile_update,
            capabilities: Capabilities::default(),
        }
    }

    pub fn with_admin_app(mut self, is_admin_app: bool) -> Self {
        self.is_admin_app = is_admin_app;
        self
    }

    pub fn with_admin_resource(mut self, is_admin_resource: bool) -> Self {
        self.is_admin_resource = is_admin_resource;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// 任一管理员身份
    pub fn is_admin(&self) -> bool {
        self.is_admin_app || self.is_admin_resource
    }

    /// 是否可以管理条目授权
    pub fn can_manage_permissions(&self) -> bool {
        self.is_admin() || self.capabilities.contains(Capability::ResourcePermissionManagement)
    }
}
