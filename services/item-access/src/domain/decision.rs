//! 访问决策

use chrono::{DateTime, Utc};
use lockbox_common::{ActionId, ItemId};
use serde::{Deserialize, Serialize};

use super::action::UiAction;

/// 决策来源层级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessTier {
    /// 管理员、所有者或所有者用户组
    AdminOrOwner,
    /// 显式用户授权
    ExplicitUser,
    /// 通过所属用户组继承所有者用户组
    GroupInheritance,
    /// 用户组授权
    GroupGrant,
    /// 默认拒绝
    Default,
}

impl std::fmt::Display for AccessTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessTier::AdminOrOwner => write!(f, "ADMIN_OR_OWNER"),
            AccessTier::ExplicitUser => write!(f, "EXPLICIT_USER"),
            AccessTier::GroupInheritance => write!(f, "GROUP_INHERITANCE"),
            AccessTier::GroupGrant => write!(f, "GROUP_GRANT"),
            AccessTier::Default => write!(f, "DEFAULT_DENY"),
        }
    }
}

/// 查看/编辑判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessOutcome {
    pub view: bool,
    pub edit: bool,
    pub actor_in_explicit_grants: bool,
    pub actor_in_group_grants: bool,
    pub tier: AccessTier,
}

impl AccessOutcome {
    /// 完全访问
    pub fn full(tier: AccessTier) -> Self {
        Self {
            view: true,
            edit: true,
            actor_in_explicit_grants: false,
            actor_in_group_grants: false,
            tier,
        }
    }

    pub fn explicit_user(can_edit: bool) -> Self {
        Self {
            view: true,
            edit: can_edit,
            actor_in_explicit_grants: true,
            actor_in_group_grants: false,
            tier: AccessTier::ExplicitUser,
        }
    }

    pub fn group_grant(can_edit: bool) -> Self {
        Self {
            view: true,
            edit: can_edit,
            actor_in_explicit_grants: false,
            actor_in_group_grants: true,
            tier: AccessTier::GroupGrant,
        }
    }

    pub fn denied() -> Self {
        Self {
            view: false,
            edit: false,
            actor_in_explicit_grants: false,
            actor_in_group_grants: false,
            tier: AccessTier::Default,
        }
    }
}

/// 界面操作可见性
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionVisibility {
    pub view: bool,
    pub edit: bool,
    pub edit_password: bool,
    pub delete: bool,
    pub restore: bool,
    pub copy: bool,
    pub view_secret: bool,
    pub history: bool,
    pub files: bool,
    pub share_link: bool,
    pub show_permission_management: bool,
}

impl ActionVisibility {
    pub fn get(&self, action: UiAction) -> bool {
        match action {
            UiAction::View => self.view,
            UiAction::Edit => self.edit,
            UiAction::EditPassword => self.edit_password,
            UiAction::Delete => self.delete,
            UiAction::Restore => self.restore,
            UiAction::Copy => self.copy,
            UiAction::ViewSecret => self.view_secret,
            UiAction::History => self.history,
            UiAction::Files => self.files,
            UiAction::ShareLink => self.share_link,
        }
    }

    pub fn set(&mut self, action: UiAction, visible: bool) {
        let flag = match action {
            UiAction::View => &mut self.view,
            UiAction::Edit => &mut self.edit,
            UiAction::EditPassword => &mut self.edit_password,
            UiAction::Delete => &mut self.delete,
            UiAction::Restore => &mut self.restore,
            UiAction::Copy => &mut self.copy,
            UiAction::ViewSecret => &mut self.view_secret,
            UiAction::History => &mut self.history,
            UiAction::Files => &mut self.files,
            UiAction::ShareLink => &mut self.share_link,
        };
        *flag = visible;
    }
}

/// 决策作用域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionScope {
    pub item_id: ItemId,
    pub action_id: ActionId,
    /// 只读历史视图
    pub is_history: bool,
}

/// 访问决策（缓存的产物）
///
/// 只能通过 [`AccessDecision::compile`] 构造，构造完成即不可变。
/// 两个完成标记在构造时同时置为 true，缓存中读出的决策若缺少任一标记则视为无效。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    item_id: ItemId,
    action_id: ActionId,
    is_history_context: bool,
    result_view: bool,
    result_edit: bool,
    actor_in_explicit_grants: bool,
    actor_in_group_grants: bool,
    show_permission_management: bool,
    visibility: ActionVisibility,
    tier: AccessTier,
    computed_at: DateTime<Utc>,
    access_compiled: bool,
    visibility_compiled: bool,
}

impl AccessDecision {
    /// 合并访问判定与可见性判定，生成完整决策
    pub fn compile(
        scope: DecisionScope,
        access: AccessOutcome,
        visibility: ActionVisibility,
        computed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            item_id: scope.item_id,
            action_id: scope.action_id,
            is_history_context: scope.is_history,
            result_view: access.view,
            result_edit: access.edit,
            actor_in_explicit_grants: access.actor_in_explicit_grants,
            actor_in_group_grants: access.actor_in_group_grants,
            tier: access.tier,
            access_compiled: true,
            show_permission_management: visibility.show_permission_management,
            visibility,
            visibility_compiled: true,
            computed_at,
        }
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn action_id(&self) -> ActionId {
        self.action_id
    }

    pub fn is_history_context(&self) -> bool {
        self.is_history_context
    }

    pub fn result_view(&self) -> bool {
        self.result_view
    }

    pub fn result_edit(&self) -> bool {
        self.result_edit
    }

    pub fn actor_in_explicit_grants(&self) -> bool {
        self.actor_in_explicit_grants
    }

    pub fn actor_in_group_grants(&self) -> bool {
        self.actor_in_group_grants
    }

    pub fn show_permission_management(&self) -> bool {
        self.show_permission_management
    }

    pub fn visibility(&self) -> &ActionVisibility {
        &self.visibility
    }

    pub fn is_visible(&self, action: UiAction) -> bool {
        self.visibility.get(action)
    }

    pub fn tier(&self) -> AccessTier {
        self.tier
    }

    pub fn computed_at(&self) -> DateTime<Utc> {
        self.computed_at
    }

    pub fn access_compiled(&self) -> bool {
        self.access_compiled
    }

    pub fn visibility_compiled(&self) -> bool {
        self.visibility_compiled
    }

    /// 两个阶段都已完成
    pub fn is_usable(&self) -> bool {
        self.access_compiled && self.visibility_compiled
    }

    /// 条目或用户资料在决策计算之后发生过变更
    pub fn is_stale(
        &self,
        item_last_modified: DateTime<Utc>,
        actor_last_profile_update: DateTime<Utc>,
    ) -> bool {
        item_last_modified > self.computed_at || actor_last_profile_update > self.computed_at
    }
}
