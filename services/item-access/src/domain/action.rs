//! 界面操作目录与能力常量

use lockbox_common::ActionId;
use serde::{Deserialize, Serialize};

/// 角色配置中的单项能力
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ItemView,
    ItemEdit,
    ItemEditPassword,
    ItemDelete,
    ItemRestore,
    ItemCopy,
    ItemViewSecret,
    ItemHistory,
    ItemFiles,
    ItemShareLink,
    /// 管理条目的用户/用户组授权
    ResourcePermissionManagement,
}

impl Capability {
    /// 能力代码 (如 "item:view")
    pub fn code(&self) -> &'static str {
        match self {
            Capability::ItemView => "item:view",
            Capability::ItemEdit => "item:edit",
            Capability::ItemEditPassword => "item:edit_password",
            Capability::ItemDelete => "item:delete",
            Capability::ItemRestore => "item:restore",
            Capability::ItemCopy => "item:copy",
            Capability::ItemViewSecret => "item:view_secret",
            Capability::ItemHistory => "item:history",
            Capability::ItemFiles => "item:files",
            Capability::ItemShareLink => "item:share_link",
            Capability::ResourcePermissionManagement => "item:permission_management",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// 界面操作
///
/// 目录固定，每次决策都会计算全部操作的可见性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiAction {
    View,
    Edit,
    EditPassword,
    Delete,
    Restore,
    Copy,
    ViewSecret,
    History,
    Files,
    ShareLink,
}

impl UiAction {
    pub const ALL: [UiAction; 10] = [
        UiAction::View,
        UiAction::Edit,
        UiAction::EditPassword,
        UiAction::Delete,
        UiAction::Restore,
        UiAction::Copy,
        UiAction::ViewSecret,
        UiAction::History,
        UiAction::Files,
        UiAction::ShareLink,
    ];

    /// 对应的能力常量
    pub fn capability(&self) -> Capability {
        match self {
            UiAction::View => Capability::ItemView,
            UiAction::Edit => Capability::ItemEdit,
            UiAction::EditPassword => Capability::ItemEditPassword,
            UiAction::Delete => Capability::ItemDelete,
            UiAction::Restore => Capability::ItemRestore,
            UiAction::Copy => Capability::ItemCopy,
            UiAction::ViewSecret => Capability::ItemViewSecret,
            UiAction::History => Capability::ItemHistory,
            UiAction::Files => Capability::ItemFiles,
            UiAction::ShareLink => Capability::ItemShareLink,
        }
    }

    /// 操作 ID，从 1 开始；0 保留给缓存预热
    pub fn action_id(&self) -> ActionId {
        let position = Self::ALL
            .iter()
            .position(|a| a == self)
            .unwrap_or_default();
        ActionId(position as u32 + 1)
    }

    pub fn from_action_id(id: ActionId) -> Option<Self> {
        if id.is_prime() {
            return None;
        }
        Self::ALL.get(id.0 as usize - 1).copied()
    }
}
