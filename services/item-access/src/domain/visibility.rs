//! 界面操作可见性判定

use std::sync::Arc;

use super::action::UiAction;
use super::actor::ActorContext;
use super::decision::ActionVisibility;
use super::provider::RoleCapabilityChecker;

pub struct ActionVisibilityResolver {
    checker: Arc<dyn RoleCapabilityChecker>,
}

impl ActionVisibilityResolver {
    pub fn new(checker: Arc<dyn RoleCapabilityChecker>) -> Self {
        Self { checker }
    }

    /// 计算整个操作目录的可见性，与触发本次计算的操作无关，
    /// 同一决策可以回答任意兄弟操作的查询
    pub fn resolve(&self, actor: &ActorContext) -> ActionVisibility {
        let mut visibility = ActionVisibility::default();
        for action in UiAction::ALL {
            visibility.set(action, self.checker.check(actor, action.capability()));
        }
        // 授权管理不走外部检查
        visibility.show_permission_management = actor.can_manage_permissions();
        visibility
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::action::Capability;
    use crate::domain::provider::MockRoleCapabilityChecker;
    use chrono::Utc;
    use lockbox_common::{GroupId, UserId};

    fn actor() -> ActorContext {
        ActorContext::new(UserId(5), GroupId(5), Utc::now())
    }

    #[test]
    fn test_every_catalog_action_is_checked_once() {
        let mut checker = MockRoleCapabilityChecker::new();
        checker
            .expect_check()
            .times(UiAction::ALL.len())
            .returning(|_, capability| {
                matches!(capability, Capability::ItemView | Capability::ItemHistory)
            });
        let resolver = ActionVisibilityResolver::new(Arc::new(checker));

        let visibility = resolver.resolve(&actor());
        assert!(visibility.view);
        assert!(visibility.history);
        assert!(!visibility.edit);
        assert!(!visibility.share_link);
        assert!(!visibility.show_permission_management);
    }

    #[test]
    fn test_permission_management_bypasses_checker() {
        let mut checker = MockRoleCapabilityChecker::new();
        checker
            .expect_check()
            .withf(|_, capability| *capability != Capability::ResourcePermissionManagement)
            .returning(|_, _| false);
        let resolver = ActionVisibilityResolver::new(Arc::new(checker));

        let visibility = resolver.resolve(&actor().with_admin_resource(true));
        assert!(visibility.show_permission_management);
        assert!(UiAction::ALL.iter().all(|a| !visibility.get(*a)));
    }
}
