//! 基于会话中角色能力集合的检查

use crate::domain::{ActorContext, Capability, RoleCapabilityChecker};

/// 读取 [`ActorContext::capabilities`]，调用方在组装会话时已展开角色
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileCapabilityChecker;

impl RoleCapabilityChecker for ProfileCapabilityChecker {
    fn check(&self, actor: &ActorContext, capability: Capability) -> bool {
        actor.capabilities.contains(capability)
    }
}
