//! 领域层

pub mod action;
pub mod actor;
pub mod decision;
pub mod grant;
pub mod provider;
pub mod resolver;
pub mod visibility;

pub use action::{Capability, UiAction};
pub use actor::{ActorContext, Capabilities};
pub use decision::{AccessDecision, AccessOutcome, AccessTier, ActionVisibility, DecisionScope};
pub use grant::{GrantSnapshot, GroupGrant, UserGrant};
pub use provider::{BulkInvalidator, ConfigProvider, GroupMembershipProvider, RoleCapabilityChecker};
pub use resolver::AccessResolver;
pub use visibility::ActionVisibilityResolver;
