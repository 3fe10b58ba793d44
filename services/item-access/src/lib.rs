//! Item Access - 条目访问控制引擎
//!
//! 分层结构：
//! - `domain`: 访问判定、可见性判定、访问决策
//! - `infrastructure`: 决策缓存、缓存后端、指标
//! - `application`: 对外的授权服务

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::{ActorSession, AuthorizationService};
pub use domain::{
    AccessDecision, AccessTier, ActorContext, Capabilities, Capability, GrantSnapshot, UiAction,
};
pub use error::AccessError;
