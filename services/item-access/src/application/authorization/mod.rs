//! 条目授权查询

mod service;

pub use service::{ActorSession, AuthorizationService};
