//! 应用层

pub mod authorization;

pub use authorization::{ActorSession, AuthorizationService};
