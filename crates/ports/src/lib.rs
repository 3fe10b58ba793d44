//! ports - 抽象 trait 层
//!
//! 定义基础设施的抽象接口

mod cache;
mod event_sink;

pub use cache::*;
pub use event_sink::*;
