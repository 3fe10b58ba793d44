//! 可观测事件出口

use serde_json::Value;

/// 事件接收者
///
/// 只发不收：实现不得阻塞，也不能影响调用方的控制流
pub trait EventSink: Send + Sync {
    fn notify(&self, name: &str, payload: Value);
}

/// 丢弃所有事件
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn notify(&self, _name: &str, _payload: Value) {}
}
