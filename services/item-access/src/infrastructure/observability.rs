//! 条目访问指标与事件输出

use metrics::{counter, histogram};
use serde_json::Value;
use tracing::{debug, warn};

use lockbox_ports::EventSink;

use crate::domain::AccessDecision;
use crate::infrastructure::cache::events;

/// 记录一次决策结果
pub fn record_decision(decision: &AccessDecision) {
    let labels = [
        ("source", decision.tier().to_string()),
        ("view", decision.result_view().to_string()),
        ("edit", decision.result_edit().to_string()),
    ];
    counter!("item_access_decisions_total", &labels).increment(1);
}

/// 记录决策失败（数据层错误）
pub fn record_decision_error() {
    counter!("item_access_decision_errors_total").increment(1);
}

/// 记录决策耗时
pub fn record_decision_duration(elapsed_ms: f64) {
    histogram!("item_access_decision_duration_ms").record(elapsed_ms);
}

/// 把缓存事件写入日志并计数
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn notify(&self, name: &str, payload: Value) {
        counter!("item_access_cache_events_total", "event" => event_label(name)).increment(1);

        match name {
            events::LOAD_FAILED | events::SAVE_FAILED => {
                warn!(event = name, payload = %payload, "Decision cache event")
            }
            _ => debug!(event = name, payload = %payload, "Decision cache event"),
        }
    }
}

fn event_label(name: &str) -> &'static str {
    match name {
        events::HIT => "hit",
        events::MISS => "miss",
        events::LOAD_FAILED => "load_failed",
        events::SAVE_FAILED => "save_failed",
        _ => "other",
    }
}
