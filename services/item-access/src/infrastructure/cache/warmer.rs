//! 决策预热
//!
//! 列表页渲染前为用户预先计算一批条目的 `action_id = 0` 决策

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use lockbox_common::ActionId;
use tracing::{info, warn};

use super::decision_cache::DecisionCache;
use crate::domain::{ActorContext, GrantSnapshot};

const DEFAULT_CONCURRENCY: usize = 8;

/// 预热结果统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarmingReport {
    pub success: usize,
    pub errors: usize,
}

pub struct DecisionWarmer {
    cache: Arc<DecisionCache>,
    concurrency: usize,
}

impl DecisionWarmer {
    pub fn new(cache: Arc<DecisionCache>) -> Self {
        Self {
            cache,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// 单个条目失败只计数，不中断整批
    pub async fn warm(&self, actor: &ActorContext, snapshots: &[GrantSnapshot]) -> WarmingReport {
        info!(
            actor_id = %actor.user_id,
            items = snapshots.len(),
            "Starting decision cache warming"
        );

        let results: Vec<_> = stream::iter(snapshots)
            .map(|snapshot| async move {
                let result = self
                    .cache
                    .get_or_compute(actor, snapshot, ActionId::PRIME, false)
                    .await;
                (snapshot.item_id, result)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut report = WarmingReport::default();
        for (item_id, result) in results {
            match result {
                Ok(_) => report.success += 1,
                Err(e) => {
                    warn!(
                        actor_id = %actor.user_id,
                        item_id = %item_id,
                        error = %e,
                        "Failed to warm decision"
                    );
                    report.errors += 1;
                }
            }
        }

        info!(
            "Decision cache warming completed: {} success, {} errors",
            report.success, report.errors
        );
        report
    }
}
