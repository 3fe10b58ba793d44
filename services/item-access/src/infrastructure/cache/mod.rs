//! 决策缓存

mod decision_cache;
mod invalidator;
mod key;
mod layered;
mod memory;
mod warmer;

pub use decision_cache::{DecisionCache, DecisionCacheConfig, events};
pub use invalidator::CacheBulkInvalidator;
pub use key::DecisionCacheKey;
pub use layered::{LayeredCacheConfig, LayeredCacheStore};
pub use memory::MemoryCacheStore;
pub use warmer::{DecisionWarmer, WarmingReport};
